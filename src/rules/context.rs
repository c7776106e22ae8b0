use crate::config::ConfigError;
use crate::fs::FileSystem;
use crate::pipeline::Stage;
use serde::de::DeserializeOwned;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Where generated steps are expected to execute.
///
/// Container-based runtimes get an image on every run step; the host runtime
/// leaves steps bare so they use the host toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionRuntime {
    #[default]
    Docker,
    Kubernetes,
    Host,
}

impl ExecutionRuntime {
    pub fn is_container(&self) -> bool {
        matches!(self, ExecutionRuntime::Docker | ExecutionRuntime::Kubernetes)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "docker" | "container" => Some(ExecutionRuntime::Docker),
            "kubernetes" | "k8s" => Some(ExecutionRuntime::Kubernetes),
            "host" | "native" => Some(ExecutionRuntime::Host),
            _ => None,
        }
    }
}

impl FromStr for ExecutionRuntime {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ConfigError::InvalidRuntime(s.to_string()))
    }
}

impl fmt::Display for ExecutionRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExecutionRuntime::Docker => "docker",
            ExecutionRuntime::Kubernetes => "kubernetes",
            ExecutionRuntime::Host => "host",
        };
        write!(f, "{}", name)
    }
}

/// Everything a rule may look at. Rules never get mutable access to the
/// pipeline; the builder appends whatever they return.
pub struct RuleContext<'a> {
    fs: &'a dyn FileSystem,
    runtime: ExecutionRuntime,
    stage: &'a Stage,
}

impl<'a> RuleContext<'a> {
    pub fn new(fs: &'a dyn FileSystem, runtime: ExecutionRuntime, stage: &'a Stage) -> Self {
        Self { fs, runtime, stage }
    }

    pub fn fs(&self) -> &dyn FileSystem {
        self.fs
    }

    pub fn runtime(&self) -> ExecutionRuntime {
        self.runtime
    }

    /// The primary stage as left by earlier rules.
    pub fn stage(&self) -> &Stage {
        self.stage
    }

    /// `Some(image)` when steps should run inside a container.
    pub fn image<'i>(&self, image: &'i str) -> Option<&'i str> {
        self.runtime.is_container().then_some(image)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.fs.exists(Path::new(name))
    }

    pub fn is_dir(&self, name: &str) -> bool {
        self.fs.is_dir(Path::new(name))
    }

    /// Sorted workspace paths matching the pattern; glob errors count as no
    /// match.
    pub fn glob(&self, pattern: &str) -> Vec<PathBuf> {
        self.fs.glob(pattern).unwrap_or_default()
    }

    /// File contents, or `None` when missing or unreadable.
    pub fn read(&self, name: &str) -> Option<String> {
        self.fs.read_to_string(Path::new(name)).ok()
    }

    /// Parses a JSON file, or `None` when it is missing or malformed.
    pub fn read_json<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let content = self.read(name)?;
        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(file = name, error = %e, "Ignoring malformed JSON manifest");
                None
            }
        }
    }

    /// Parses a TOML file, or `None` when it is missing or malformed.
    pub fn read_toml<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let content = self.read(name)?;
        match toml::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(file = name, error = %e, "Ignoring malformed TOML manifest");
                None
            }
        }
    }
}
