use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const SCHEMA_VERSION: u32 = 1;
pub const SCHEMA_KIND: &str = "pipeline";
pub const DEFAULT_STAGE_NAME: &str = "build";

/// Top-level document: kind discriminator, version and the pipeline itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub version: u32,
    pub kind: String,
    pub pipeline: Pipeline,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pipeline {
    pub stages: Vec<Stage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,
    pub platform: Platform,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    #[default]
    Linux,
    Windows,
    Darwin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    #[default]
    Amd64,
    Arm64,
}

/// A single unit of work. The variant is fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStep", into = "RawStep")]
pub struct Step {
    name: String,
    kind: StepKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepKind {
    Run(RunStep),
    Plugin(PluginStep),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStep {
    pub commands: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginStep {
    pub uses: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub with: BTreeMap<String, serde_yaml::Value>,
}

/// Wire shape of a step: a name plus exactly one payload key.
#[derive(Serialize, Deserialize)]
struct RawStep {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    run: Option<RunStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    plugin: Option<PluginStep>,
}

impl TryFrom<RawStep> for Step {
    type Error = String;

    fn try_from(raw: RawStep) -> Result<Self, Self::Error> {
        let kind = match (raw.run, raw.plugin) {
            (Some(run), None) => StepKind::Run(run),
            (None, Some(plugin)) => StepKind::Plugin(plugin),
            (Some(_), Some(_)) => {
                return Err(format!("step {:?} declares both run and plugin", raw.name))
            }
            (None, None) => return Err(format!("step {:?} has no run or plugin", raw.name)),
        };
        Ok(Step {
            name: raw.name,
            kind,
        })
    }
}

impl From<Step> for RawStep {
    fn from(step: Step) -> Self {
        let (run, plugin) = match step.kind {
            StepKind::Run(run) => (Some(run), None),
            StepKind::Plugin(plugin) => (None, Some(plugin)),
        };
        RawStep {
            name: step.name,
            run,
            plugin,
        }
    }
}

impl Step {
    /// Shell step with a single command.
    pub fn run(name: impl Into<String>, command: impl Into<String>, image: Option<&str>) -> Self {
        Self::run_all(name, vec![command.into()], image)
    }

    pub fn run_all(name: impl Into<String>, commands: Vec<String>, image: Option<&str>) -> Self {
        Step {
            name: name.into(),
            kind: StepKind::Run(RunStep {
                commands,
                image: image.map(str::to_string),
            }),
        }
    }

    pub fn plugin(
        name: impl Into<String>,
        uses: impl Into<String>,
        with: BTreeMap<String, serde_yaml::Value>,
    ) -> Self {
        Step {
            name: name.into(),
            kind: StepKind::Plugin(PluginStep {
                uses: uses.into(),
                with,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &StepKind {
        &self.kind
    }

    /// Commands of a run step; empty for plugin steps.
    pub fn commands(&self) -> &[String] {
        match &self.kind {
            StepKind::Run(run) => &run.commands,
            StepKind::Plugin(_) => &[],
        }
    }

    pub fn image(&self) -> Option<&str> {
        match &self.kind {
            StepKind::Run(run) => run.image.as_deref(),
            StepKind::Plugin(_) => None,
        }
    }
}

impl Stage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            platform: Platform::default(),
            steps: Vec::new(),
        }
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(Step::name).collect()
    }
}

impl Pipeline {
    /// Skeleton every build starts from: one `build` stage on linux/amd64.
    pub fn skeleton() -> Self {
        Self {
            stages: vec![Stage::new(DEFAULT_STAGE_NAME)],
        }
    }
}

impl Schema {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            version: SCHEMA_VERSION,
            kind: SCHEMA_KIND.to_string(),
            pipeline,
        }
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_yaml() {
            Ok(yaml) => write!(f, "{}", yaml),
            Err(e) => write!(f, "Error formatting pipeline: {}", e),
        }
    }
}
