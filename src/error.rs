use std::path::PathBuf;
use thiserror::Error;

use crate::cloner::CloneError;
use crate::config::ConfigError;

/// Errors raised while opening a workspace root.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("Workspace {path:?} is not accessible: {source}")]
    RootNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Workspace {0:?} is not a directory")]
    NotADirectory(PathBuf),

    #[error("Path {0:?} escapes the workspace root")]
    Escape(PathBuf),
}

/// Failures that abort pipeline generation.
///
/// Detection problems never surface here; only the environment around the
/// rule chain can fail a run.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Workspace(#[from] FsError),

    #[error(transparent)]
    Clone(#[from] CloneError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Unknown rule: {0}")]
    UnknownRule(String),

    #[error("Failed to serialize pipeline: {0}")]
    Serialize(#[from] serde_yaml::Error),

    #[error("Failed to write output to {path:?}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
