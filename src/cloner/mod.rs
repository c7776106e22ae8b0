//! Fetching remote repositories into a local workspace

mod git;
mod util;

pub use git::GitCloner;
pub use util::{expand_ref, is_hash, is_remote, with_credentials};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CloneError {
    #[error("Failed to run git: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("git {command} failed (exit {code}): {stderr}")]
    Failed {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("Not a commit hash: {0}")]
    InvalidSha(String),
}

/// What to clone and where.
#[derive(Debug, Clone, Default)]
pub struct CloneParams {
    pub repo: String,
    /// Branch, tag or fully qualified ref.
    pub reference: Option<String>,
    /// Commit to check out after cloning; disables shallow clones.
    pub sha: Option<String>,
    /// Target directory; must not exist or be empty.
    pub dir: PathBuf,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl CloneParams {
    pub fn new(repo: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            repo: repo.into(),
            dir: dir.into(),
            ..Default::default()
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_sha(mut self, sha: impl Into<String>) -> Self {
        self.sha = Some(sha.into());
        self
    }

    pub fn with_credentials(mut self, username: Option<String>, password: Option<String>) -> Self {
        self.username = username;
        self.password = password;
        self
    }
}

#[allow(async_fn_in_trait)]
pub trait Cloner {
    async fn clone_repo(&self, params: &CloneParams) -> Result<(), CloneError>;
}
