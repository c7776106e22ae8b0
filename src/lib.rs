//! autopipe - rule-based CI pipeline generator
//!
//! Inspects a repository for conventional marker files and assembles a
//! pipeline document with the build and test steps each detected ecosystem
//! needs. Detection is a chain of [`Rule`]s run by a [`Builder`]; every run
//! yields a non-empty pipeline, falling back to a placeholder step when no
//! rule recognizes anything.
//!
//! # Example
//!
//! ```no_run
//! use autopipe::{Builder, ChrootFileSystem, ExecutionRuntime};
//!
//! # fn main() -> Result<(), autopipe::GenerateError> {
//! let fs = ChrootFileSystem::new("/path/to/repo")?;
//! let yaml = Builder::new()
//!     .with_runtime(ExecutionRuntime::Host)
//!     .generate(&fs)?;
//! println!("{}", yaml);
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`fs`]: read-only workspace access (real and in-memory)
//! - [`rules`]: per-ecosystem detection rules and the default preset
//! - [`builder`]: the rule chain engine
//! - [`pipeline`]: the pipeline document and its YAML form
//! - [`cloner`]: fetching remote repositories
//! - [`cli`]: command-line front end

pub mod builder;
pub mod cli;
pub mod cloner;
pub mod config;
pub mod error;
pub mod fs;
pub mod pipeline;
pub mod rules;
pub mod util;

pub use builder::{generate, Builder};
pub use config::{AutopipeConfig, ConfigError};
pub use error::{FsError, GenerateError};
pub use fs::{ChrootFileSystem, FileSystem, MockFileSystem};
pub use pipeline::{Pipeline, Schema, Stage, Step, StepKind};
pub use rules::{ExecutionRuntime, Flow, Rule, RuleContext, RuleId, RuleResult, RuleSet};
pub use util::{init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
