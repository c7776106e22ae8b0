use crate::rules::ExecutionRuntime;
use std::env;
use std::fmt;
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_CLONE_DEPTH: u32 = 1;
const MAX_CLONE_DEPTH: u32 = 1000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid runtime: {0}. Valid options: docker, kubernetes, host")]
    InvalidRuntime(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

#[derive(Debug, Clone)]
pub struct AutopipeConfig {
    pub runtime: ExecutionRuntime,
    /// Rule ids to run, in order. `None` selects the default preset.
    pub rules: Option<Vec<String>>,
    pub clone_depth: u32,
    pub log_level: String,
}

impl Default for AutopipeConfig {
    fn default() -> Self {
        let runtime = env::var("AUTOPIPE_RUNTIME")
            .ok()
            .and_then(|s| ExecutionRuntime::from_name(&s))
            .unwrap_or_default();

        let rules = env::var("AUTOPIPE_RULES")
            .ok()
            .map(|v| parse_rule_list(&v))
            .filter(|rules| !rules.is_empty());

        let clone_depth = env::var("AUTOPIPE_CLONE_DEPTH")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_CLONE_DEPTH);

        let log_level = env::var("AUTOPIPE_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            runtime,
            rules,
            clone_depth,
            log_level,
        }
    }
}

impl AutopipeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clone_depth == 0 {
            return Err(ConfigError::ValidationFailed(
                "Clone depth must be at least 1".to_string(),
            ));
        }
        if self.clone_depth > MAX_CLONE_DEPTH {
            return Err(ConfigError::ValidationFailed(format!(
                "Clone depth cannot exceed {}",
                MAX_CLONE_DEPTH
            )));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        if let Some(rules) = &self.rules {
            if rules.is_empty() {
                return Err(ConfigError::ValidationFailed(
                    "Rule list cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }

    pub fn with_runtime(mut self, runtime: ExecutionRuntime) -> Self {
        self.runtime = runtime;
        self
    }

    pub fn with_rules(mut self, rules: Vec<String>) -> Self {
        self.rules = Some(rules);
        self
    }
}

/// Splits a comma-separated rule list, dropping blanks.
pub fn parse_rule_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl fmt::Display for AutopipeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Autopipe Configuration:")?;
        writeln!(f, "  Runtime: {}", self.runtime)?;
        match &self.rules {
            Some(rules) => writeln!(f, "  Rules: {}", rules.join(", "))?,
            None => writeln!(f, "  Rules: default")?,
        }
        writeln!(f, "  Clone Depth: {}", self.clone_depth)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}
