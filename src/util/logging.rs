//! Structured logging setup
//!
//! Logs always go to stderr so the generated pipeline can be piped from
//! stdout untouched.
//!
//! # Example
//!
//! ```no_run
//! use autopipe::util::logging;
//!
//! logging::init_from_env();
//! tracing::info!(repo = "acme/widgets", "Generating pipeline");
//! ```

use std::env;
use std::io;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum level for the `autopipe` target
    pub level: Level,

    /// Emit JSON lines instead of human-readable output
    pub use_json: bool,

    pub include_target: bool,

    /// Include file and line number information
    pub include_location: bool,

    pub include_thread_ids: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: false,
            include_location: false,
            include_thread_ids: false,
        }
    }
}

impl LoggingConfig {
    /// JSON output with full metadata, for CI log collectors.
    pub fn production() -> Self {
        Self {
            level: Level::INFO,
            use_json: true,
            include_target: true,
            include_location: true,
            include_thread_ids: true,
        }
    }

    /// Reads `AUTOPIPE_LOG_LEVEL` and `AUTOPIPE_LOG_JSON`. JSON output uses
    /// the production layout.
    pub fn from_env() -> Self {
        let level = env::var("AUTOPIPE_LOG_LEVEL")
            .map(|v| parse_level(&v))
            .unwrap_or(Level::INFO);

        let use_json = env::var("AUTOPIPE_LOG_JSON")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        let base = if use_json {
            Self::production()
        } else {
            Self::default()
        };
        Self { level, ..base }
    }
}

/// Parses a log level, falling back to `INFO` for anything unrecognized.
///
/// ```
/// use autopipe::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("debug"), Level::DEBUG);
/// assert_eq!(parse_level("WARN"), Level::WARN);
/// assert_eq!(parse_level("loud"), Level::INFO);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

/// `RUST_LOG` wins when set; otherwise only the crate's own target is enabled.
fn build_filter(level: Level) -> EnvFilter {
    let filter = EnvFilter::from_default_env();
    if env::var("RUST_LOG").is_ok() {
        return filter;
    }
    match format!("autopipe={}", level).parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

/// Installs the global subscriber. Only the first call has any effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = build_filter(config.level);

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location)
                        .with_thread_ids(config.include_thread_ids)
                        .with_thread_names(config.include_thread_ids),
                )
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location)
                        .with_thread_ids(config.include_thread_ids)
                        .with_thread_names(config.include_thread_ids),
                )
                .init();
        }
    });
}

/// Initializes logging from the environment; `RUST_LOG` still applies on top.
pub fn init_from_env() {
    init_logging(LoggingConfig::from_env());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn with_env<F: FnOnce()>(vars: &[(&str, Option<&str>)], f: F) {
        let saved: Vec<_> = vars.iter().map(|(k, _)| (*k, env::var(k).ok())).collect();
        for (key, value) in vars {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
        f();
        for (key, value) in saved {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("trace"), Level::TRACE);
        assert_eq!(parse_level("Debug"), Level::DEBUG);
        assert_eq!(parse_level("INFO"), Level::INFO);
        assert_eq!(parse_level("warn"), Level::WARN);
        assert_eq!(parse_level("error"), Level::ERROR);
    }

    #[test]
    fn test_parse_level_invalid() {
        assert_eq!(parse_level("invalid"), Level::INFO);
        assert_eq!(parse_level(""), Level::INFO);
    }

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, Level::INFO);
        assert!(!config.use_json);
        assert!(!config.include_location);
    }

    #[test]
    fn test_production_config() {
        let config = LoggingConfig::production();
        assert!(config.use_json);
        assert!(config.include_target);
        assert!(config.include_thread_ids);
    }

    #[test]
    fn test_filter_carries_crate_directive() {
        if env::var("RUST_LOG").is_ok() {
            return;
        }
        let filter = build_filter(Level::DEBUG);
        assert!(filter.to_string().to_lowercase().contains("autopipe=debug"));
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        with_env(
            &[("AUTOPIPE_LOG_LEVEL", None), ("AUTOPIPE_LOG_JSON", None)],
            || {
                let config = LoggingConfig::from_env();
                assert_eq!(config.level, Level::INFO);
                assert!(!config.use_json);
            },
        );
    }

    #[test]
    #[serial]
    fn test_from_env_json_uses_production_layout() {
        with_env(
            &[
                ("AUTOPIPE_LOG_LEVEL", Some("warn")),
                ("AUTOPIPE_LOG_JSON", Some("true")),
            ],
            || {
                let config = LoggingConfig::from_env();
                assert_eq!(config.level, Level::WARN);
                assert!(config.use_json);
                assert!(config.include_target);
            },
        );
    }
}
