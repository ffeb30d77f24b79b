//! Structured logging setup
//!
//! Log output goes to stderr so it never mixes with anything a command
//! prints. Configuration comes from the environment:
//!
//! | Variable                        | Values                          | Default  |
//! |---------------------------------|---------------------------------|----------|
//! | `RUST_LOG`                      | any `EnvFilter` directive       | unset    |
//! | `CFN_JAVA_LOG_LEVEL`            | trace/debug/info/warn/error     | `info`   |
//! | `CFN_JAVA_LOG_FORMAT`           | pretty/json                     | `pretty` |
//! | `CFN_JAVA_LOG_INCLUDE_LOCATION` | true/false                      | `false`  |
//!
//! `RUST_LOG` wins over `CFN_JAVA_LOG_LEVEL` when both are set. `--verbose`
//! wins over both.

use std::env;

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for machine consumption, pretty for terminals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Log level: trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    /// Include file:line location
    pub include_location: bool,
    /// Set by [`LogConfig::verbose`]; `RUST_LOG` is ignored when true
    pub force_level: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Pretty,
            include_location: false,
            force_level: false,
        }
    }
}

impl LogConfig {
    /// Parse configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            log_level: env::var("CFN_JAVA_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: LogFormat::parse(
                &env::var("CFN_JAVA_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
            ),
            include_location: env::var("CFN_JAVA_LOG_INCLUDE_LOCATION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
            force_level: false,
        }
    }

    /// Force `debug`, as the CLI's `--verbose` flag does
    pub fn verbose(mut self) -> Self {
        self.log_level = "debug".to_string();
        self.force_level = true;
        self
    }

    /// Filter directive to install, given the value of `RUST_LOG`
    pub fn filter_directive(&self, rust_log: Option<&str>) -> String {
        match rust_log {
            Some(directive) if !self.force_level && !directive.trim().is_empty() => {
                directive.to_string()
            }
            _ => self.level().as_str().to_lowercase(),
        }
    }

    /// The configured level, falling back to `info` for unknown values
    pub fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

/// Install the global subscriber
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_logging_with_config(config: &LogConfig) -> Result<()> {
    let rust_log = env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = config.filter_directive(rust_log.as_deref());
    let env_filter = EnvFilter::try_new(&directive)
        .unwrap_or_else(|_| EnvFilter::new(config.level().as_str()));

    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;
    Ok(())
}
