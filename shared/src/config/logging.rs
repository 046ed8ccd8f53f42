//! Logging configuration consumed by the binary's tracing subscriber

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::environment::Environment;

/// Targets that are chatty at debug level and rarely useful
const QUIET_TARGETS: [&str; 2] = ["sqlx=warn", "actix_server=info"];

/// Output layout of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            other => Err(format!("Invalid log format: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Level or `EnvFilter` directive, e.g. "info" or "otp_core=debug,info"
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: LogFormat,

    /// ANSI colours; ignored by the JSON format
    #[serde(default)]
    pub colored: bool,

    /// Include file and line in each event
    #[serde(default)]
    pub source_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl LoggingConfig {
    /// Pretty, coloured debug output in development; JSON at info elsewhere
    pub fn for_environment(env: Environment) -> Self {
        if env.is_development() {
            Self {
                level: String::from("debug"),
                format: LogFormat::Pretty,
                colored: true,
                source_location: true,
            }
        } else {
            Self {
                level: String::from("info"),
                format: LogFormat::Json,
                colored: false,
                source_location: false,
            }
        }
    }

    /// Environment defaults overridden by `LOG_LEVEL` and `LOG_FORMAT`
    pub fn from_env(env: Environment) -> Self {
        let mut config = Self::for_environment(env);
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.level = level;
        }
        if let Some(format) = std::env::var("LOG_FORMAT").ok().and_then(|f| f.parse().ok()) {
            config.format = format;
        }
        config
    }

    /// Filter directive for the subscriber
    ///
    /// A bare level gets the quiet targets appended; anything containing a
    /// directive is passed through untouched.
    pub fn filter_directive(&self) -> String {
        let level = self.level.trim();
        if level.contains('=') || level.contains(',') {
            return level.to_string();
        }
        std::iter::once(level)
            .chain(QUIET_TARGETS.iter().copied())
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}
