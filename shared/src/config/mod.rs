//! Configuration module with service-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `cache` - Redis connection configuration for the Redis OTP store
//! - `database` - SQLite connection and pool configuration
//! - `environment` - Environment detection
//! - `logging` - Log level and output format
//! - `otp` - OTP lifecycle tunables (code length, validity window, cleanup)
//! - `server` - HTTP server and CORS configuration
//! - `storage` - Selection of the OTP store backend

pub mod cache;
pub mod database;
pub mod environment;
pub mod logging;
pub mod otp;
pub mod server;
pub mod storage;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use environment::Environment;
pub use logging::{LogFormat, LoggingConfig};
pub use otp::OtpConfig;
pub use server::{CorsConfig, ServerConfig};
pub use storage::{StorageBackend, StorageConfig};

/// Source of configuration variables, `std::env::var` outside tests
pub type VarLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// OTP store configuration
    pub storage: StorageConfig,

    /// OTP lifecycle configuration
    #[serde(default)]
    pub otp: OtpConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            otp: OtpConfig::default(),
            cors: CorsConfig::for_environment(env),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Call `dotenvy::dotenv()` beforehand to pick up a `.env` file. Store and OTP
    /// tunables that are set but unparsable are an error rather than a default.
    pub fn from_env() -> Result<Self, EnvVarError> {
        let environment = Environment::from_env();
        let lookup = |key: &str| std::env::var(key).ok();
        Ok(Self {
            environment,
            server: ServerConfig::from_env(),
            storage: StorageConfig::from_vars(&lookup)?,
            otp: OtpConfig::from_vars(&lookup)?,
            cors: CorsConfig::from_env(environment),
            logging: LoggingConfig::from_env(environment),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_missing_uses_default() {
        let vars = |_: &str| None;
        assert_eq!(parse_var(&vars, "OTP_CODE_LENGTH", 6usize), Ok(6));
    }

    #[test]
    fn test_parse_var_trims_value() {
        let vars = |_: &str| Some(" 8 ".to_string());
        assert_eq!(parse_var(&vars, "OTP_CODE_LENGTH", 6usize), Ok(8));
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        let vars = |_: &str| Some("six".to_string());
        let err = parse_var(&vars, "OTP_CODE_LENGTH", 6usize).unwrap_err();
        assert_eq!(err.key, "OTP_CODE_LENGTH");
        assert_eq!(err.value, "six");
        assert!(err.to_string().contains("OTP_CODE_LENGTH"));
    }
}

/// A configuration variable that is set but cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid value {value:?} for {key}: {reason}")]
pub struct EnvVarError {
    pub key: String,
    pub value: String,
    pub reason: String,
}

/// Parse `key` from `vars`; missing means `default`, unparsable is an error
pub(crate) fn parse_var<T>(vars: VarLookup<'_>, key: &str, default: T) -> Result<T, EnvVarError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(value) = vars(key) else {
        return Ok(default);
    };
    match value.trim().parse() {
        Ok(parsed) => Ok(parsed),
        Err(e) => Err(EnvVarError {
            key: key.to_string(),
            value,
            reason: e.to_string(),
        }),
    }
}

/// Read an environment variable and parse it, falling back to `default`
/// when the variable is missing or unparsable. Only for settings with a
/// harmless fallback; tunables go through `parse_var`.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
