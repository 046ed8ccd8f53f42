//! OTP store backend selection

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{parse_var, EnvVarError, VarLookup};
use super::{CacheConfig, DatabaseConfig};

/// Available OTP store backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Local SQLite file (default)
    Sqlite,
    /// Redis server
    Redis,
    /// Process memory, lost on restart
    Memory,
}

impl Default for StorageBackend {
    fn default() -> Self {
        StorageBackend::Sqlite
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Sqlite => write!(f, "sqlite"),
            StorageBackend::Redis => write!(f, "redis"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" | "sql" => Ok(StorageBackend::Sqlite),
            "redis" => Ok(StorageBackend::Redis),
            "memory" | "mem" | "in-memory" => Ok(StorageBackend::Memory),
            _ => Err(format!("Invalid storage backend: {}", s)),
        }
    }
}

/// OTP store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Selected backend
    #[serde(default)]
    pub backend: StorageBackend,

    /// SQLite settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Redis settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Seconds Redis keeps a record past its expiry so it can still be
    /// reported as expired rather than missing
    #[serde(default = "default_retention_seconds")]
    pub retention_seconds: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            database: DatabaseConfig::default(),
            cache: CacheConfig::default(),
            retention_seconds: default_retention_seconds(),
        }
    }
}

impl StorageConfig {
    /// Create from environment variables
    pub fn from_env() -> Result<Self, EnvVarError> {
        Self::from_vars(&|key: &str| std::env::var(key).ok())
    }

    /// Backend choice and retention come from `vars`; connection settings from the environment
    pub fn from_vars(vars: VarLookup<'_>) -> Result<Self, EnvVarError> {
        Ok(Self {
            backend: parse_var(vars, "STORAGE_BACKEND", StorageBackend::default())?,
            database: DatabaseConfig::from_env(),
            cache: CacheConfig::from_env(),
            retention_seconds: parse_var(vars, "OTP_RETENTION_SECONDS", default_retention_seconds())?,
        })
    }

    /// In-memory store configuration
    pub fn memory() -> Self {
        Self {
            backend: StorageBackend::Memory,
            ..Default::default()
        }
    }
}

fn default_retention_seconds() -> u64 {
    3600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_str() {
        assert_eq!("sqlite".parse::<StorageBackend>().unwrap(), StorageBackend::Sqlite);
        assert_eq!("Redis".parse::<StorageBackend>().unwrap(), StorageBackend::Redis);
        assert_eq!("in-memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert!("mysql".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_from_vars_selects_backend() {
        let vars = |key: &str| (key == "STORAGE_BACKEND").then(|| "redis".to_string());
        let config = StorageConfig::from_vars(&vars).unwrap();
        assert_eq!(config.backend, StorageBackend::Redis);
        assert_eq!(config.retention_seconds, 3600);
    }

    #[test]
    fn test_from_vars_rejects_unknown_backend() {
        let vars = |key: &str| (key == "STORAGE_BACKEND").then(|| "postgres".to_string());
        let err = StorageConfig::from_vars(&vars).unwrap_err();
        assert_eq!(err.key, "STORAGE_BACKEND");
        assert!(err.reason.contains("postgres"));
    }

    #[test]
    fn test_from_vars_rejects_negative_retention() {
        let vars = |key: &str| (key == "OTP_RETENTION_SECONDS").then(|| "-1".to_string());
        let err = StorageConfig::from_vars(&vars).unwrap_err();
        assert_eq!(err.key, "OTP_RETENTION_SECONDS");
    }

    #[test]
    fn test_backend_display_round_trips() {
        for backend in [StorageBackend::Sqlite, StorageBackend::Redis, StorageBackend::Memory] {
            assert_eq!(backend.to_string().parse::<StorageBackend>().unwrap(), backend);
        }
    }
}
