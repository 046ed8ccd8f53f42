//! Server configuration module

use serde::{Deserialize, Serialize};

use super::env_or;
use super::environment::Environment;

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Worker threads (0 = number of CPU cores)
    #[serde(default)]
    pub workers: usize,

    /// Keep-alive timeout in seconds
    #[serde(default = "default_keep_alive")]
    pub keep_alive: u64,

    /// Maximum JSON payload size in bytes
    #[serde(default = "default_max_payload_size")]
    pub max_payload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 8000,
            workers: 0, // Use all CPU cores
            keep_alive: default_keep_alive(),
            max_payload_size: default_max_payload_size(),
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("SERVER_HOST").unwrap_or(defaults.host),
            port: env_or("SERVER_PORT", defaults.port),
            workers: env_or("SERVER_WORKERS", defaults.workers),
            ..defaults
        }
    }

    /// Get the bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    /// Allowed origins; empty means any origin outside production
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Allow credentials
    #[serde(default)]
    pub allow_credentials: bool,

    /// Max age for preflight cache in seconds
    #[serde(default = "default_max_age")]
    pub max_age: usize,

    /// Restrict to `allowed_origins` even when the list is empty
    #[serde(default)]
    pub strict: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![],
            allow_credentials: false,
            max_age: default_max_age(),
            strict: true,
        }
    }
}

impl CorsConfig {
    /// Permissive outside production, strict in production
    pub fn for_environment(env: Environment) -> Self {
        if env.is_production() {
            Self::default()
        } else {
            Self {
                allow_credentials: true,
                strict: false,
                ..Self::default()
            }
        }
    }

    /// Create from environment variables
    ///
    /// `ALLOWED_ORIGINS` is a comma-separated list of origins.
    pub fn from_env(env: Environment) -> Self {
        let mut config = Self::for_environment(env);
        if let Ok(origins) = std::env::var("ALLOWED_ORIGINS") {
            config.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect();
        }
        config.max_age = env_or("CORS_MAX_AGE", config.max_age);
        config
    }

    /// Whether any origin should be accepted
    pub fn allows_any_origin(&self) -> bool {
        !self.strict && self.allowed_origins.is_empty()
    }
}

fn default_keep_alive() -> u64 {
    75 // 75 seconds
}

fn default_max_payload_size() -> usize {
    16 * 1024 // 16 KB, requests carry four short strings
}

fn default_max_age() -> usize {
    3600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        let config = ServerConfig::new("0.0.0.0", 9000);
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
    }

    #[test]
    fn test_cors_for_environment() {
        assert!(CorsConfig::for_environment(Environment::Development).allows_any_origin());
        assert!(!CorsConfig::for_environment(Environment::Production).allows_any_origin());
    }

    #[test]
    fn test_cors_with_explicit_origins() {
        let config = CorsConfig {
            allowed_origins: vec!["https://app.example.com".to_string()],
            ..CorsConfig::for_environment(Environment::Development)
        };
        assert!(!config.allows_any_origin());
    }
}
