//! Shared utilities and common types for the Dual OTP server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Error response structures
//! - Identity utilities (masking, format checks)

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, CorsConfig, DatabaseConfig, EnvVarError, Environment, LogFormat,
    LoggingConfig, ServerConfig, StorageBackend, StorageConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use utils::identity;
