//! # Infrastructure Layer
//!
//! Concrete implementations of the ports defined in `otp_core`:
//!
//! - **Database**: SQLite OTP store using SQLx, with embedded migrations
//! - **Cache**: Redis OTP store with native key expiry and a Lua compare-and-delete
//! - **Delivery**: console delivery channel standing in for SMS and email transports
//!
//! [`create_store`] and [`create_delivery_channel`] pick an implementation from
//! configuration at startup.

use otp_core::errors::DomainError;

/// Database module - SQLite implementation using SQLx
pub mod database;

/// Cache module - Redis client and the Redis-backed store
pub mod cache;

/// Delivery module - code delivery channels
pub mod delivery;

mod factory;

pub use factory::{create_delivery_channel, create_store};

/// Configuration module for infrastructure services
pub mod config {
    //! Configuration for infrastructure services that have no shared counterpart

    use serde::{Deserialize, Serialize};
    use std::fmt;
    use std::str::FromStr;

    // Re-export shared configs used by the stores
    pub use otp_shared::config::{CacheConfig, DatabaseConfig, StorageBackend, StorageConfig};

    /// Which delivery channel hands out issued codes
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum DeliveryKind {
        /// Print a framed message to stdout and log a masked event
        #[default]
        Console,
        /// Log a masked event only
        Log,
    }

    impl fmt::Display for DeliveryKind {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                DeliveryKind::Console => write!(f, "console"),
                DeliveryKind::Log => write!(f, "log"),
            }
        }
    }

    impl FromStr for DeliveryKind {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.to_lowercase().as_str() {
                "console" | "mock" => Ok(DeliveryKind::Console),
                "log" => Ok(DeliveryKind::Log),
                _ => Err(format!("Invalid delivery channel: {}", s)),
            }
        }
    }

    /// Delivery channel configuration
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct DeliveryConfig {
        /// Channel kind ("console", "log")
        pub kind: DeliveryKind,
    }

    impl DeliveryConfig {
        /// Load from `DELIVERY_CHANNEL`, defaulting to the console channel
        pub fn from_env() -> Result<Self, super::InfrastructureError> {
            let kind = match std::env::var("DELIVERY_CHANNEL") {
                Ok(value) => value.parse().map_err(super::InfrastructureError::Config)?,
                Err(_) => DeliveryKind::default(),
            };
            Ok(Self { kind })
        }
    }
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection or query error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Embedded migration failure
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Redis error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Stored value could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Delivery channel error
    #[error("Delivery error: {0}")]
    Delivery(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Config(_) | InfrastructureError::Delivery(_) => {
                DomainError::internal(err.to_string())
            }
            _ => DomainError::storage(err.to_string()),
        }
    }
}
