//! Database module - SQLite implementation using SQLx
//!
//! This module provides the SQL-backed OTP store:
//! - Connection pool management
//! - Embedded schema migrations
//! - The `OtpStore` implementation over the `otps` table

pub mod connection;
pub mod repositories;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use repositories::SqliteOtpStore;
