//! Cache module for the Redis-backed OTP store
//!
//! This module provides a Redis client with connection retry logic and the
//! `OtpStore` implementation that keeps one JSON value per identity pair.

pub mod otp_storage;
pub mod redis_client;


pub use otp_storage::RedisOtpStore;
pub use redis_client::RedisClient;

// Re-export commonly used types
pub use otp_shared::config::CacheConfig;
