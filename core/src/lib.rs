//! # Dual OTP Core
//!
//! Domain layer of the dual OTP backend. It owns the identity/record entities,
//! the storage contract every backend implements, and the lifecycle service that
//! issues and verifies paired mobile/email one-time codes.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{IdentityPair, OtpRecord};
pub use errors::{DomainError, DomainResult};
pub use repositories::{InMemoryOtpStore, OtpStore};
pub use services::{
    ChannelKind, CleanupResult, DeliveryChannel, IssuedOtp, OtpCleanupConfig, OtpCleanupService,
    OtpService, OtpServiceConfig, VerifyOutcome, SEND_SUCCESS_MESSAGE,
};
