//! OTP lifecycle module for paired mobile/email verification
//!
//! This module provides the complete one-time code workflow:
//! - Issuing a mobile code and an email code for an identity pair
//! - Handing both codes to a delivery channel
//! - Single-use verification with lazy expiry evaluation
//! - Optional purging of expired records

mod cleanup;
mod config;
mod service;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use cleanup::{CleanupResult, OtpCleanupConfig, OtpCleanupService};
pub use config::OtpServiceConfig;
pub use service::OtpService;
pub use traits::{ChannelKind, DeliveryChannel};
pub use types::{IssuedOtp, VerifyOutcome, SEND_SUCCESS_MESSAGE};
