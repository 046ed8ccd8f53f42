//! Business services containing domain logic and use cases.

pub mod otp;

// Re-export commonly used types
pub use otp::{
    ChannelKind, CleanupResult, DeliveryChannel, IssuedOtp, OtpCleanupConfig, OtpCleanupService,
    OtpService, OtpServiceConfig, VerifyOutcome, SEND_SUCCESS_MESSAGE,
};
