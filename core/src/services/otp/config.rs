//! Configuration for the OTP service

use chrono::Duration;
use otp_shared::config::OtpConfig;

use crate::domain::entities::otp_record::{
    DEFAULT_CODE_LENGTH, DEFAULT_VALIDITY_SECONDS, MAX_CODE_LENGTH,
};
use crate::errors::{DomainError, DomainResult};

/// Configuration for the OTP service
#[derive(Debug, Clone)]
pub struct OtpServiceConfig {
    /// Number of digits in each of the two codes
    pub code_length: usize,
    /// How long an issued pair of codes stays valid
    pub validity_window: Duration,
    /// Delete a record when verification finds it expired
    pub delete_expired_on_read: bool,
}

impl Default for OtpServiceConfig {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            validity_window: Duration::seconds(DEFAULT_VALIDITY_SECONDS),
            delete_expired_on_read: false,
        }
    }
}

impl OtpServiceConfig {
    pub fn with_validity_window(mut self, validity_window: Duration) -> Self {
        self.validity_window = validity_window;
        self
    }

    pub fn with_code_length(mut self, code_length: usize) -> Self {
        self.code_length = code_length;
        self
    }

    pub fn with_delete_expired_on_read(mut self, enabled: bool) -> Self {
        self.delete_expired_on_read = enabled;
        self
    }

    /// Reject tunables the service cannot honour
    pub fn validate(&self) -> DomainResult<()> {
        if self.code_length == 0 || self.code_length > MAX_CODE_LENGTH {
            return Err(DomainError::validation(format!(
                "code length must be between 1 and {}, got {}",
                MAX_CODE_LENGTH, self.code_length
            )));
        }
        if self.validity_window <= Duration::zero() {
            return Err(DomainError::validation(format!(
                "validity window must be positive, got {} seconds",
                self.validity_window.num_seconds()
            )));
        }
        Ok(())
    }
}

impl From<&OtpConfig> for OtpServiceConfig {
    fn from(config: &OtpConfig) -> Self {
        Self {
            code_length: config.code_length,
            validity_window: Duration::seconds(config.validity_seconds),
            delete_expired_on_read: config.delete_expired_on_read,
        }
    }
}
