//! OTP lifecycle configuration

use serde::{Deserialize, Serialize};

use super::{parse_var, EnvVarError, VarLookup};

/// Default number of digits in each generated code
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Default validity window in seconds (5 minutes)
pub const DEFAULT_VALIDITY_SECONDS: i64 = 300;

/// Tunables for issuing and verifying codes
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Digits per code
    #[serde(default = "default_code_length")]
    pub code_length: usize,

    /// Seconds a freshly issued pair of codes stays valid
    #[serde(default = "default_validity_seconds")]
    pub validity_seconds: i64,

    /// Delete a record when a verification finds it expired
    #[serde(default)]
    pub delete_expired_on_read: bool,

    /// Seconds between background purges of expired records (0 = disabled)
    #[serde(default)]
    pub cleanup_interval_seconds: u64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            validity_seconds: DEFAULT_VALIDITY_SECONDS,
            delete_expired_on_read: false,
            cleanup_interval_seconds: 0,
        }
    }
}

impl OtpConfig {
    /// Create from environment variables
    pub fn from_env() -> Result<Self, EnvVarError> {
        Self::from_vars(&|key: &str| std::env::var(key).ok())
    }

    /// Read the `OTP_*` variables through `vars`
    pub fn from_vars(vars: VarLookup<'_>) -> Result<Self, EnvVarError> {
        Ok(Self {
            code_length: parse_var(vars, "OTP_CODE_LENGTH", DEFAULT_CODE_LENGTH)?,
            validity_seconds: parse_var(vars, "OTP_VALIDITY_SECONDS", DEFAULT_VALIDITY_SECONDS)?,
            delete_expired_on_read: parse_var(vars, "OTP_DELETE_EXPIRED_ON_READ", false)?,
            cleanup_interval_seconds: parse_var(vars, "OTP_CLEANUP_INTERVAL_SECONDS", 0)?,
        })
    }

    /// Whether the background purge task should run
    pub fn cleanup_enabled(&self) -> bool {
        self.cleanup_interval_seconds > 0
    }
}

fn default_code_length() -> usize {
    DEFAULT_CODE_LENGTH
}

fn default_validity_seconds() -> i64 {
    DEFAULT_VALIDITY_SECONDS
}
