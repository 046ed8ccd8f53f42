//! Identity pair entity: the natural key of a pending OTP record.

use otp_shared::utils::{mask_email, mask_mobile};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A (mobile number, email address) pair.
///
/// Both halves are opaque to the core. Format checks happen at the gateway, which
/// also trims surrounding whitespace before a pair is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityPair {
    /// Mobile number exactly as submitted
    pub mobile: String,

    /// Email address exactly as submitted
    pub email: String,
}

impl IdentityPair {
    pub fn new(mobile: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            mobile: mobile.into(),
            email: email.into(),
        }
    }

    /// Mobile number safe for logs
    pub fn masked_mobile(&self) -> String {
        mask_mobile(&self.mobile)
    }

    /// Email address safe for logs
    pub fn masked_email(&self) -> String {
        mask_email(&self.email)
    }
}

/// Displays the masked form so a pair can be dropped into log lines directly.
impl fmt::Display for IdentityPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.masked_mobile(), self.masked_email())
    }
}
