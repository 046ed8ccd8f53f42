//! Types for OTP service results

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::domain::entities::OtpRecord;

/// Message reported to the caller after a successful send
pub const SEND_SUCCESS_MESSAGE: &str = "OTPs generated and sent.";

/// Codes issued by a send.
///
/// Returned so that callers inside the process (tests, delivery adapters) can see the
/// codes. The HTTP layer never echoes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedOtp {
    pub mobile_code: String,
    pub email_code: String,
    pub expires_at: DateTime<Utc>,
}

impl From<&OtpRecord> for IssuedOtp {
    fn from(record: &OtpRecord) -> Self {
        Self {
            mobile_code: record.mobile_code.clone(),
            email_code: record.email_code.clone(),
            expires_at: record.expires_at,
        }
    }
}

/// Result of verifying a pair of codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyOutcome {
    /// Both codes matched an unexpired record, which has now been consumed
    Verified,
    /// No record exists for the pair
    NotFound,
    /// A record exists but its validity window has passed
    Expired,
    /// At least one code differs; the record is left untouched
    Mismatch,
}

impl VerifyOutcome {
    pub fn is_verified(&self) -> bool {
        matches!(self, VerifyOutcome::Verified)
    }

    /// User-facing message for the outcome
    pub fn message(&self) -> &'static str {
        match self {
            VerifyOutcome::Verified => "OTP verification successful.",
            VerifyOutcome::NotFound => "No OTP request found.",
            VerifyOutcome::Expired => "OTP expired. Please request again.",
            VerifyOutcome::Mismatch => "Invalid OTP(s).",
        }
    }

    /// Stable label used as a log field
    pub fn as_str(&self) -> &'static str {
        match self {
            VerifyOutcome::Verified => "verified",
            VerifyOutcome::NotFound => "not_found",
            VerifyOutcome::Expired => "expired",
            VerifyOutcome::Mismatch => "mismatch",
        }
    }
}

impl fmt::Display for VerifyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
