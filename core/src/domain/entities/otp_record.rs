//! OTP record entity holding the paired mobile and email codes.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};

pub use otp_shared::config::otp::{DEFAULT_CODE_LENGTH, DEFAULT_VALIDITY_SECONDS};

/// Longest code the service will issue or accept
pub const MAX_CODE_LENGTH: usize = 12;

/// A pending pair of one-time codes for one identity pair.
///
/// Records are never mutated after issue. A new send replaces the whole record.
/// Timestamps carry millisecond precision so that every store backend reads back a
/// value equal to the one written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    /// Code delivered to the mobile number
    pub mobile_code: String,

    /// Code delivered to the email address
    pub email_code: String,

    /// When the record was issued
    pub created_at: DateTime<Utc>,

    /// Instant after which the codes are no longer accepted
    pub expires_at: DateTime<Utc>,
}

impl OtpRecord {
    /// Issue a fresh record with two independently generated codes
    ///
    /// # Arguments
    ///
    /// * `code_length` - Number of digits in each code
    /// * `validity` - How long the codes stay valid from now
    pub fn issue(code_length: usize, validity: Duration) -> Self {
        let created_at = Utc::now().trunc_subsecs(3);
        Self {
            mobile_code: generate_code(code_length),
            email_code: generate_code(code_length),
            created_at,
            expires_at: created_at + validity,
        }
    }

    /// Build a record from known parts (store read-back and tests)
    pub fn new(
        mobile_code: impl Into<String>,
        email_code: impl Into<String>,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            mobile_code: mobile_code.into(),
            email_code: email_code.into(),
            created_at,
            expires_at,
        }
    }

    /// A record is expired once `now` is strictly past `expires_at`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Compare both submitted codes against the stored ones.
    ///
    /// Both comparisons always run, each in constant time, so the response time does
    /// not reveal which half was wrong.
    pub fn matches(&self, mobile_code: &str, email_code: &str) -> bool {
        let mobile_ok = constant_time_eq(self.mobile_code.as_bytes(), mobile_code.as_bytes());
        let email_ok = constant_time_eq(self.email_code.as_bytes(), email_code.as_bytes());
        mobile_ok & email_ok
    }
}

/// Generate a code of `length` digits, each drawn uniformly and independently from
/// 0-9 with the operating system CSPRNG.
pub fn generate_code(length: usize) -> String {
    let mut rng = OsRng;
    (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}
