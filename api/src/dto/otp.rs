use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use otp_core::IdentityPair;
use otp_shared::identity::is_valid_mobile;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendOtpRequest {
    /// Mobile number as typed, e.g. "555-0100" or "+1 (415) 555-2671"
    #[validate(
        length(min = 1, max = 20, message = "Mobile number must be 1 to 20 characters"),
        custom(function = "validate_mobile")
    )]
    pub mobile: String,

    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
}

impl SendOtpRequest {
    /// Trim surrounding whitespace from both identity fields
    pub fn trimmed(self) -> Self {
        Self {
            mobile: self.mobile.trim().to_string(),
            email: self.email.trim().to_string(),
        }
    }

    pub fn identity(&self) -> IdentityPair {
        IdentityPair::new(self.mobile.clone(), self.email.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    #[validate(
        length(min = 1, max = 20, message = "Mobile number must be 1 to 20 characters"),
        custom(function = "validate_mobile")
    )]
    pub mobile: String,

    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,

    /// Code sent to the mobile number
    #[validate(length(min = 1, max = 12, message = "Mobile code must be 1 to 12 characters"))]
    pub mobile_otp: String,

    /// Code sent to the email address
    #[validate(length(min = 1, max = 12, message = "Email code must be 1 to 12 characters"))]
    pub email_otp: String,
}

impl VerifyOtpRequest {
    /// Trim the identity fields; codes are compared exactly as submitted
    pub fn trimmed(self) -> Self {
        Self {
            mobile: self.mobile.trim().to_string(),
            email: self.email.trim().to_string(),
            ..self
        }
    }

    pub fn identity(&self) -> IdentityPair {
        IdentityPair::new(self.mobile.clone(), self.email.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendOtpResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpResponse {
    pub verified: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub storage: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

fn validate_mobile(mobile: &str) -> Result<(), ValidationError> {
    if is_valid_mobile(mobile) {
        return Ok(());
    }
    let mut error = ValidationError::new("invalid_mobile");
    error.message = Some(Cow::Borrowed(
        "Mobile number may only contain digits, spaces, '+', '-', '(' and ')'",
    ));
    Err(error)
}
