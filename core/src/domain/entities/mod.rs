//! Domain entities representing core business objects.

pub mod identity;
pub mod otp_record;

pub use identity::IdentityPair;
pub use otp_record::{
    generate_code, OtpRecord, DEFAULT_CODE_LENGTH, DEFAULT_VALIDITY_SECONDS, MAX_CODE_LENGTH,
};

#[cfg(test)]
mod tests;
