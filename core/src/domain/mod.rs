//! Domain layer containing the OTP entities.

pub mod entities;

pub use entities::*;
