//! Route handlers
//!
//! Handlers are generic over the store and delivery channel so tests can mount
//! them on concrete in-memory types while the binary uses trait objects chosen
//! at startup.

pub mod health;
pub mod otp;

use std::sync::Arc;

use otp_core::{DeliveryChannel, OtpService, OtpStore};

/// Application state shared by all workers
pub struct AppState<S, D>
where
    S: OtpStore + ?Sized,
    D: DeliveryChannel + ?Sized,
{
    pub otp_service: Arc<OtpService<S, D>>,
}

impl<S, D> AppState<S, D>
where
    S: OtpStore + ?Sized,
    D: DeliveryChannel + ?Sized,
{
    pub fn new(otp_service: Arc<OtpService<S, D>>) -> Self {
        Self { otp_service }
    }
}
