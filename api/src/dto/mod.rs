//! Request and response bodies for the HTTP API

pub mod otp;

pub use otp::{
    HealthResponse, SendOtpRequest, SendOtpResponse, VerifyOtpRequest, VerifyOtpResponse,
};
