//! HTTP gateway for the dual OTP service
//!
//! Exposes `POST /send-otp`, `POST /verify-otp` and `GET /health` on top of
//! `otp_core::OtpService`. The binary in `main.rs` wires configuration, logging
//! and the configured store; everything here is reusable from tests.

pub mod app;
pub mod config;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use app::create_app;
pub use config::ApiConfig;
pub use routes::AppState;
