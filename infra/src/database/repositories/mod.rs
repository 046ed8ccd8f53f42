pub mod otp_repository;

pub use otp_repository::SqliteOtpStore;
