//! Process configuration for the API binary

use otp_core::{DomainError, OtpCleanupConfig, OtpServiceConfig};
use otp_infra::config::DeliveryConfig;
use otp_infra::InfrastructureError;
use otp_shared::{AppConfig, EnvVarError};

/// Errors raised while assembling the process configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid environment: {0}")]
    Env(#[from] EnvVarError),

    #[error("Invalid OTP configuration: {0}")]
    Otp(DomainError),

    #[error("Invalid delivery configuration: {0}")]
    Delivery(InfrastructureError),
}

/// Everything the binary needs to start serving
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub app: AppConfig,
    pub delivery: DeliveryConfig,
    pub otp: OtpServiceConfig,
    pub cleanup: OtpCleanupConfig,
}

impl ApiConfig {
    /// Load from environment variables, rejecting unparsable or invalid tunables
    pub fn from_env() -> Result<Self, ConfigError> {
        let app = AppConfig::from_env()?;
        let delivery = DeliveryConfig::from_env().map_err(ConfigError::Delivery)?;
        Self::from_app_config(app, delivery)
    }

    pub fn from_app_config(app: AppConfig, delivery: DeliveryConfig) -> Result<Self, ConfigError> {
        let otp = OtpServiceConfig::from(&app.otp);
        otp.validate().map_err(ConfigError::Otp)?;
        let cleanup = OtpCleanupConfig::from(&app.otp);

        Ok(Self {
            app,
            delivery,
            otp,
            cleanup,
        })
    }
}
