//! Construction of the store and delivery channel selected by configuration

use std::sync::Arc;
use tracing::info;

use otp_core::repositories::{InMemoryOtpStore, OtpStore};
use otp_core::services::DeliveryChannel;

use crate::cache::RedisOtpStore;
use crate::config::{DeliveryConfig, DeliveryKind, StorageBackend, StorageConfig};
use crate::database::SqliteOtpStore;
use crate::delivery::ConsoleDeliveryChannel;
use crate::InfrastructureError;

/// Open the OTP store named by `config.backend`
///
/// The SQLite backend creates the database file if needed and applies migrations.
/// The returned handle should be closed with `OtpStore::close` at shutdown.
pub async fn create_store(config: &StorageConfig) -> Result<Arc<dyn OtpStore>, InfrastructureError> {
    info!(backend = %config.backend, "Opening OTP store");

    let store: Arc<dyn OtpStore> = match config.backend {
        StorageBackend::Sqlite => Arc::new(SqliteOtpStore::connect(config.database.clone()).await?),
        StorageBackend::Redis => Arc::new(
            RedisOtpStore::connect(config.cache.clone(), config.retention_seconds).await?,
        ),
        StorageBackend::Memory => Arc::new(InMemoryOtpStore::new()),
    };

    Ok(store)
}

/// Build the delivery channel named by `config.kind`
pub fn create_delivery_channel(config: &DeliveryConfig) -> Arc<dyn DeliveryChannel> {
    info!(channel = %config.kind, "Using OTP delivery channel");

    match config.kind {
        DeliveryKind::Console => Arc::new(ConsoleDeliveryChannel::new()),
        DeliveryKind::Log => Arc::new(ConsoleDeliveryChannel::log_only()),
    }
}
