//! Cleanup service for periodic removal of expired OTP records
//!
//! Expiry is evaluated lazily on every verification, so purging is never needed for
//! correctness. It only keeps stores without native key expiry from growing.

use chrono::Utc;
use otp_shared::config::OtpConfig;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::errors::DomainError;
use crate::repositories::OtpStore;

/// Configuration for the OTP cleanup service
#[derive(Debug, Clone)]
pub struct OtpCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for OtpCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600,
            enabled: false,
        }
    }
}

impl From<&OtpConfig> for OtpCleanupConfig {
    fn from(config: &OtpConfig) -> Self {
        Self {
            interval_seconds: config.cleanup_interval_seconds,
            enabled: config.cleanup_enabled(),
        }
    }
}

/// Service that purges expired records from an `OtpStore`
pub struct OtpCleanupService<S: OtpStore + ?Sized + 'static> {
    store: Arc<S>,
    config: OtpCleanupConfig,
}

impl<S: OtpStore + ?Sized + 'static> OtpCleanupService<S> {
    pub fn new(store: Arc<S>, config: OtpCleanupConfig) -> Self {
        Self { store, config }
    }

    /// Run a single cleanup cycle, regardless of the `enabled` flag
    pub async fn run_cleanup(&self) -> Result<CleanupResult, DomainError> {
        let started = Instant::now();
        let expired_records_deleted = self.store.purge_expired(Utc::now()).await?;

        let result = CleanupResult {
            expired_records_deleted,
            duration_ms: started.elapsed().as_millis() as u64,
        };

        info!(
            backend = self.store.backend_name(),
            deleted = result.expired_records_deleted,
            duration_ms = result.duration_ms,
            event = "otp_cleanup_completed",
            "OTP cleanup cycle completed"
        );

        Ok(result)
    }

    /// Start the cleanup service as a background task
    ///
    /// Returns the task handle so the owner can abort it at shutdown, or `None` when
    /// cleanup is disabled.
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.enabled || self.config.interval_seconds == 0 {
            warn!("OTP cleanup service is disabled");
            return None;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        Some(tokio::spawn(async move {
            info!(
                "OTP cleanup service started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                if let Err(e) = self.run_cleanup().await {
                    error!("OTP cleanup cycle failed: {}", e);
                }
            }
        }))
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupResult {
    /// Number of expired records deleted
    pub expired_records_deleted: u64,
    /// Wall time spent in the store call
    pub duration_ms: u64,
}
