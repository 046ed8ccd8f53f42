//! Redis implementation of `OtpStore`
//!
//! Each identity pair maps to one key, `{prefix}:{len(mobile)}:{mobile}:{email}`, holding the
//! JSON-encoded record. A single `SET ... EX` replaces the record. The key outlives
//! the record's expiry by a retention period so verification can still report
//! "expired" rather than "not found"; after that Redis drops it on its own.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, error};

use otp_core::domain::entities::{IdentityPair, OtpRecord};
use otp_core::errors::{DomainError, DomainResult};
use otp_core::repositories::OtpStore;

use crate::cache::RedisClient;
use crate::config::CacheConfig;
use crate::InfrastructureError;

/// Pair part of the key; the mobile length prefix keeps `:` inside either
/// field from making two pairs collide
pub fn record_suffix(pair: &IdentityPair) -> String {
    format!("{}:{}:{}", pair.mobile.len(), pair.mobile, pair.email)
}

/// Key lifetime in whole seconds for a record expiring at `expires_at`
///
/// The remaining validity is rounded up so the key never disappears before
/// `expires_at`; the result is at least one second.
pub fn ttl_for(expires_at: DateTime<Utc>, now: DateTime<Utc>, retention_seconds: u64) -> u64 {
    let remaining_ms = (expires_at - now).num_milliseconds().max(0) as u64;
    let until_expiry = remaining_ms.div_ceil(1000);
    (until_expiry + retention_seconds).max(1)
}

/// Redis-backed OTP store
pub struct RedisOtpStore {
    client: RedisClient,
    /// Seconds a key is kept after the record's `expires_at`
    retention_seconds: u64,
}

impl RedisOtpStore {
    pub fn new(client: RedisClient, retention_seconds: u64) -> Self {
        Self {
            client,
            retention_seconds,
        }
    }

    /// Connect to the server described by `config`
    pub async fn connect(config: CacheConfig, retention_seconds: u64) -> Result<Self, InfrastructureError> {
        let client = RedisClient::new(config).await?;
        Ok(Self::new(client, retention_seconds))
    }

    /// Key holding the record for `pair`
    pub fn record_key(&self, pair: &IdentityPair) -> String {
        self.client.make_key(&record_suffix(pair))
    }

    fn failed(operation: &'static str, pair: &IdentityPair, e: InfrastructureError) -> DomainError {
        error!(
            mobile = %pair.masked_mobile(),
            email = %pair.masked_email(),
            operation = operation,
            error = %e,
            "Redis OTP store operation failed"
        );
        e.into()
    }

    fn encode(record: &OtpRecord) -> DomainResult<String> {
        serde_json::to_string(record).map_err(|e| InfrastructureError::Serialization(e).into())
    }
}

#[async_trait]
impl OtpStore for RedisOtpStore {
    async fn put(&self, pair: &IdentityPair, record: OtpRecord) -> DomainResult<()> {
        let value = Self::encode(&record)?;
        let ttl = ttl_for(record.expires_at, Utc::now(), self.retention_seconds);

        self.client
            .set_with_expiry(&self.record_key(pair), &value, ttl)
            .await
            .map_err(|e| Self::failed("put", pair, e))?;

        debug!(
            mobile = %pair.masked_mobile(),
            email = %pair.masked_email(),
            ttl_seconds = ttl,
            "Stored OTP record in Redis"
        );
        Ok(())
    }

    async fn get(&self, pair: &IdentityPair) -> DomainResult<Option<OtpRecord>> {
        let value = self
            .client
            .get(&self.record_key(pair))
            .await
            .map_err(|e| Self::failed("get", pair, e))?;

        value
            .map(|raw| {
                serde_json::from_str::<OtpRecord>(&raw)
                    .map_err(|e| Self::failed("decode", pair, InfrastructureError::Serialization(e)))
            })
            .transpose()
    }

    async fn delete(&self, pair: &IdentityPair) -> DomainResult<()> {
        self.client
            .delete(&self.record_key(pair))
            .await
            .map_err(|e| Self::failed("delete", pair, e))?;
        Ok(())
    }

    async fn consume(&self, pair: &IdentityPair, expected: &OtpRecord) -> DomainResult<bool> {
        // serde_json output is deterministic, so re-encoding a decoded record yields
        // the exact bytes stored
        let expected = Self::encode(expected)?;
        self.client
            .compare_and_delete(&self.record_key(pair), &expected)
            .await
            .map_err(|e| Self::failed("consume", pair, e))
    }

    async fn purge_expired(&self, _now: DateTime<Utc>) -> DomainResult<u64> {
        debug!("Redis expires OTP keys natively, nothing to purge");
        Ok(0)
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
