//! SQLite implementation of `OtpStore`
//!
//! One row per identity pair in the `otps` table. Timestamps are stored as Unix
//! epoch milliseconds so equality checks in `consume` are exact.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tracing::{debug, error, info};

use otp_core::domain::entities::{IdentityPair, OtpRecord};
use otp_core::errors::{DomainError, DomainResult};
use otp_core::repositories::OtpStore;

use crate::config::DatabaseConfig;
use crate::database::connection::DatabasePool;
use crate::InfrastructureError;

/// SQLite-backed OTP store
pub struct SqliteOtpStore {
    /// Database connection pool
    pool: DatabasePool,
}

impl SqliteOtpStore {
    /// Wrap an already migrated pool
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Open the pool described by `config` and apply migrations
    pub async fn connect(config: DatabaseConfig) -> Result<Self, InfrastructureError> {
        let pool = DatabasePool::new(config).await?;
        pool.run_migrations().await?;
        Ok(Self::new(pool))
    }

    /// Fresh private in-memory database, used by tests and the demo
    pub async fn open_in_memory() -> Result<Self, InfrastructureError> {
        Self::connect(DatabaseConfig::in_memory()).await
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    fn query_failed(operation: &'static str, pair: &IdentityPair, e: sqlx::Error) -> DomainError {
        error!(
            mobile = %pair.masked_mobile(),
            email = %pair.masked_email(),
            operation = operation,
            error = %e,
            "OTP store query failed"
        );
        InfrastructureError::Database(e).into()
    }
}

fn from_millis(millis: i64) -> DomainResult<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| DomainError::storage(format!("Invalid stored timestamp: {}", millis)))
}

#[async_trait]
impl OtpStore for SqliteOtpStore {
    async fn put(&self, pair: &IdentityPair, record: OtpRecord) -> DomainResult<()> {
        let query = r#"
            INSERT INTO otps (mobile, email, mobile_otp, email_otp, created_at, expires_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT (mobile, email) DO UPDATE SET
                mobile_otp = excluded.mobile_otp,
                email_otp = excluded.email_otp,
                created_at = excluded.created_at,
                expires_at = excluded.expires_at
        "#;

        sqlx::query(query)
            .bind(&pair.mobile)
            .bind(&pair.email)
            .bind(&record.mobile_code)
            .bind(&record.email_code)
            .bind(record.created_at.timestamp_millis())
            .bind(record.expires_at.timestamp_millis())
            .execute(self.pool.get_pool())
            .await
            .map_err(|e| Self::query_failed("put", pair, e))?;

        debug!(
            mobile = %pair.masked_mobile(),
            email = %pair.masked_email(),
            "Stored OTP record"
        );

        Ok(())
    }

    async fn get(&self, pair: &IdentityPair) -> DomainResult<Option<OtpRecord>> {
        let row: Option<(String, String, i64, i64)> = sqlx::query_as(
            "SELECT mobile_otp, email_otp, created_at, expires_at FROM otps WHERE mobile = ? AND email = ?",
        )
        .bind(&pair.mobile)
        .bind(&pair.email)
        .fetch_optional(self.pool.get_pool())
        .await
        .map_err(|e| Self::query_failed("get", pair, e))?;

        match row {
            Some((mobile_code, email_code, created_at, expires_at)) => Ok(Some(OtpRecord::new(
                mobile_code,
                email_code,
                from_millis(created_at)?,
                from_millis(expires_at)?,
            ))),
            None => Ok(None),
        }
    }

    async fn delete(&self, pair: &IdentityPair) -> DomainResult<()> {
        sqlx::query("DELETE FROM otps WHERE mobile = ? AND email = ?")
            .bind(&pair.mobile)
            .bind(&pair.email)
            .execute(self.pool.get_pool())
            .await
            .map_err(|e| Self::query_failed("delete", pair, e))?;
        Ok(())
    }

    async fn consume(&self, pair: &IdentityPair, expected: &OtpRecord) -> DomainResult<bool> {
        let query = r#"
            DELETE FROM otps
            WHERE mobile = ? AND email = ?
              AND mobile_otp = ? AND email_otp = ?
              AND created_at = ? AND expires_at = ?
        "#;

        let result = sqlx::query(query)
            .bind(&pair.mobile)
            .bind(&pair.email)
            .bind(&expected.mobile_code)
            .bind(&expected.email_code)
            .bind(expected.created_at.timestamp_millis())
            .bind(expected.expires_at.timestamp_millis())
            .execute(self.pool.get_pool())
            .await
            .map_err(|e| Self::query_failed("consume", pair, e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> DomainResult<u64> {
        let result = sqlx::query("DELETE FROM otps WHERE expires_at < ?")
            .bind(now.timestamp_millis())
            .execute(self.pool.get_pool())
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to purge expired OTP records");
                DomainError::from(InfrastructureError::Database(e))
            })?;

        if result.rows_affected() > 0 {
            info!(
                deleted = result.rows_affected(),
                "Purged expired OTP records"
            );
        }

        Ok(result.rows_affected())
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
