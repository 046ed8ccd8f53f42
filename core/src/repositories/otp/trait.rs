//! Store trait defining the persistence contract for pending OTP records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{IdentityPair, OtpRecord};
use crate::errors::DomainError;

/// Keyed storage of at most one pending `OtpRecord` per `IdentityPair`.
///
/// The store never evaluates expiry on reads; that decision belongs to the lifecycle
/// service so it can tell "expired" apart from "not found". Every method must be
/// atomic with respect to concurrent calls on the same pair: a reader observes either
/// the previous record or the new one in full.
///
/// The only error a store returns is `DomainError::Storage`, raised when the
/// underlying medium fails.
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Replace any record held for `pair` with `record` in a single upsert.
    async fn put(&self, pair: &IdentityPair, record: OtpRecord) -> Result<(), DomainError>;

    /// Exact lookup with no side effects.
    async fn get(&self, pair: &IdentityPair) -> Result<Option<OtpRecord>, DomainError>;

    /// Remove the record for `pair`. Deleting an absent record is a no-op.
    async fn delete(&self, pair: &IdentityPair) -> Result<(), DomainError>;

    /// Delete the record for `pair` only if it is still identical to `expected`.
    ///
    /// Returns `true` when this call removed the record. `false` means the record was
    /// already gone or was replaced by a newer send, and nothing was changed.
    ///
    /// # Example
    /// ```no_run
    /// # use otp_core::domain::entities::IdentityPair;
    /// # use otp_core::repositories::OtpStore;
    /// # async fn example(store: &impl OtpStore) -> Result<(), Box<dyn std::error::Error>> {
    /// let pair = IdentityPair::new("555-0100", "a@x.com");
    /// if let Some(current) = store.get(&pair).await? {
    ///     let removed = store.consume(&pair, &current).await?;
    ///     println!("consumed: {}", removed);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    async fn consume(&self, pair: &IdentityPair, expected: &OtpRecord) -> Result<bool, DomainError>;

    /// Remove every record already expired at `now` and return how many went.
    ///
    /// Backends with native key expiry may rely on it and return 0.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError>;

    /// Short backend label for health reports and logs
    fn backend_name(&self) -> &'static str;

    /// Release the underlying medium at shutdown.
    async fn close(&self) {}
}
