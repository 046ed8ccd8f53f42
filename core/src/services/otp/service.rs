//! Main OTP service implementation

use chrono::Utc;
use std::sync::Arc;

use crate::domain::entities::{IdentityPair, OtpRecord};
use crate::errors::DomainResult;
use crate::repositories::OtpStore;

use super::config::OtpServiceConfig;
use super::traits::{ChannelKind, DeliveryChannel};
use super::types::{IssuedOtp, VerifyOutcome};

/// Upper bound on re-evaluations when a record changes between read and consume
const MAX_CONSUME_ATTEMPTS: usize = 3;

/// OTP lifecycle service issuing and verifying paired mobile/email codes
///
/// Both collaborators may be unsized, so the service works over concrete types in
/// tests and over `dyn OtpStore` / `dyn DeliveryChannel` when the backend is chosen
/// at runtime.
pub struct OtpService<S: OtpStore + ?Sized, D: DeliveryChannel + ?Sized> {
    /// Store holding the pending record per identity pair
    store: Arc<S>,
    /// Delivery channel for the issued codes
    delivery: Arc<D>,
    /// Service configuration
    config: OtpServiceConfig,
}

impl<S: OtpStore + ?Sized, D: DeliveryChannel + ?Sized> OtpService<S, D> {
    /// Create a new OTP service
    ///
    /// # Arguments
    ///
    /// * `store` - OTP store implementation
    /// * `delivery` - Delivery channel implementation
    /// * `config` - Service configuration, validated here
    ///
    /// # Returns
    ///
    /// * `Err(DomainError::Validation)` - If the configuration is out of range
    pub fn new(store: Arc<S>, delivery: Arc<D>, config: OtpServiceConfig) -> DomainResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            delivery,
            config,
        })
    }

    pub fn config(&self) -> &OtpServiceConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Issue fresh codes for an identity pair
    ///
    /// This method:
    /// 1. Generates the mobile and email codes independently
    /// 2. Stores them with `expires_at = now + validity window`, replacing any
    ///    pending record for the pair
    /// 3. Hands each code to the delivery channel
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedOtp)` - The committed codes, even if delivery failed
    /// * `Err(DomainError::Storage)` - If the store could not commit the record
    pub async fn send_otp(&self, pair: &IdentityPair) -> DomainResult<IssuedOtp> {
        let record = OtpRecord::issue(self.config.code_length, self.config.validity_window);
        let issued = IssuedOtp::from(&record);

        self.store.put(pair, record).await.map_err(|e| {
            tracing::error!(
                mobile = %pair.masked_mobile(),
                email = %pair.masked_email(),
                error = %e,
                event = "otp_storage_failed",
                "Failed to store OTP record"
            );
            e
        })?;

        tracing::info!(
            mobile = %pair.masked_mobile(),
            email = %pair.masked_email(),
            expires_at = %issued.expires_at,
            event = "otp_generated",
            "Generated new OTP pair"
        );

        self.dispatch(pair, &issued).await;

        Ok(issued)
    }

    /// Verify submitted codes against the pending record
    ///
    /// Evaluation order is existence, then expiry, then code match. Only a full match
    /// consumes the record; a mismatch leaves it pending. The consume step is a
    /// compare-and-delete, so two concurrent verifications of the same codes cannot
    /// both succeed and a verification racing a re-send never removes the newer
    /// record. When the record changed underneath, evaluation starts over against the
    /// current record.
    ///
    /// # Returns
    ///
    /// * `Ok(VerifyOutcome)` - The outcome; only `Verified` means success
    /// * `Err(DomainError::Storage)` - If the store failed
    pub async fn verify_otp(
        &self,
        pair: &IdentityPair,
        mobile_code: &str,
        email_code: &str,
    ) -> DomainResult<VerifyOutcome> {
        for attempt in 1..=MAX_CONSUME_ATTEMPTS {
            let record = match self.store.get(pair).await? {
                Some(record) => record,
                None => return Ok(self.finish(pair, VerifyOutcome::NotFound)),
            };

            if record.is_expired_at(Utc::now()) {
                if self.config.delete_expired_on_read {
                    // Conditional so a re-send that landed meanwhile survives
                    self.store.consume(pair, &record).await?;
                }
                return Ok(self.finish(pair, VerifyOutcome::Expired));
            }

            if !record.matches(mobile_code, email_code) {
                return Ok(self.finish(pair, VerifyOutcome::Mismatch));
            }

            if self.store.consume(pair, &record).await? {
                return Ok(self.finish(pair, VerifyOutcome::Verified));
            }

            tracing::debug!(
                mobile = %pair.masked_mobile(),
                email = %pair.masked_email(),
                attempt = attempt,
                event = "otp_consume_conflict",
                "OTP record changed during verification, re-evaluating"
            );
        }

        tracing::warn!(
            mobile = %pair.masked_mobile(),
            email = %pair.masked_email(),
            event = "otp_consume_contended",
            "OTP record kept changing during verification"
        );
        Ok(self.finish(pair, VerifyOutcome::NotFound))
    }

    /// Drop any pending codes for an identity pair
    pub async fn revoke_otp(&self, pair: &IdentityPair) -> DomainResult<()> {
        tracing::info!(
            mobile = %pair.masked_mobile(),
            email = %pair.masked_email(),
            event = "otp_revoked",
            "Revoking pending OTP pair"
        );
        self.store.delete(pair).await
    }

    async fn dispatch(&self, pair: &IdentityPair, issued: &IssuedOtp) {
        let deliveries = [
            (ChannelKind::Mobile, pair.mobile.as_str(), issued.mobile_code.as_str()),
            (ChannelKind::Email, pair.email.as_str(), issued.email_code.as_str()),
        ];

        for (channel, destination, code) in deliveries {
            if let Err(e) = self.delivery.notify(channel, destination, code).await {
                tracing::warn!(
                    mobile = %pair.masked_mobile(),
                    email = %pair.masked_email(),
                    channel = %channel,
                    provider = self.delivery.provider_name(),
                    error = %e,
                    event = "otp_delivery_failed",
                    "Failed to deliver OTP, stored record kept"
                );
            }
        }
    }

    fn finish(&self, pair: &IdentityPair, outcome: VerifyOutcome) -> VerifyOutcome {
        if outcome.is_verified() {
            tracing::info!(
                mobile = %pair.masked_mobile(),
                email = %pair.masked_email(),
                event = "otp_verified_success",
                "OTP pair verified and consumed"
            );
        } else {
            tracing::warn!(
                mobile = %pair.masked_mobile(),
                email = %pair.masked_email(),
                outcome = outcome.as_str(),
                event = "otp_verification_failed",
                "OTP verification did not succeed"
            );
        }
        outcome
    }
}
