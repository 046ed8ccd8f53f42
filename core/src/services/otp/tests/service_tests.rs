//! Tests for the OTP lifecycle service

use chrono::Duration;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use super::mocks::{record_with_codes, FailingStore, RecordingDelivery, ResendingStore};
use crate::domain::entities::IdentityPair;
use crate::errors::DomainError;
use crate::repositories::{InMemoryOtpStore, OtpStore};
use crate::services::otp::{ChannelKind, OtpService, OtpServiceConfig, VerifyOutcome};

type TestService = OtpService<InMemoryOtpStore, RecordingDelivery>;

fn pair() -> IdentityPair {
    IdentityPair::new("555-0100", "a@x.com")
}

fn create_service(config: OtpServiceConfig) -> (TestService, Arc<InMemoryOtpStore>, Arc<RecordingDelivery>) {
    let store = Arc::new(InMemoryOtpStore::new());
    let delivery = Arc::new(RecordingDelivery::new(false));
    let service = OtpService::new(store.clone(), delivery.clone(), config).unwrap();
    (service, store, delivery)
}

#[tokio::test]
async fn test_send_stores_exactly_one_record_per_pair() {
    let (service, store, _) = create_service(OtpServiceConfig::default());
    let other = IdentityPair::new("555-0199", "b@x.com");
    service.send_otp(&other).await.unwrap();
    let before = store.get(&other).await.unwrap();

    let issued = service.send_otp(&pair()).await.unwrap();

    let stored = store.get(&pair()).await.unwrap().unwrap();
    assert_eq!(stored.mobile_code, issued.mobile_code);
    assert_eq!(stored.email_code, issued.email_code);
    assert_eq!(stored.expires_at, issued.expires_at);
    assert_eq!(store.len().await, 2);
    assert_eq!(store.get(&other).await.unwrap(), before);
}

#[tokio::test]
async fn test_send_issues_fixed_length_digit_codes() {
    let (service, _, _) = create_service(OtpServiceConfig::default().with_code_length(8));

    let issued = service.send_otp(&pair()).await.unwrap();

    for code in [&issued.mobile_code, &issued.email_code] {
        assert_eq!(code.len(), 8);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }
}

#[tokio::test]
async fn test_send_sets_expiry_from_validity_window() {
    let (service, store, _) =
        create_service(OtpServiceConfig::default().with_validity_window(Duration::seconds(120)));

    service.send_otp(&pair()).await.unwrap();

    let stored = store.get(&pair()).await.unwrap().unwrap();
    assert_eq!(stored.expires_at - stored.created_at, Duration::seconds(120));
}

#[tokio::test]
async fn test_send_delivers_each_code_to_its_channel() {
    let (service, _, delivery) = create_service(OtpServiceConfig::default());

    let issued = service.send_otp(&pair()).await.unwrap();

    assert_eq!(delivery.sent_count(), 2);
    assert_eq!(
        delivery.last_code(ChannelKind::Mobile, "555-0100"),
        Some(issued.mobile_code)
    );
    assert_eq!(
        delivery.last_code(ChannelKind::Email, "a@x.com"),
        Some(issued.email_code)
    );
}

#[tokio::test]
async fn test_delivery_failure_does_not_fail_send() {
    let store = Arc::new(InMemoryOtpStore::new());
    let delivery = Arc::new(RecordingDelivery::new(true));
    let service = OtpService::new(store.clone(), delivery.clone(), OtpServiceConfig::default()).unwrap();

    let issued = service.send_otp(&pair()).await.unwrap();

    // Both channels were attempted and the record survived
    assert_eq!(delivery.sent_count(), 2);
    assert!(store.get(&pair()).await.unwrap().is_some());
    let outcome = service
        .verify_otp(&pair(), &issued.mobile_code, &issued.email_code)
        .await
        .unwrap();
    assert_eq!(outcome, VerifyOutcome::Verified);
}

#[tokio::test]
async fn test_storage_failure_propagates_from_send_without_delivery() {
    let delivery = Arc::new(RecordingDelivery::new(false));
    let service = OtpService::new(Arc::new(FailingStore), delivery.clone(), OtpServiceConfig::default()).unwrap();

    let result = service.send_otp(&pair()).await;

    assert!(matches!(result, Err(DomainError::Storage { .. })));
    assert_eq!(delivery.sent_count(), 0);
}

#[tokio::test]
async fn test_storage_failure_propagates_from_verify() {
    let service = OtpService::new(
        Arc::new(FailingStore),
        Arc::new(RecordingDelivery::new(false)),
        OtpServiceConfig::default(),
    )
    .unwrap();

    let result = service.verify_otp(&pair(), "123456", "654321").await;

    assert!(matches!(result, Err(DomainError::Storage { .. })));
}

#[tokio::test]
async fn test_verify_without_send_is_not_found() {
    let (service, _, _) = create_service(OtpServiceConfig::default());

    let outcome = service.verify_otp(&pair(), "123456", "654321").await.unwrap();

    assert_eq!(outcome, VerifyOutcome::NotFound);
    assert!(!outcome.is_verified());
    assert_eq!(outcome.message(), "No OTP request found.");
}

#[tokio::test]
async fn test_verify_succeeds_exactly_once() {
    let (service, store, _) = create_service(OtpServiceConfig::default());
    let issued = service.send_otp(&pair()).await.unwrap();

    let first = service
        .verify_otp(&pair(), &issued.mobile_code, &issued.email_code)
        .await
        .unwrap();
    let second = service
        .verify_otp(&pair(), &issued.mobile_code, &issued.email_code)
        .await
        .unwrap();

    assert_eq!(first, VerifyOutcome::Verified);
    assert_eq!(first.message(), "OTP verification successful.");
    assert!(store.get(&pair()).await.unwrap().is_none());
    assert_eq!(second, VerifyOutcome::NotFound);
}

#[tokio::test]
async fn test_partial_match_is_mismatch_and_keeps_record() {
    let (service, store, _) = create_service(OtpServiceConfig::default());
    store
        .put(&pair(), record_with_codes("111111", "222222", 300))
        .await
        .unwrap();

    let wrong_email = service.verify_otp(&pair(), "111111", "000000").await.unwrap();
    let wrong_mobile = service.verify_otp(&pair(), "000000", "222222").await.unwrap();
    let swapped = service.verify_otp(&pair(), "222222", "111111").await.unwrap();

    assert_eq!(wrong_email, VerifyOutcome::Mismatch);
    assert_eq!(wrong_mobile, VerifyOutcome::Mismatch);
    assert_eq!(swapped, VerifyOutcome::Mismatch);
    assert_eq!(wrong_email.message(), "Invalid OTP(s).");

    // No attempt limit: the correct codes still work afterwards
    let outcome = service.verify_otp(&pair(), "111111", "222222").await.unwrap();
    assert_eq!(outcome, VerifyOutcome::Verified);
}

#[tokio::test]
async fn test_resend_invalidates_previous_codes() {
    let (service, store, _) = create_service(OtpServiceConfig::default());
    let first = service.send_otp(&pair()).await.unwrap();
    let mut second = service.send_otp(&pair()).await.unwrap();
    // Independent draws can repeat; force distinct codes for a deterministic check
    while second.mobile_code == first.mobile_code && second.email_code == first.email_code {
        second = service.send_otp(&pair()).await.unwrap();
    }

    let stale = service
        .verify_otp(&pair(), &first.mobile_code, &first.email_code)
        .await
        .unwrap();
    assert_eq!(stale, VerifyOutcome::Mismatch);
    assert!(store.get(&pair()).await.unwrap().is_some());

    let fresh = service
        .verify_otp(&pair(), &second.mobile_code, &second.email_code)
        .await
        .unwrap();
    assert_eq!(fresh, VerifyOutcome::Verified);
}

#[tokio::test]
async fn test_expired_takes_precedence_over_mismatch() {
    let (service, store, _) = create_service(OtpServiceConfig::default());
    store
        .put(&pair(), record_with_codes("111111", "222222", -1))
        .await
        .unwrap();

    let correct = service.verify_otp(&pair(), "111111", "222222").await.unwrap();
    let wrong = service.verify_otp(&pair(), "000000", "000000").await.unwrap();

    assert_eq!(correct, VerifyOutcome::Expired);
    assert_eq!(wrong, VerifyOutcome::Expired);
    assert_eq!(correct.message(), "OTP expired. Please request again.");
    // Lazy expiry leaves the stale record in place by default
    assert!(store.get(&pair()).await.unwrap().is_some());
}

#[tokio::test]
async fn test_expired_record_deleted_on_read_when_configured() {
    let (service, store, _) =
        create_service(OtpServiceConfig::default().with_delete_expired_on_read(true));
    store
        .put(&pair(), record_with_codes("111111", "222222", -1))
        .await
        .unwrap();

    let outcome = service.verify_otp(&pair(), "111111", "222222").await.unwrap();
    let repeat = service.verify_otp(&pair(), "111111", "222222").await.unwrap();

    assert_eq!(outcome, VerifyOutcome::Expired);
    assert_eq!(repeat, VerifyOutcome::NotFound);
}

#[tokio::test]
async fn test_codes_expire_after_validity_window() {
    let (service, _, _) = create_service(
        OtpServiceConfig::default().with_validity_window(Duration::milliseconds(50)),
    );
    let issued = service.send_otp(&pair()).await.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(120)).await;

    let outcome = service
        .verify_otp(&pair(), &issued.mobile_code, &issued.email_code)
        .await
        .unwrap();
    assert_eq!(outcome, VerifyOutcome::Expired);
}

#[tokio::test]
async fn test_verify_racing_resend_never_consumes_newer_record() {
    let replacement = record_with_codes("999999", "888888", 300);
    let store = Arc::new(ResendingStore::new(replacement.clone()));
    store
        .put(&pair(), record_with_codes("111111", "222222", 300))
        .await
        .unwrap();
    let service = OtpService::new(
        store.clone(),
        Arc::new(RecordingDelivery::new(false)),
        OtpServiceConfig::default(),
    )
    .unwrap();

    let outcome = service.verify_otp(&pair(), "111111", "222222").await.unwrap();

    // The old codes lost to the re-send and are re-evaluated against the new record
    assert_eq!(outcome, VerifyOutcome::Mismatch);
    assert_eq!(store.consume_calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.get(&pair()).await.unwrap(), Some(replacement));
}

#[tokio::test]
async fn test_concurrent_verifications_have_single_winner() {
    let (service, _, _) = create_service(OtpServiceConfig::default());
    let service = Arc::new(service);
    let issued = service.send_otp(&pair()).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = service.clone();
        let issued = issued.clone();
        handles.push(tokio::spawn(async move {
            service
                .verify_otp(&pair(), &issued.mobile_code, &issued.email_code)
                .await
                .unwrap()
        }));
    }

    let mut verified = 0;
    for handle in handles {
        match handle.await.unwrap() {
            VerifyOutcome::Verified => verified += 1,
            VerifyOutcome::NotFound => {}
            other => panic!("unexpected outcome {:?}", other),
        }
    }
    assert_eq!(verified, 1);
}

#[tokio::test]
async fn test_scenario_send_verify_repeat() {
    let (service, store, delivery) = create_service(OtpServiceConfig::default());
    let pair = IdentityPair::new("555-0100", "a@x.com");

    service.send_otp(&pair).await.unwrap();
    let mobile_code = delivery.last_code(ChannelKind::Mobile, "555-0100").unwrap();
    let email_code = delivery.last_code(ChannelKind::Email, "a@x.com").unwrap();

    let outcome = service.verify_otp(&pair, &mobile_code, &email_code).await.unwrap();
    assert_eq!(outcome, VerifyOutcome::Verified);
    assert!(store.is_empty().await);

    let repeat = service.verify_otp(&pair, &mobile_code, &email_code).await.unwrap();
    assert_eq!(repeat, VerifyOutcome::NotFound);
}

#[tokio::test]
async fn test_revoke_drops_pending_codes() {
    let (service, _, _) = create_service(OtpServiceConfig::default());
    let issued = service.send_otp(&pair()).await.unwrap();

    service.revoke_otp(&pair()).await.unwrap();
    service.revoke_otp(&pair()).await.unwrap();

    let outcome = service
        .verify_otp(&pair(), &issued.mobile_code, &issued.email_code)
        .await
        .unwrap();
    assert_eq!(outcome, VerifyOutcome::NotFound);
}

#[test]
fn test_invalid_config_is_rejected() {
    let zero = OtpServiceConfig::default().with_code_length(0);
    let oversized = OtpServiceConfig::default().with_code_length(13);
    let no_window = OtpServiceConfig::default().with_validity_window(Duration::zero());

    for config in [zero, oversized, no_window] {
        let result = OtpService::new(
            Arc::new(InMemoryOtpStore::new()),
            Arc::new(RecordingDelivery::new(false)),
            config,
        );
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }
}

#[test]
fn test_config_from_shared_otp_config() {
    let shared = otp_shared::config::OtpConfig {
        code_length: 4,
        validity_seconds: 60,
        delete_expired_on_read: true,
        cleanup_interval_seconds: 0,
    };

    let config = OtpServiceConfig::from(&shared);

    assert_eq!(config.code_length, 4);
    assert_eq!(config.validity_window, Duration::seconds(60));
    assert!(config.delete_expired_on_read);
    assert!(config.validate().is_ok());
}

#[tokio::test]
async fn test_service_over_trait_objects() {
    let store: Arc<dyn OtpStore> = Arc::new(InMemoryOtpStore::new());
    let delivery: Arc<dyn crate::services::otp::DeliveryChannel> =
        Arc::new(RecordingDelivery::new(false));
    let service = OtpService::new(store, delivery, OtpServiceConfig::default()).unwrap();

    let issued = service.send_otp(&pair()).await.unwrap();
    let outcome = service
        .verify_otp(&pair(), &issued.mobile_code, &issued.email_code)
        .await
        .unwrap();

    assert_eq!(outcome, VerifyOutcome::Verified);
    assert_eq!(service.store().backend_name(), "memory");
}
