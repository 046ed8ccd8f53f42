//! Helpers shared by the HTTP tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use actix_web::web;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use otp_api::AppState;
use otp_core::{
    ChannelKind, DeliveryChannel, DomainError, IdentityPair, InMemoryOtpStore, OtpRecord,
    OtpService, OtpServiceConfig, OtpStore,
};

pub const MOBILE: &str = "555-0100";
pub const EMAIL: &str = "a@x.com";

/// Delivery channel that keeps every code it is handed
#[derive(Default)]
pub struct CapturingDelivery {
    sent: Mutex<Vec<(ChannelKind, String, String)>>,
}

impl CapturingDelivery {
    pub fn last_code(&self, channel: ChannelKind, destination: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(c, d, _)| *c == channel && d == destination)
            .map(|(_, _, code)| code.clone())
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl DeliveryChannel for CapturingDelivery {
    async fn notify(&self, channel: ChannelKind, destination: &str, code: &str) -> Result<(), String> {
        self.sent
            .lock()
            .unwrap()
            .push((channel, destination.to_string(), code.to_string()));
        Ok(())
    }

    fn provider_name(&self) -> &str {
        "capturing"
    }
}

/// Store that is permanently unreachable
pub struct UnavailableStore;

#[async_trait]
impl OtpStore for UnavailableStore {
    async fn put(&self, _pair: &IdentityPair, _record: OtpRecord) -> Result<(), DomainError> {
        Err(DomainError::storage("database is locked"))
    }

    async fn get(&self, _pair: &IdentityPair) -> Result<Option<OtpRecord>, DomainError> {
        Err(DomainError::storage("database is locked"))
    }

    async fn delete(&self, _pair: &IdentityPair) -> Result<(), DomainError> {
        Err(DomainError::storage("database is locked"))
    }

    async fn consume(&self, _pair: &IdentityPair, _expected: &OtpRecord) -> Result<bool, DomainError> {
        Err(DomainError::storage("database is locked"))
    }

    async fn purge_expired(&self, _now: DateTime<Utc>) -> Result<u64, DomainError> {
        Err(DomainError::storage("database is locked"))
    }

    fn backend_name(&self) -> &'static str {
        "unavailable"
    }
}

pub struct TestContext {
    pub store: Arc<InMemoryOtpStore>,
    pub delivery: Arc<CapturingDelivery>,
    pub state: web::Data<AppState<InMemoryOtpStore, CapturingDelivery>>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(OtpServiceConfig::default())
    }

    pub fn with_config(config: OtpServiceConfig) -> Self {
        let store = Arc::new(InMemoryOtpStore::new());
        let delivery = Arc::new(CapturingDelivery::default());
        let service = OtpService::new(store.clone(), delivery.clone(), config).unwrap();

        Self {
            store,
            delivery,
            state: web::Data::new(AppState::new(Arc::new(service))),
        }
    }

    pub fn codes_for(&self, mobile: &str, email: &str) -> (String, String) {
        (
            self.delivery.last_code(ChannelKind::Mobile, mobile).unwrap(),
            self.delivery.last_code(ChannelKind::Email, email).unwrap(),
        )
    }
}

pub fn send_body(mobile: &str, email: &str) -> serde_json::Value {
    serde_json::json!({ "mobile": mobile, "email": email })
}

pub fn verify_body(mobile: &str, email: &str, mobile_otp: &str, email_otp: &str) -> serde_json::Value {
    serde_json::json!({
        "mobile": mobile,
        "email": email,
        "mobileOtp": mobile_otp,
        "emailOtp": email_otp,
    })
}
