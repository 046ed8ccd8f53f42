//! In-memory implementation of `OtpStore`.
//!
//! Used by tests and by the `memory` storage backend in development. Every operation
//! holds the map lock for its full duration, which serialises calls per process.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::{IdentityPair, OtpRecord};
use crate::errors::DomainError;

use super::r#trait::OtpStore;

/// HashMap-backed OTP store
#[derive(Clone, Default)]
pub struct InMemoryOtpStore {
    records: Arc<RwLock<HashMap<IdentityPair, OtpRecord>>>,
}

impl InMemoryOtpStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held, expired ones included
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl OtpStore for InMemoryOtpStore {
    async fn put(&self, pair: &IdentityPair, record: OtpRecord) -> Result<(), DomainError> {
        self.records.write().await.insert(pair.clone(), record);
        Ok(())
    }

    async fn get(&self, pair: &IdentityPair) -> Result<Option<OtpRecord>, DomainError> {
        Ok(self.records.read().await.get(pair).cloned())
    }

    async fn delete(&self, pair: &IdentityPair) -> Result<(), DomainError> {
        self.records.write().await.remove(pair);
        Ok(())
    }

    async fn consume(&self, pair: &IdentityPair, expected: &OtpRecord) -> Result<bool, DomainError> {
        let mut records = self.records.write().await;
        match records.get(pair) {
            Some(current) if current == expected => {
                records.remove(pair);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, record| !record.is_expired_at(now));
        Ok((before - records.len()) as u64)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn close(&self) {
        self.records.write().await.clear();
    }
}
