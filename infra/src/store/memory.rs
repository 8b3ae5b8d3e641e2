//! In-memory passcode store
//!
//! Suitable for development and single-process deployments. Records are lost
//! on restart.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use nt_core::domain::OtpRecord;
use nt_core::errors::DomainResult;
use nt_core::services::otp::OtpStore;

/// Passcode store over a lock-guarded map
#[derive(Default)]
pub struct MemoryOtpStore {
    records: RwLock<HashMap<String, OtpRecord>>,
}

impl MemoryOtpStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl OtpStore for MemoryOtpStore {
    async fn upsert(&self, record: &OtpRecord) -> DomainResult<()> {
        self.records
            .write()
            .await
            .insert(record.identity.clone(), record.clone());
        Ok(())
    }

    async fn get(&self, identity: &str) -> DomainResult<Option<OtpRecord>> {
        Ok(self.records.read().await.get(identity).cloned())
    }

    async fn delete(&self, identity: &str) -> DomainResult<()> {
        self.records.write().await.remove(identity);
        Ok(())
    }

    async fn delete_if_matches(&self, record: &OtpRecord) -> DomainResult<bool> {
        let mut records = self.records.write().await;
        let matches = records
            .get(&record.identity)
            .is_some_and(|stored| stored.is_same_issuance(record));
        if matches {
            records.remove(&record.identity);
        }
        Ok(matches)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> DomainResult<usize> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, record| !record.is_expired_at(now));
        let removed = before - records.len();
        debug!(removed = removed, "Swept in-memory passcode store");
        Ok(removed)
    }
}
