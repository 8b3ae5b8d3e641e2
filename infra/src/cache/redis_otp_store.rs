//! Redis implementation of the passcode store
//!
//! Each identity maps to one JSON value under `otp:{identity}` (behind the
//! configured key prefix). The key TTL covers the passcode lifetime plus a
//! grace period, so an expired record can still be read and reported as
//! expired before Redis drops it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use nt_core::domain::OtpRecord;
use nt_core::errors::{DomainError, DomainResult};
use nt_core::services::otp::OtpStore;
use nt_shared::email::mask_email;

use crate::cache::RedisClient;
use crate::InfrastructureError;

/// Redis key namespace for passcode records
const OTP_KEY_PREFIX: &str = "otp";

/// Seconds a record outlives its expiry in Redis
pub const EXPIRED_GRACE_SECONDS: u64 = 60;

/// Redis-backed passcode store
pub struct RedisOtpStore {
    client: RedisClient,
}

impl RedisOtpStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    fn key(&self, identity: &str) -> String {
        self.client
            .config()
            .make_key(&format!("{}:{}", OTP_KEY_PREFIX, identity))
    }

    fn key_ttl(&self, record: &OtpRecord) -> u64 {
        let lifetime = (record.expires_at - record.issued_at).num_seconds().max(1) as u64;
        lifetime + EXPIRED_GRACE_SECONDS
    }

    fn storage_error(operation: &str, identity: &str, e: InfrastructureError) -> DomainError {
        error!(
            email = %mask_email(identity),
            operation = operation,
            error = %e,
            event = "otp_store_error",
            "Redis passcode store operation failed"
        );
        e.into()
    }
}

/// Canonical stored form of a record; compare-and-delete matches on it byte for byte
pub(crate) fn encode(record: &OtpRecord) -> Result<String, InfrastructureError> {
    Ok(serde_json::to_string(record)?)
}

pub(crate) fn decode(value: &str) -> Result<OtpRecord, InfrastructureError> {
    Ok(serde_json::from_str(value)?)
}

#[async_trait]
impl OtpStore for RedisOtpStore {
    async fn upsert(&self, record: &OtpRecord) -> DomainResult<()> {
        let value = encode(record).map_err(|e| Self::storage_error("encode", &record.identity, e))?;

        self.client
            .set_with_expiry(&self.key(&record.identity), &value, self.key_ttl(record))
            .await
            .map_err(|e| Self::storage_error("upsert", &record.identity, e))?;

        debug!(email = %mask_email(&record.identity), "Stored passcode in Redis");
        Ok(())
    }

    async fn get(&self, identity: &str) -> DomainResult<Option<OtpRecord>> {
        let value = self
            .client
            .get(&self.key(identity))
            .await
            .map_err(|e| Self::storage_error("get", identity, e))?;

        value
            .as_deref()
            .map(decode)
            .transpose()
            .map_err(|e| Self::storage_error("decode", identity, e))
    }

    async fn delete(&self, identity: &str) -> DomainResult<()> {
        self.client
            .delete(&self.key(identity))
            .await
            .map_err(|e| Self::storage_error("delete", identity, e))?;
        Ok(())
    }

    async fn delete_if_matches(&self, record: &OtpRecord) -> DomainResult<bool> {
        let expected = encode(record).map_err(|e| Self::storage_error("encode", &record.identity, e))?;

        self.client
            .compare_and_delete(&self.key(&record.identity), &expected)
            .await
            .map_err(|e| Self::storage_error("delete_if_matches", &record.identity, e))
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> DomainResult<usize> {
        let pattern = self.key("*");
        let keys = self
            .client
            .scan_keys(&pattern)
            .await
            .map_err(|e| Self::storage_error("scan", "", e))?;

        let mut removed = 0;
        for key in keys {
            let value = match self.client.get(&key).await {
                Ok(Some(value)) => value,
                Ok(None) => continue,
                Err(e) => return Err(Self::storage_error("get", "", e)),
            };
            // Values that no longer decode are left for their TTL to reclaim
            let Ok(record) = decode(&value) else { continue };
            if record.is_expired_at(now)
                && self
                    .client
                    .compare_and_delete(&key, &value)
                    .await
                    .map_err(|e| Self::storage_error("delete_expired", &record.identity, e))?
            {
                removed += 1;
            }
        }

        if removed > 0 {
            info!(removed = removed, "Deleted expired passcodes from Redis");
        }
        Ok(removed)
    }

    async fn health_check(&self) -> DomainResult<()> {
        match self.client.health_check().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(DomainError::storage("Redis returned an unexpected PING reply")),
            Err(e) => Err(e.into()),
        }
    }
}
