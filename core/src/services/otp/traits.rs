//! Traits for passcode storage and delivery integration

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::otp_record::OtpRecord;
use crate::errors::DomainResult;

/// Keyed store holding at most one passcode record per identity
///
/// Every mutation is a single atomic operation for its identity. Backend
/// failures are reported as `DomainError::StorageUnavailable`.
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Insert the record, or overwrite every field of the existing record for
    /// the same identity
    async fn upsert(&self, record: &OtpRecord) -> DomainResult<()>;

    /// Fetch the current record for an identity
    async fn get(&self, identity: &str) -> DomainResult<Option<OtpRecord>>;

    /// Remove the record for an identity; removing nothing is not an error
    async fn delete(&self, identity: &str) -> DomainResult<()>;

    /// Remove the stored record only if it is still the same issuance as
    /// `record` (same identity, code and issue time)
    ///
    /// Returns `true` if this call removed it. Of several concurrent callers
    /// holding the same record, at most one observes `true`.
    async fn delete_if_matches(&self, record: &OtpRecord) -> DomainResult<bool>;

    /// Remove every record that expired before `now`, returning how many
    async fn delete_expired(&self, now: DateTime<Utc>) -> DomainResult<usize>;

    /// Confirm the backend is reachable
    ///
    /// Stores without an external backend are always healthy.
    async fn health_check(&self) -> DomainResult<()> {
        Ok(())
    }
}

/// Outbound delivery of a passcode to its recipient
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send a message, returning the provider's message identifier
    async fn send(&self, destination: &str, subject: &str, body: &str) -> Result<String, String>;

    /// Name of the delivery provider, for logs
    fn provider_name(&self) -> &str {
        "unknown"
    }
}
