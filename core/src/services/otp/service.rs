//! Passcode issuance and verification

use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use constant_time_eq::constant_time_eq;
use nt_shared::email::{is_valid_email, mask_email, normalize_email};

use crate::domain::entities::otp_record::OtpRecord;
use crate::errors::{DomainError, DomainResult};

use super::clock::{Clock, SystemClock};
use super::config::OtpServiceConfig;
use super::generator::{CodeGenerator, SecureCodeGenerator};
use super::traits::{Notifier, OtpStore};
use super::types::{IssueReceipt, VerifyOutcome};

/// Passcode service for email identity confirmation
///
/// Holds no per-identity state of its own; all coordination between
/// concurrent requests happens through the store's atomic operations.
pub struct OtpService<S: OtpStore + ?Sized, N: Notifier + ?Sized> {
    /// Store holding the pending passcode per identity
    store: Arc<S>,
    /// Delivery channel for issued passcodes
    notifier: Arc<N>,
    generator: Arc<dyn CodeGenerator>,
    clock: Arc<dyn Clock>,
    config: OtpServiceConfig,
}

impl<S: OtpStore + ?Sized, N: Notifier + ?Sized> OtpService<S, N> {
    /// Create a passcode service using the OS random source and wall clock
    ///
    /// # Returns
    ///
    /// * `Err(DomainError::Validation)` - If `config` is unusable
    pub fn new(store: Arc<S>, notifier: Arc<N>, config: OtpServiceConfig) -> DomainResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            notifier,
            generator: Arc::new(SecureCodeGenerator),
            clock: Arc::new(SystemClock),
            config,
        })
    }

    /// Replace the passcode generator
    pub fn with_generator(mut self, generator: Arc<dyn CodeGenerator>) -> Self {
        self.generator = generator;
        self
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &OtpServiceConfig {
        &self.config
    }

    /// Issue a fresh passcode for an email address and deliver it
    ///
    /// Any passcode already pending for the identity is replaced. The store
    /// write is the commit point: if delivery then fails the new record stays
    /// in place and the caller gets `DomainError::Notifier`; calling `issue`
    /// again replaces it with another fresh code.
    ///
    /// # Arguments
    ///
    /// * `identity` - Email address; trimmed and lowercased before use
    ///
    /// # Returns
    ///
    /// * `Ok(IssueReceipt)` - The stored record and the provider message ID
    /// * `Err(DomainError)` - Validation, randomness, storage or delivery failure
    pub async fn issue(&self, identity: &str) -> DomainResult<IssueReceipt> {
        let identity = normalize_email(identity);
        if !is_valid_email(&identity) {
            tracing::warn!(
                email = %mask_email(&identity),
                event = "otp_invalid_identity",
                "Rejected passcode request for malformed email"
            );
            return Err(DomainError::validation("Invalid email address"));
        }

        let code = self.generator.generate(self.config.code_length)?;
        let record = OtpRecord::new(identity, code, self.now(), self.config.ttl())?;

        self.store.upsert(&record).await.map_err(|e| {
            tracing::error!(
                email = %mask_email(&record.identity),
                error = %e,
                event = "otp_storage_failed",
                "Failed to store passcode"
            );
            e
        })?;

        tracing::info!(
            email = %mask_email(&record.identity),
            expires_at = %record.expires_at,
            event = "otp_issued",
            "Issued new passcode"
        );

        let body = self.config.render_body(&record.code);
        let message_id = self
            .notifier
            .send(&record.identity, &self.config.subject, &body)
            .await
            .map_err(|e| {
                tracing::error!(
                    email = %mask_email(&record.identity),
                    provider = self.notifier.provider_name(),
                    error = %e,
                    event = "otp_delivery_failed",
                    "Passcode stored but delivery failed"
                );
                DomainError::Notifier { message: e }
            })?;

        tracing::debug!(
            email = %mask_email(&record.identity),
            provider = self.notifier.provider_name(),
            message_id = %message_id,
            event = "otp_delivered",
            "Passcode handed to delivery provider"
        );

        Ok(IssueReceipt { record, message_id })
    }

    /// Check a submitted passcode against the pending one
    ///
    /// A wrong code leaves the record pending. An expired record is removed
    /// whenever a matching code is presented for it. A correct unexpired code
    /// consumes the record; when several requests present it concurrently
    /// only one of them observes `Verified`.
    ///
    /// # Returns
    ///
    /// * `Ok(VerifyOutcome)` - The verification result
    /// * `Err(DomainError::StorageUnavailable)` - If the store fails
    pub async fn verify(&self, identity: &str, submitted: &str) -> DomainResult<VerifyOutcome> {
        let identity = normalize_email(identity);
        let masked = mask_email(&identity);

        let record = match self.store.get(&identity).await? {
            Some(record) => record,
            None => {
                tracing::info!(email = %masked, event = "otp_not_found", "No pending passcode");
                return Ok(VerifyOutcome::NoCodeFound);
            }
        };

        if !constant_time_eq(record.code.as_bytes(), submitted.trim().as_bytes()) {
            tracing::warn!(email = %masked, event = "otp_incorrect", "Incorrect passcode submitted");
            return Ok(VerifyOutcome::IncorrectCode);
        }

        if record.is_expired_at(self.now()) {
            let removed = self.store.delete_if_matches(&record).await?;
            tracing::info!(
                email = %masked,
                removed = removed,
                expired_at = %record.expires_at,
                event = "otp_expired",
                "Expired passcode presented"
            );
            return Ok(VerifyOutcome::Expired);
        }

        if self.store.delete_if_matches(&record).await? {
            tracing::info!(email = %masked, event = "otp_verified", "Passcode verified");
            Ok(VerifyOutcome::Verified)
        } else {
            // Consumed or replaced by another request since the lookup
            tracing::info!(
                email = %masked,
                event = "otp_consume_lost",
                "Passcode was consumed or replaced concurrently"
            );
            Ok(VerifyOutcome::NoCodeFound)
        }
    }

    /// Check that the passcode store is reachable
    pub async fn health_check(&self) -> DomainResult<()> {
        self.store.health_check().await.map_err(|e| {
            tracing::warn!(error = %e, event = "otp_store_unhealthy", "Passcode store health check failed");
            e
        })
    }

    /// Drop any pending passcode for an identity
    pub async fn revoke(&self, identity: &str) -> DomainResult<()> {
        let identity = normalize_email(identity);
        self.store.delete(&identity).await?;
        tracing::info!(email = %mask_email(&identity), event = "otp_revoked", "Pending passcode revoked");
        Ok(())
    }

    // MySQL DATETIME(6) keeps microseconds; truncating here keeps the stored
    // issued_at equal to the one compare-and-delete matches on
    fn now(&self) -> DateTime<Utc> {
        self.clock.now().trunc_subsecs(6)
    }
}
