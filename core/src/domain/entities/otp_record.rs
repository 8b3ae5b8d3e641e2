//! Passcode record entity for email-based identity confirmation.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, DomainResult};

/// The pending passcode for one identity
///
/// A record exists only while its passcode is outstanding: verification and
/// expiry discovery delete it, re-issuance replaces it in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    /// Normalized email address the passcode was issued for
    pub identity: String,

    /// The numeric passcode
    pub code: String,

    /// Timestamp when the passcode was issued or last replaced
    pub issued_at: DateTime<Utc>,

    /// Timestamp after which the passcode is no longer accepted
    pub expires_at: DateTime<Utc>,
}

impl OtpRecord {
    /// Creates a record valid for `ttl` from `issued_at`
    ///
    /// # Returns
    ///
    /// * `Err(DomainError::Validation)` - If `ttl` is not strictly positive
    pub fn new(
        identity: impl Into<String>,
        code: impl Into<String>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> DomainResult<Self> {
        if ttl <= Duration::zero() {
            return Err(DomainError::validation(format!(
                "Passcode lifetime must be positive, got {}s",
                ttl.num_seconds()
            )));
        }

        Ok(Self {
            identity: identity.into(),
            code: code.into(),
            issued_at,
            expires_at: issued_at + ttl,
        })
    }

    /// Checks if the passcode has expired at `now`
    ///
    /// A passcode presented exactly at `expires_at` is still valid.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Time remaining until expiration, or zero if already expired
    pub fn time_until_expiration(&self, now: DateTime<Utc>) -> Duration {
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }

    /// Whether `other` is the very same issuance as this record
    ///
    /// Stores use this to delete only the record a verifier inspected, never
    /// a replacement written by a concurrent re-issue.
    pub fn is_same_issuance(&self, other: &OtpRecord) -> bool {
        self.identity == other.identity
            && self.code == other.code
            && self.issued_at == other.issued_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_new_record_expires_after_ttl() {
        let record = OtpRecord::new("a@x.com", "123456", issued_at(), Duration::minutes(5)).unwrap();

        assert_eq!(record.identity, "a@x.com");
        assert_eq!(record.code, "123456");
        assert_eq!(record.expires_at, issued_at() + Duration::minutes(5));
        assert!(record.expires_at > record.issued_at);
    }

    #[test]
    fn test_non_positive_ttl_is_rejected() {
        let zero = OtpRecord::new("a@x.com", "123456", issued_at(), Duration::zero());
        assert!(matches!(zero, Err(DomainError::Validation { .. })));

        let negative = OtpRecord::new("a@x.com", "123456", issued_at(), Duration::minutes(-1));
        assert!(matches!(negative, Err(DomainError::Validation { .. })));
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let record = OtpRecord::new("a@x.com", "123456", issued_at(), Duration::minutes(5)).unwrap();

        assert!(!record.is_expired_at(record.issued_at));
        assert!(!record.is_expired_at(record.expires_at));
        assert!(record.is_expired_at(record.expires_at + Duration::milliseconds(1)));
    }

    #[test]
    fn test_time_until_expiration() {
        let record = OtpRecord::new("a@x.com", "123456", issued_at(), Duration::minutes(5)).unwrap();

        assert_eq!(
            record.time_until_expiration(issued_at() + Duration::minutes(2)),
            Duration::minutes(3)
        );
        assert_eq!(
            record.time_until_expiration(issued_at() + Duration::minutes(6)),
            Duration::zero()
        );
    }

    #[test]
    fn test_same_issuance() {
        let original = OtpRecord::new("a@x.com", "123456", issued_at(), Duration::minutes(5)).unwrap();
        let reissued = OtpRecord::new(
            "a@x.com",
            "123456",
            issued_at() + Duration::seconds(1),
            Duration::minutes(5),
        )
        .unwrap();

        assert!(original.is_same_issuance(&original.clone()));
        assert!(!original.is_same_issuance(&reissued));
    }

    #[test]
    fn test_serialization() {
        let record = OtpRecord::new("a@x.com", "004217", issued_at(), Duration::minutes(5)).unwrap();

        let json = serde_json::to_string(&record).unwrap();
        let deserialized: OtpRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(record, deserialized);
    }
}
