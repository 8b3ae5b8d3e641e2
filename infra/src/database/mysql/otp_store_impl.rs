//! MySQL implementation of the passcode store
//!
//! Each operation is one SQL statement, so per-identity mutations are
//! serialized by InnoDB row locking on the primary key. Timestamps are stored
//! as naive UTC in `DATETIME(6)` columns.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{mysql::MySqlRow, Row};
use tracing::{debug, error, info};

use nt_core::domain::OtpRecord;
use nt_core::errors::{DomainError, DomainResult};
use nt_core::services::otp::OtpStore;
use nt_shared::email::mask_email;

use crate::database::DatabasePool;
use crate::InfrastructureError;

/// MySQL-backed passcode store using the `otp_codes` table
pub struct MySqlOtpStore {
    db: DatabasePool,
}

impl MySqlOtpStore {
    /// Create a new store on an existing pool
    pub fn new(db: DatabasePool) -> Self {
        Self { db }
    }

    fn map_row(row: &MySqlRow) -> Result<OtpRecord, sqlx::Error> {
        let issued_at: NaiveDateTime = row.try_get("issued_at")?;
        let expires_at: NaiveDateTime = row.try_get("expires_at")?;

        Ok(OtpRecord {
            identity: row.try_get("identity")?,
            code: row.try_get("code")?,
            issued_at: DateTime::from_naive_utc_and_offset(issued_at, Utc),
            expires_at: DateTime::from_naive_utc_and_offset(expires_at, Utc),
        })
    }

    fn storage_error(operation: &str, identity: &str, e: sqlx::Error) -> DomainError {
        error!(
            email = %mask_email(identity),
            operation = operation,
            error = %e,
            event = "otp_store_error",
            "MySQL passcode store operation failed"
        );
        InfrastructureError::Database(e).into()
    }
}

#[async_trait]
impl OtpStore for MySqlOtpStore {
    async fn upsert(&self, record: &OtpRecord) -> DomainResult<()> {
        let query = r#"
            INSERT INTO otp_codes (identity, code, issued_at, expires_at)
            VALUES (?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                code = VALUES(code),
                issued_at = VALUES(issued_at),
                expires_at = VALUES(expires_at)
        "#;

        sqlx::query(query)
            .bind(&record.identity)
            .bind(&record.code)
            .bind(record.issued_at.naive_utc())
            .bind(record.expires_at.naive_utc())
            .execute(self.db.get_pool())
            .await
            .map_err(|e| Self::storage_error("upsert", &record.identity, e))?;

        debug!(email = %mask_email(&record.identity), "Stored passcode in MySQL");
        Ok(())
    }

    async fn get(&self, identity: &str) -> DomainResult<Option<OtpRecord>> {
        let query = r#"
            SELECT identity, code, issued_at, expires_at
            FROM otp_codes
            WHERE identity = ?
        "#;

        let row = sqlx::query(query)
            .bind(identity)
            .fetch_optional(self.db.get_pool())
            .await
            .map_err(|e| Self::storage_error("get", identity, e))?;

        row.as_ref()
            .map(Self::map_row)
            .transpose()
            .map_err(|e| Self::storage_error("decode", identity, e))
    }

    async fn delete(&self, identity: &str) -> DomainResult<()> {
        sqlx::query("DELETE FROM otp_codes WHERE identity = ?")
            .bind(identity)
            .execute(self.db.get_pool())
            .await
            .map_err(|e| Self::storage_error("delete", identity, e))?;
        Ok(())
    }

    async fn delete_if_matches(&self, record: &OtpRecord) -> DomainResult<bool> {
        let query = r#"
            DELETE FROM otp_codes
            WHERE identity = ? AND code = ? AND issued_at = ?
        "#;

        let result = sqlx::query(query)
            .bind(&record.identity)
            .bind(&record.code)
            .bind(record.issued_at.naive_utc())
            .execute(self.db.get_pool())
            .await
            .map_err(|e| Self::storage_error("delete_if_matches", &record.identity, e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> DomainResult<usize> {
        let result = sqlx::query("DELETE FROM otp_codes WHERE expires_at < ?")
            .bind(now.naive_utc())
            .execute(self.db.get_pool())
            .await
            .map_err(|e| Self::storage_error("delete_expired", "", e))?;

        let removed = result.rows_affected() as usize;
        if removed > 0 {
            info!(removed = removed, "Deleted expired passcodes from MySQL");
        }
        Ok(removed)
    }

    async fn health_check(&self) -> DomainResult<()> {
        match self.db.health_check().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(DomainError::storage("MySQL returned an unexpected health check value")),
            Err(e) => Err(e.into()),
        }
    }
}
