//! Domain-specific error types and error handling.

use thiserror::Error;

/// Core domain errors
///
/// Verification outcomes (wrong code, expired code, nothing pending) are not
/// errors; they are reported through `VerifyOutcome`.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// The secure random source could not supply entropy
    #[error("Secure randomness unavailable: {message}")]
    RandomnessUnavailable { message: String },

    /// The passcode store could not complete the operation
    #[error("Storage unavailable: {message}")]
    StorageUnavailable { message: String },

    /// The passcode was stored but could not be delivered
    #[error("Notification delivery failed: {message}")]
    Notifier { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    /// Stable machine-readable code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } => "VALIDATION_ERROR",
            DomainError::RandomnessUnavailable { .. } => "RANDOMNESS_UNAVAILABLE",
            DomainError::StorageUnavailable { .. } => "STORAGE_UNAVAILABLE",
            DomainError::Notifier { .. } => "NOTIFIER_ERROR",
            DomainError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Whether re-invoking the same operation may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DomainError::StorageUnavailable { .. } | DomainError::Notifier { .. }
        )
    }

    pub fn storage(message: impl Into<String>) -> Self {
        DomainError::StorageUnavailable {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation {
            message: message.into(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
