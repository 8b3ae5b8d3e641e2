//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the notification
//! service, following Clean Architecture principles. It provides concrete
//! implementations of the passcode store and notifier interfaces declared in
//! `nt_core`.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Database**: MySQL passcode store using SQLx
//! - **Cache**: Redis client and Redis-backed passcode store
//! - **Store**: In-memory passcode store for development and tests
//! - **Mail**: SMTP delivery through lettre, plus a mock notifier
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)
//! - `redis-cache`: Enable Redis caching support (default)
//! - `smtp-mail`: Enable SMTP mail delivery (default)

// Re-export core types for convenience
pub use nt_core::errors::*;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Cache module - Redis client and operations
#[cfg(feature = "redis-cache")]
pub mod cache;

/// In-process store implementations
pub mod store;

/// Mail delivery module
pub mod mail;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Stored value could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Mail delivery error
    #[error("Mail error: {0}")]
    Mail(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Database(_)
            | InfrastructureError::Cache(_)
            | InfrastructureError::Serialization(_) => DomainError::StorageUnavailable {
                message: err.to_string(),
            },
            InfrastructureError::Mail(message) => DomainError::Notifier { message },
            InfrastructureError::Config(message) => DomainError::Internal { message },
        }
    }
}
