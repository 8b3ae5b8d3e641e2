//! Shared utilities and common types for the notification service
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Utility functions (email normalization, validation, masking)

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, DatabaseConfig, Environment, LogFormat, LoggingConfig, MailConfig,
    MailProvider, OtpConfig, ServerConfig, StorageBackend, StorageConfig,
};
pub use utils::email;
