//! Database module - MySQL implementations using SQLx
//!
//! This module provides database access layer implementations including:
//! - Connection pool management
//! - The passcode table schema and startup migration
//! - The MySQL passcode store

pub mod connection;
pub mod mysql;
pub mod schema;

// Re-export commonly used types
pub use connection::DatabasePool;
pub use mysql::MySqlOtpStore;
