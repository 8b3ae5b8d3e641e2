//! # Notification Core
//!
//! Core business logic for one-time passcode issuance and verification.
//! This crate contains the passcode entity, the issuance/verification service,
//! the storage and delivery interfaces it depends on, and the error types
//! that form the foundation of the application architecture.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
