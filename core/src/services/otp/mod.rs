//! One-time passcode service for email identity confirmation
//!
//! This module provides the passcode workflow:
//! - Secure numeric code generation
//! - Issuance with replace-in-place semantics and delivery
//! - Single-use verification with expiry
//! - Optional background sweep of abandoned records

mod cleanup;
mod clock;
mod config;
mod generator;
mod service;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use cleanup::{OtpSweepConfig, OtpSweepService};
pub use clock::{Clock, SystemClock};
pub use config::{OtpServiceConfig, MAX_CODE_LENGTH};
pub use generator::{CodeGenerator, SecureCodeGenerator};
pub use service::OtpService;
pub use traits::{Notifier, OtpStore};
pub use types::{IssueReceipt, VerifyOutcome};
