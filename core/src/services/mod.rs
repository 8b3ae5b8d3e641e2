//! Business services containing domain logic and use cases.

pub mod otp;

// Re-export commonly used types
pub use otp::{
    Clock, CodeGenerator, IssueReceipt, Notifier, OtpService, OtpServiceConfig, OtpStore,
    OtpSweepConfig, OtpSweepService, SecureCodeGenerator, SystemClock, VerifyOutcome,
};
