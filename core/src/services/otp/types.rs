//! Types for passcode service results

use crate::domain::entities::otp_record::OtpRecord;

/// Result of issuing a passcode
#[derive(Debug, Clone)]
pub struct IssueReceipt {
    /// The record that was stored
    pub record: OtpRecord,
    /// The message ID returned by the delivery provider
    pub message_id: String,
}

/// Outcome of a verification attempt
///
/// Only `Verified` grants access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// The code matched an unexpired record, which has now been consumed
    Verified,
    /// No passcode is pending for the identity
    NoCodeFound,
    /// The submitted code did not match; the record stays pending
    IncorrectCode,
    /// The pending passcode's lifetime had passed; it has been removed
    Expired,
}

impl VerifyOutcome {
    pub fn is_verified(&self) -> bool {
        matches!(self, VerifyOutcome::Verified)
    }

    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            VerifyOutcome::Verified => "VERIFIED",
            VerifyOutcome::NoCodeFound => "NO_CODE_FOUND",
            VerifyOutcome::IncorrectCode => "INCORRECT_CODE",
            VerifyOutcome::Expired => "CODE_EXPIRED",
        }
    }

    /// Human-readable description
    pub fn message(&self) -> &'static str {
        match self {
            VerifyOutcome::Verified => "OTP verified",
            VerifyOutcome::NoCodeFound => "No OTP found",
            VerifyOutcome::IncorrectCode => "Incorrect OTP",
            VerifyOutcome::Expired => "OTP expired",
        }
    }
}
