//! Configuration for the passcode service

use chrono::Duration;
use nt_shared::config::otp::{DEFAULT_CODE_LENGTH, DEFAULT_TTL_MINUTES};
use nt_shared::OtpConfig;

use crate::errors::{DomainError, DomainResult};

/// Longest passcode the stores are sized for
pub const MAX_CODE_LENGTH: usize = 16;

/// Configuration for the passcode service
#[derive(Debug, Clone)]
pub struct OtpServiceConfig {
    /// Number of digits in each passcode
    pub code_length: usize,
    /// Minutes a passcode stays valid
    pub ttl_minutes: i64,
    /// Subject line of the delivery message
    pub subject: String,
    /// Message body; `{code}` and `{ttl_minutes}` are substituted
    pub body_template: String,
}

impl Default for OtpServiceConfig {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            ttl_minutes: DEFAULT_TTL_MINUTES,
            subject: "Your OTP Code".to_string(),
            body_template: "Your OTP is: {code}".to_string(),
        }
    }
}

impl From<&OtpConfig> for OtpServiceConfig {
    fn from(config: &OtpConfig) -> Self {
        Self {
            code_length: config.code_length,
            ttl_minutes: config.ttl_minutes,
            subject: config.subject.clone(),
            body_template: config.body_template.clone(),
        }
    }
}

impl OtpServiceConfig {
    /// Reject settings the service cannot operate with
    pub fn validate(&self) -> DomainResult<()> {
        if self.code_length == 0 || self.code_length > MAX_CODE_LENGTH {
            return Err(DomainError::validation(format!(
                "Passcode length must be between 1 and {}, got {}",
                MAX_CODE_LENGTH, self.code_length
            )));
        }
        if self.ttl_minutes <= 0 {
            return Err(DomainError::validation(format!(
                "Passcode lifetime must be positive, got {} minutes",
                self.ttl_minutes
            )));
        }
        if !self.body_template.contains("{code}") {
            return Err(DomainError::validation(
                "Message body template must contain {code}",
            ));
        }
        Ok(())
    }

    pub fn ttl(&self) -> Duration {
        Duration::minutes(self.ttl_minutes)
    }

    /// Render the delivery message body for `code`
    pub fn render_body(&self, code: &str) -> String {
        self.body_template
            .replace("{ttl_minutes}", &self.ttl_minutes.to_string())
            .replace("{code}", code)
    }
}
