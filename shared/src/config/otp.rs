//! One-time passcode settings

use serde::{Deserialize, Serialize};

/// Default number of digits in a passcode
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Default passcode lifetime in minutes
pub const DEFAULT_TTL_MINUTES: i64 = 5;

/// Issuance, expiry and sweep settings for passcodes
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Number of digits in each passcode
    #[serde(default = "default_code_length")]
    pub code_length: usize,

    /// Minutes a passcode stays valid after issuance
    #[serde(default = "default_ttl_minutes")]
    pub ttl_minutes: i64,

    /// Subject line of the delivery message
    #[serde(default = "default_subject")]
    pub subject: String,

    /// Body of the delivery message; `{code}` and `{ttl_minutes}` are substituted
    #[serde(default = "default_body_template")]
    pub body_template: String,

    /// Run the background expiry sweep
    #[serde(default)]
    pub sweep_enabled: bool,

    /// Seconds between sweep runs
    #[serde(default = "default_sweep_interval_seconds")]
    pub sweep_interval_seconds: u64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            ttl_minutes: default_ttl_minutes(),
            subject: default_subject(),
            body_template: default_body_template(),
            sweep_enabled: false,
            sweep_interval_seconds: default_sweep_interval_seconds(),
        }
    }
}

impl OtpConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let code_length = std::env::var("OTP_CODE_LENGTH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.code_length);
        let ttl_minutes = std::env::var("OTP_EXPIRY_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.ttl_minutes);
        let sweep_enabled = std::env::var("OTP_SWEEP_ENABLED")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(defaults.sweep_enabled);

        Self {
            code_length,
            ttl_minutes,
            sweep_enabled,
            ..defaults
        }
    }
}

fn default_code_length() -> usize {
    DEFAULT_CODE_LENGTH
}

fn default_ttl_minutes() -> i64 {
    DEFAULT_TTL_MINUTES
}

fn default_subject() -> String {
    String::from("Your OTP Code")
}

fn default_body_template() -> String {
    String::from("Your OTP is: {code}")
}

fn default_sweep_interval_seconds() -> u64 {
    300
}
