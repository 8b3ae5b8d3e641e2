//! Outbound mail configuration

use serde::{Deserialize, Serialize};

/// Mail delivery provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MailProvider {
    /// Deliver through an SMTP relay
    Smtp,
    /// Log messages instead of sending them (development)
    #[default]
    Mock,
}

impl std::str::FromStr for MailProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "smtp" => Ok(MailProvider::Smtp),
            "mock" | "console" => Ok(MailProvider::Mock),
            _ => Err(format!("Invalid mail provider: {}", s)),
        }
    }
}

/// SMTP and sender settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailConfig {
    /// Which provider delivers mail
    #[serde(default)]
    pub provider: MailProvider,

    /// SMTP relay host
    pub host: String,

    /// SMTP relay port (465 = implicit TLS, anything else = STARTTLS)
    pub port: u16,

    /// SMTP username
    #[serde(default)]
    pub username: Option<String>,

    /// SMTP password
    #[serde(default)]
    pub password: Option<String>,

    /// Sender address
    pub from_address: String,

    /// Optional sender display name
    #[serde(default)]
    pub from_name: Option<String>,

    /// Require TLS on the SMTP connection
    #[serde(default = "default_use_tls")]
    pub use_tls: bool,

    /// Per-message send timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            provider: MailProvider::Mock,
            host: String::from("smtp.gmail.com"),
            port: 587,
            username: None,
            password: None,
            from_address: String::from("no-reply@localhost"),
            from_name: None,
            use_tls: default_use_tls(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl MailConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let provider = std::env::var("MAIL_PROVIDER")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.provider);
        let port = std::env::var("SMTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        Self {
            provider,
            host: std::env::var("SMTP_HOST").unwrap_or(defaults.host),
            port,
            username: std::env::var("SMTP_USERNAME").ok(),
            password: std::env::var("SMTP_PASSWORD").ok(),
            from_address: std::env::var("SMTP_FROM").unwrap_or(defaults.from_address),
            from_name: std::env::var("SMTP_FROM_NAME").ok(),
            ..defaults
        }
    }

    /// Sender mailbox in `Name <address>` form when a display name is set
    pub fn sender(&self) -> String {
        match &self.from_name {
            Some(name) => format!("{} <{}>", name, self.from_address),
            None => self.from_address.clone(),
        }
    }
}

fn default_use_tls() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    10
}
