//! Mock mail notifier
//!
//! Records outgoing messages in memory and, when console output is on, prints
//! them so a developer can read the passcode without an SMTP relay.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use nt_core::services::otp::Notifier;
use nt_shared::email::mask_email;

/// A message captured by the mock notifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub subject: String,
    pub body: String,
    pub message_id: String,
}

/// Mock notifier for development and testing
pub struct MockNotifier {
    /// Counter for tracking number of messages sent
    message_count: AtomicU64,
    /// Whether to simulate delivery failures
    simulate_failure: AtomicBool,
    /// Whether to print messages to the console
    console_output: bool,
    /// Last message per recipient
    outbox: Mutex<HashMap<String, SentMail>>,
}

impl MockNotifier {
    /// Create a mock notifier that prints to the console
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    /// Create a mock notifier with configurable options
    pub fn with_options(console_output: bool, simulate_failure: bool) -> Self {
        Self {
            message_count: AtomicU64::new(0),
            simulate_failure: AtomicBool::new(simulate_failure),
            console_output,
            outbox: Mutex::new(HashMap::new()),
        }
    }

    /// Get the total number of messages sent
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Enable or disable failure simulation
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }

    /// The most recent message sent to `destination`
    pub fn last_message_to(&self, destination: &str) -> Option<SentMail> {
        self.outbox
            .lock()
            .ok()
            .and_then(|outbox| outbox.get(destination).cloned())
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(&self, destination: &str, subject: &str, body: &str) -> Result<String, String> {
        let masked = mask_email(destination);

        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!(email = %masked, "Mock notifier simulating delivery failure");
            return Err("Simulated mail delivery failure".to_string());
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        if self.console_output {
            println!("\n{}", "=".repeat(60));
            println!("MOCK MAIL - MESSAGE #{}", count);
            println!("{}", "=".repeat(60));
            println!("To: {}", destination);
            println!("Subject: {}", subject);
            println!("Message ID: {}", message_id);
            println!("{}", body);
            println!("{}\n", "=".repeat(60));
        }

        if let Ok(mut outbox) = self.outbox.lock() {
            outbox.insert(
                destination.to_string(),
                SentMail {
                    subject: subject.to_string(),
                    body: body.to_string(),
                    message_id: message_id.clone(),
                },
            );
        }

        info!(
            provider = "mock",
            email = %masked,
            message_id = %message_id,
            "Mail sent (mock)"
        );

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}
