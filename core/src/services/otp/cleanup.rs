//! Periodic removal of expired passcode records
//!
//! Verification already deletes expired records it encounters, so the sweep
//! only reclaims space held by passcodes nobody came back for.

use std::sync::Arc;

use nt_shared::OtpConfig;
use tracing::{error, info, warn};

use crate::errors::DomainError;

use super::clock::{Clock, SystemClock};
use super::traits::OtpStore;

/// Configuration for the expiry sweep
#[derive(Debug, Clone)]
pub struct OtpSweepConfig {
    /// How often to run the sweep (in seconds)
    pub interval_seconds: u64,
    /// Whether to run the sweep at all
    pub enabled: bool,
}

impl Default for OtpSweepConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 300,
            enabled: false,
        }
    }
}

impl From<&OtpConfig> for OtpSweepConfig {
    fn from(config: &OtpConfig) -> Self {
        Self {
            interval_seconds: config.sweep_interval_seconds.max(1),
            enabled: config.sweep_enabled,
        }
    }
}

/// Service deleting expired passcodes on a fixed interval
pub struct OtpSweepService<S: OtpStore + ?Sized + 'static> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    config: OtpSweepConfig,
}

impl<S: OtpStore + ?Sized + 'static> OtpSweepService<S> {
    pub fn new(store: Arc<S>, config: OtpSweepConfig) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            config,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Run a single sweep, returning the number of records removed
    pub async fn run_sweep(&self) -> Result<usize, DomainError> {
        if !self.config.enabled {
            return Ok(0);
        }

        let removed = self.store.delete_expired(self.clock.now()).await?;
        if removed > 0 {
            info!(removed = removed, event = "otp_sweep", "Removed expired passcodes");
        }
        Ok(removed)
    }

    /// Start the sweep as a background task
    ///
    /// Returns the task handle, or `None` when the sweep is disabled.
    pub fn start_background_task(self: Arc<Self>) -> Option<tokio::task::JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Passcode expiry sweep is disabled");
            return None;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        Some(tokio::spawn(async move {
            info!(
                "Passcode expiry sweep started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                if let Err(e) = self.run_sweep().await {
                    error!(error = %e, event = "otp_sweep_failed", "Passcode sweep cycle failed");
                }
            }
        }))
    }
}
