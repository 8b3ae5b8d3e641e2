//! Passcode route handlers
//!
//! - `POST /send-otp` issues and mails a passcode
//! - `POST /verify-otp` checks a submitted passcode

pub mod send_otp;
pub mod verify_otp;

use std::sync::Arc;

use nt_core::services::otp::{Notifier, OtpService, OtpStore};

pub use send_otp::send_otp;
pub use verify_otp::verify_otp;

/// Application state that holds shared services
pub struct AppState<S, N>
where
    S: OtpStore + ?Sized,
    N: Notifier + ?Sized,
{
    pub otp_service: Arc<OtpService<S, N>>,
}

impl<S, N> AppState<S, N>
where
    S: OtpStore + ?Sized,
    N: Notifier + ?Sized,
{
    pub fn new(otp_service: Arc<OtpService<S, N>>) -> Self {
        Self { otp_service }
    }
}
