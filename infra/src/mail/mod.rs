//! Mail delivery module
//!
//! Implementations of the passcode `Notifier`:
//! - **SMTP**: delivery through an SMTP relay using lettre (feature `smtp-mail`)
//! - **Mock**: logs messages instead of sending them, for development and tests

use std::sync::Arc;

use nt_core::services::otp::Notifier;
use nt_shared::config::{MailConfig, MailProvider};

use crate::InfrastructureError;

pub mod mock_mail;
#[cfg(feature = "smtp-mail")]
pub mod smtp;

pub use mock_mail::MockNotifier;
#[cfg(feature = "smtp-mail")]
pub use smtp::SmtpNotifier;

/// Create a notifier based on configuration
///
/// # Returns
///
/// * `Err(InfrastructureError::Config)` - If the provider cannot be set up
pub fn create_notifier(config: &MailConfig) -> Result<Arc<dyn Notifier>, InfrastructureError> {
    match config.provider {
        MailProvider::Mock => {
            tracing::warn!("Using mock mail delivery; passcodes are logged, not sent");
            Ok(Arc::new(MockNotifier::new()))
        }
        #[cfg(feature = "smtp-mail")]
        MailProvider::Smtp => Ok(Arc::new(SmtpNotifier::new(config)?)),
        #[cfg(not(feature = "smtp-mail"))]
        MailProvider::Smtp => Err(InfrastructureError::Config(
            "SMTP support not compiled in. Enable the 'smtp-mail' feature.".to_string(),
        )),
    }
}
