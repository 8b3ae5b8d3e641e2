//! SMTP notifier built on lettre

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::time::Duration;
use tracing::{debug, error};
use uuid::Uuid;

use nt_core::services::otp::Notifier;
use nt_shared::config::MailConfig;
use nt_shared::email::mask_email;

use crate::InfrastructureError;

/// Delivers passcodes as plain-text mail through an SMTP relay
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    /// Domain used for generated Message-ID headers
    message_domain: String,
}

impl SmtpNotifier {
    /// Build the transport from mail settings
    ///
    /// Port 465 uses implicit TLS; any other port upgrades with STARTTLS when
    /// `use_tls` is set.
    pub fn new(config: &MailConfig) -> Result<Self, InfrastructureError> {
        let relay_error = |e: lettre::transport::smtp::Error| {
            InfrastructureError::Config(format!("SMTP relay error: {}", e))
        };

        let mut builder = if config.use_tls {
            let tls_params = TlsParameters::new(config.host.clone()).map_err(|e| {
                InfrastructureError::Config(format!("TLS configuration error: {}", e))
            })?;

            if config.port == 465 {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                    .map_err(relay_error)?
                    .port(config.port)
                    .tls(Tls::Wrapper(tls_params))
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                    .map_err(relay_error)?
                    .port(config.port)
                    .tls(Tls::Required(tls_params))
            }
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host).port(config.port)
        };

        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let transport = builder
            .timeout(Some(Duration::from_secs(config.timeout_secs)))
            .build();

        let sender: Mailbox = config
            .sender()
            .parse()
            .map_err(|e| InfrastructureError::Config(format!("Invalid from address: {}", e)))?;

        let message_domain = sender.email.domain().to_string();

        Ok(Self {
            transport,
            sender,
            message_domain,
        })
    }

    fn build_message(
        &self,
        destination: &str,
        subject: &str,
        body: &str,
        message_id: &str,
    ) -> Result<Message, InfrastructureError> {
        let to: Mailbox = destination
            .parse()
            .map_err(|e| InfrastructureError::Mail(format!("Invalid recipient address: {}", e)))?;

        Message::builder()
            .from(self.sender.clone())
            .to(to)
            .subject(subject)
            .message_id(Some(message_id.to_string()))
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| InfrastructureError::Mail(format!("Failed to build email: {}", e)))
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, destination: &str, subject: &str, body: &str) -> Result<String, String> {
        let message_id = format!("<{}@{}>", Uuid::new_v4(), self.message_domain);
        let message = self
            .build_message(destination, subject, body, &message_id)
            .map_err(|e| e.to_string())?;

        self.transport.send(message).await.map_err(|e| {
            error!(
                email = %mask_email(destination),
                error = %e,
                "SMTP delivery failed"
            );
            InfrastructureError::Mail(e.to_string()).to_string()
        })?;

        debug!(
            email = %mask_email(destination),
            message_id = %message_id,
            "Mail accepted by SMTP relay"
        );
        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "smtp"
    }
}
