//! SMTP transport for the firm's mail account.
//!
//! Uses a STARTTLS relay (Gmail by default) with the account's app password.
//! The underlying lettre transport keeps a small pool of authenticated
//! sessions and is shared by every request.

use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::{authentication::Credentials, PoolConfig},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{info, warn};

use super::{DeliveryError, EmailBody, MailTransport, OutgoingEmail};
use crate::config::MailConfig;

/// Upper bound on concurrently open SMTP sessions.
const POOL_MAX_SIZE: u32 = 4;

/// Idle sessions are closed after this long.
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// lettre-backed [`MailTransport`].
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
    has_credentials: bool,
}

impl SmtpMailer {
    /// Build the transport from configuration.
    ///
    /// Missing credentials are not an error here: the server still starts and
    /// each send reports [`DeliveryError::MissingCredentials`].
    pub fn new(config: &MailConfig) -> Result<Self, DeliveryError> {
        let has_credentials = config.has_credentials();

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .pool_config(
                PoolConfig::new()
                    .max_size(POOL_MAX_SIZE)
                    .idle_timeout(POOL_IDLE_TIMEOUT),
            );

        if has_credentials {
            builder = builder.credentials(Credentials::new(
                config.account.clone(),
                config.app_password.clone(),
            ));
        } else {
            warn!(smtp_host = %config.smtp_host, "smtp_credentials_missing");
        }

        info!(
            smtp_host = %config.smtp_host,
            smtp_port = config.smtp_port,
            pool_max_size = POOL_MAX_SIZE,
            "smtp_transport_created"
        );

        Ok(Self {
            transport: builder.build(),
            host: config.smtp_host.clone(),
            has_credentials,
        })
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, DeliveryError> {
    address
        .parse::<Mailbox>()
        .map_err(|source| DeliveryError::InvalidAddress {
            address: address.to_string(),
            source,
        })
}

/// Convert an [`OutgoingEmail`] into a lettre [`Message`].
pub fn build_message(email: &OutgoingEmail) -> Result<Message, DeliveryError> {
    let (content_type, body) = match &email.body {
        EmailBody::Html(html) => (ContentType::TEXT_HTML, html.clone()),
        EmailBody::Text(text) => (ContentType::TEXT_PLAIN, text.clone()),
    };

    let message = Message::builder()
        .from(parse_mailbox(&email.from)?)
        .to(parse_mailbox(&email.to)?)
        .subject(email.subject.as_str())
        .header(content_type)
        .body(body)?;

    Ok(message)
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), DeliveryError> {
        if !self.has_credentials {
            return Err(DeliveryError::MissingCredentials);
        }

        let message = build_message(email)?;
        let response = self.transport.send(message).await?;

        info!(
            to = %email.to,
            smtp_code = %response.code(),
            "smtp_message_accepted"
        );

        Ok(())
    }

    async fn verify(&self) -> Result<(), DeliveryError> {
        if !self.has_credentials {
            return Err(DeliveryError::MissingCredentials);
        }

        if self.transport.test_connection().await? {
            Ok(())
        } else {
            Err(DeliveryError::Unreachable {
                host: self.host.clone(),
            })
        }
    }
}
