//! Outbound mail.
//!
//! This module provides:
//! - The [`MailTransport`] seam over a single authenticated mail account
//! - An SMTP implementation backed by lettre
//! - The [`Dispatcher`] that sends the notification/confirmation pair
//!
//! ## Flow
//!
//! ```text
//! RenderedEmail → Dispatcher → MailTransport (ops inbox) → MailTransport (submitter)
//! ```

pub mod dispatcher;
pub mod smtp;

use async_trait::async_trait;
use thiserror::Error;

pub use dispatcher::{DispatchError, DispatchStage, Dispatcher};
pub use smtp::SmtpMailer;

/// Body of an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailBody {
    Html(String),
    Text(String),
}

/// A fully addressed message ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: EmailBody,
}

/// Failure while handing a message to the mail relay.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("mail account credentials are not configured")]
    MissingCredentials,

    #[error("invalid address '{address}': {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("mail relay {host} did not accept the connection")]
    Unreachable { host: String },
}

/// A single mail account able to send messages.
///
/// Implementations must be cheap to share; one instance serves every request.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Make one delivery attempt. No retries.
    async fn send(&self, email: &OutgoingEmail) -> Result<(), DeliveryError>;

    /// Check connectivity and authentication with the relay.
    async fn verify(&self) -> Result<(), DeliveryError>;
}
