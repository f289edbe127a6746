//! Sends rendered templates through the configured transport.
//!
//! Each submission produces exactly two sends, in order:
//! 1. Internal notification to the operations inbox
//! 2. Confirmation to the submitter
//!
//! The confirmation is only attempted once the notification was accepted.
//! If the confirmation fails the notification has already gone out; the
//! caller still reports failure to the client.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use super::{DeliveryError, EmailBody, MailTransport, OutgoingEmail};
use crate::config::MailConfig;
use crate::templates::RenderedEmail;

/// Subject of the diagnostic message sent by `/api/test-email`.
pub const TEST_EMAIL_SUBJECT: &str = "Test Email from MRS Backend";

const TEST_EMAIL_BODY: &str = "If you receive this, your email configuration is working!";

/// Which send of the pair failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStage {
    Notification,
    Confirmation,
}

impl fmt::Display for DispatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchStage::Notification => write!(f, "notification"),
            DispatchStage::Confirmation => write!(f, "confirmation"),
        }
    }
}

/// Delivery failure tagged with the stage it happened in.
#[derive(Debug, Error)]
#[error("{stage} delivery failed: {source}")]
pub struct DispatchError {
    pub stage: DispatchStage,
    #[source]
    pub source: DeliveryError,
}

impl DispatchError {
    /// True when the operations inbox already received the notification.
    pub fn notification_delivered(&self) -> bool {
        self.stage == DispatchStage::Confirmation
    }
}

/// Addresses the two sends of a submission and hands them to the transport.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn MailTransport>,
    sender: String,
    operations_inbox: String,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn MailTransport>, config: &MailConfig) -> Self {
        Self {
            transport,
            sender: config.account.clone(),
            operations_inbox: config.firm_address.clone(),
        }
    }

    /// Account used as the `From` address.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Check connectivity and authentication with the relay.
    pub async fn verify(&self) -> Result<(), DeliveryError> {
        self.transport.verify().await
    }

    /// Send the internal notification, then the confirmation to `submitter`.
    pub async fn deliver_pair(
        &self,
        notification: RenderedEmail,
        confirmation: RenderedEmail,
        submitter: &str,
    ) -> Result<(), DispatchError> {
        let notification = self.html_email(&self.operations_inbox, notification);
        if let Err(source) = self.transport.send(&notification).await {
            error!(
                error = %source,
                to = %notification.to,
                "notification_send_failed"
            );
            return Err(DispatchError {
                stage: DispatchStage::Notification,
                source,
            });
        }
        info!(to = %notification.to, subject = %notification.subject, "notification_sent");

        let confirmation = self.html_email(submitter, confirmation);
        if let Err(source) = self.transport.send(&confirmation).await {
            warn!(
                error = %source,
                to = %confirmation.to,
                "confirmation_failed_after_notification"
            );
            return Err(DispatchError {
                stage: DispatchStage::Confirmation,
                source,
            });
        }
        info!(to = %confirmation.to, subject = %confirmation.subject, "confirmation_sent");

        Ok(())
    }

    /// Verify the relay and send a plain-text message from the account to itself.
    pub async fn send_test_email(&self) -> Result<(), DeliveryError> {
        self.transport.verify().await?;

        let email = OutgoingEmail {
            from: self.sender.clone(),
            to: self.sender.clone(),
            subject: TEST_EMAIL_SUBJECT.to_string(),
            body: EmailBody::Text(TEST_EMAIL_BODY.to_string()),
        };
        self.transport.send(&email).await?;

        info!(to = %email.to, "test_email_sent");
        Ok(())
    }

    fn html_email(&self, to: &str, rendered: RenderedEmail) -> OutgoingEmail {
        OutgoingEmail {
            from: self.sender.clone(),
            to: to.to_string(),
            subject: rendered.subject,
            body: EmailBody::Html(rendered.html),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every send and fails the n-th one (1-based) when asked to.
    #[derive(Default)]
    struct ScriptedTransport {
        sent: Mutex<Vec<OutgoingEmail>>,
        fail_on: Option<usize>,
        verify_ok: bool,
    }

    #[async_trait]
    impl MailTransport for ScriptedTransport {
        async fn send(&self, email: &OutgoingEmail) -> Result<(), DeliveryError> {
            let mut sent = self.sent.lock().unwrap();
            if self.fail_on == Some(sent.len() + 1) {
                return Err(DeliveryError::Unreachable {
                    host: "smtp.test".to_string(),
                });
            }
            sent.push(email.clone());
            Ok(())
        }

        async fn verify(&self) -> Result<(), DeliveryError> {
            if self.verify_ok {
                Ok(())
            } else {
                Err(DeliveryError::Unreachable {
                    host: "smtp.test".to_string(),
                })
            }
        }
    }

    fn mail_config() -> MailConfig {
        MailConfig {
            account: "ops@mrs.test".to_string(),
            app_password: "secret".to_string(),
            firm_address: "firm@mrs.test".to_string(),
            smtp_host: "smtp.test".to_string(),
            smtp_port: 587,
        }
    }

    fn rendered(subject: &str) -> RenderedEmail {
        RenderedEmail {
            subject: subject.to_string(),
            html: format!("<p>{subject}</p>"),
        }
    }

    #[tokio::test]
    async fn test_deliver_pair_sends_in_order() {
        let transport = Arc::new(ScriptedTransport::default());
        let dispatcher = Dispatcher::new(transport.clone(), &mail_config());

        dispatcher
            .deliver_pair(rendered("internal"), rendered("thanks"), "client@mrs.test")
            .await
            .unwrap();

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, "firm@mrs.test");
        assert_eq!(sent[0].subject, "internal");
        assert_eq!(sent[1].to, "client@mrs.test");
        assert_eq!(sent[1].subject, "thanks");
        assert!(sent.iter().all(|email| email.from == "ops@mrs.test"));
        assert!(matches!(sent[0].body, EmailBody::Html(_)));
    }

    #[tokio::test]
    async fn test_notification_failure_skips_confirmation() {
        let transport = Arc::new(ScriptedTransport {
            fail_on: Some(1),
            ..Default::default()
        });
        let dispatcher = Dispatcher::new(transport.clone(), &mail_config());

        let err = dispatcher
            .deliver_pair(rendered("internal"), rendered("thanks"), "client@mrs.test")
            .await
            .unwrap_err();

        assert_eq!(err.stage, DispatchStage::Notification);
        assert!(!err.notification_delivered());
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_confirmation_failure_reports_error() {
        let transport = Arc::new(ScriptedTransport {
            fail_on: Some(2),
            ..Default::default()
        });
        let dispatcher = Dispatcher::new(transport.clone(), &mail_config());

        let err = dispatcher
            .deliver_pair(rendered("internal"), rendered("thanks"), "client@mrs.test")
            .await
            .unwrap_err();

        assert_eq!(err.stage, DispatchStage::Confirmation);
        assert!(err.notification_delivered());
        assert_eq!(transport.sent.lock().unwrap().len(), 1);
        assert!(err.to_string().starts_with("confirmation delivery failed"));
    }

    #[tokio::test]
    async fn test_send_test_email_goes_to_account() {
        let transport = Arc::new(ScriptedTransport {
            verify_ok: true,
            ..Default::default()
        });
        let dispatcher = Dispatcher::new(transport.clone(), &mail_config());

        dispatcher.send_test_email().await.unwrap();

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "ops@mrs.test");
        assert_eq!(sent[0].subject, TEST_EMAIL_SUBJECT);
        assert!(matches!(sent[0].body, EmailBody::Text(_)));
    }

    #[tokio::test]
    async fn test_send_test_email_stops_when_verify_fails() {
        let transport = Arc::new(ScriptedTransport::default());
        let dispatcher = Dispatcher::new(transport.clone(), &mail_config());

        assert!(dispatcher.send_test_email().await.is_err());
        assert!(transport.sent.lock().unwrap().is_empty());
    }
}
