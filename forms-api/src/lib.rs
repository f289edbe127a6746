//! MRS Forms - Backend for the consultation and careers forms.
//!
//! This library provides the modules behind the `mrs-forms-web` binary:
//! - `forms`: submission records and validation
//! - `templates`: HTML notification and confirmation emails
//! - `mail`: SMTP transport and the two-step dispatcher
//! - `web`: handlers, edge middleware and the router
//!
//! ## Request Flow
//!
//! ```text
//! POST → rate limit → validate → render → notify ops inbox → confirm to submitter → JSON
//! ```

pub mod config;
pub mod forms;
pub mod mail;
pub mod templates;
pub mod web;

// Re-export commonly used types
pub use config::{Config, MailConfig, RateLimitConfig};
pub use forms::{CareerApplication, ConsultationRequest, FormKind};
pub use mail::{DeliveryError, Dispatcher, MailTransport, OutgoingEmail, SmtpMailer};
pub use templates::RenderedEmail;
pub use web::{router, App, AppState};
