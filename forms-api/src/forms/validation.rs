//! Required-field and email-shape checks.
//!
//! The email rule is intentionally permissive: one `@`, a dot somewhere in
//! the domain, and no whitespace. Anything stricter is the mail relay's job.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use super::types::{
    CareerApplication, ConsultationRequest, FormKind, ValidCareerApplication, ValidConsultation,
};

/// Message returned for a malformed email address.
pub const INVALID_EMAIL_MESSAGE: &str = "Please provide a valid email address";

/// A single failed rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Required field absent or empty
    Missing(&'static str),
    /// Email does not look like `local@domain.tld`
    InvalidEmail,
}

/// Submission rejected before any side effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind:?} submission rejected: {violations:?}")]
pub struct ValidationError {
    pub kind: FormKind,
    pub violations: Vec<Violation>,
}

impl ValidationError {
    /// Client-facing message. Missing fields win over a bad email shape.
    pub fn message(&self) -> &'static str {
        let any_missing = self
            .violations
            .iter()
            .any(|v| matches!(v, Violation::Missing(_)));

        if any_missing {
            self.kind.missing_fields_message()
        } else {
            INVALID_EMAIL_MESSAGE
        }
    }
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
    })
}

/// Check an address against the `local@domain.tld` shape.
pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

/// Treat `None` and `""` alike; whitespace-only values count as present.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Collect violations for the shared `name` + `email` pair.
fn check_identity(
    name: &Option<String>,
    email: &Option<String>,
    violations: &mut Vec<Violation>,
) {
    if name.is_none() {
        violations.push(Violation::Missing("name"));
    }
    match email {
        None => violations.push(Violation::Missing("email")),
        Some(address) if !is_valid_email(address) => violations.push(Violation::InvalidEmail),
        Some(_) => {}
    }
}

impl ConsultationRequest {
    /// Validate the request, normalizing empty optional fields to `None`.
    pub fn validate(self) -> Result<ValidConsultation, ValidationError> {
        let name = present(self.name);
        let email = present(self.email);
        let message = present(self.message);

        let mut violations = Vec::new();
        check_identity(&name, &email, &mut violations);
        if message.is_none() {
            violations.push(Violation::Missing("message"));
        }

        match (name, email, message) {
            (Some(name), Some(email), Some(message)) if violations.is_empty() => {
                Ok(ValidConsultation {
                    name,
                    email,
                    phone: present(self.phone),
                    company: present(self.company),
                    message,
                })
            }
            _ => Err(ValidationError {
                kind: FormKind::Consultation,
                violations,
            }),
        }
    }
}

impl CareerApplication {
    /// Validate the application, normalizing empty optional fields to `None`.
    pub fn validate(self) -> Result<ValidCareerApplication, ValidationError> {
        let name = present(self.name);
        let email = present(self.email);

        let mut violations = Vec::new();
        check_identity(&name, &email, &mut violations);

        match (name, email) {
            (Some(name), Some(email)) if violations.is_empty() => Ok(ValidCareerApplication {
                name,
                email,
                phone: present(self.phone),
                role: present(self.role),
                notes: present(self.notes),
            }),
            _ => Err(ValidationError {
                kind: FormKind::Career,
                violations,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consultation(name: &str, email: &str, message: &str) -> ConsultationRequest {
        ConsultationRequest {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            message: Some(message.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last+tag@sub.example.co.in"));
        assert!(!is_valid_email("bad-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@@b.com"));
        assert!(!is_valid_email("@b.com"));
    }

    #[test]
    fn test_consultation_valid() {
        let valid = consultation("A", "a@b.com", "hi").validate().unwrap();
        assert_eq!(valid.name, "A");
        assert_eq!(valid.email, "a@b.com");
        assert_eq!(valid.message, "hi");
        assert!(valid.phone.is_none());
        assert!(valid.company.is_none());
    }

    #[test]
    fn test_consultation_missing_fields() {
        let request = ConsultationRequest {
            name: Some("A".to_string()),
            ..Default::default()
        };
        let err = request.validate().unwrap_err();
        assert_eq!(err.kind, FormKind::Consultation);
        assert_eq!(
            err.violations,
            vec![Violation::Missing("email"), Violation::Missing("message")]
        );
        assert_eq!(err.message(), "Name, email, and message are required fields");
    }

    #[test]
    fn test_consultation_empty_string_is_missing() {
        let err = consultation("A", "a@b.com", "").validate().unwrap_err();
        assert_eq!(err.violations, vec![Violation::Missing("message")]);
    }

    #[test]
    fn test_missing_fields_take_precedence_over_bad_email() {
        let err = consultation("", "bad-email", "hi").validate().unwrap_err();
        assert_eq!(
            err.violations,
            vec![Violation::Missing("name"), Violation::InvalidEmail]
        );
        assert_eq!(err.message(), "Name, email, and message are required fields");
    }

    #[test]
    fn test_career_invalid_email() {
        let application = CareerApplication {
            name: Some("A".to_string()),
            email: Some("bad-email".to_string()),
            ..Default::default()
        };
        let err = application.validate().unwrap_err();
        assert_eq!(err.kind, FormKind::Career);
        assert_eq!(err.message(), INVALID_EMAIL_MESSAGE);
    }

    #[test]
    fn test_career_message_not_required() {
        let application = CareerApplication {
            name: Some("A".to_string()),
            email: Some("a@b.com".to_string()),
            role: Some("".to_string()),
            notes: Some("Available from May".to_string()),
            ..Default::default()
        };
        let valid = application.validate().unwrap();
        assert!(valid.role.is_none());
        assert_eq!(valid.notes.as_deref(), Some("Available from May"));
    }

    #[test]
    fn test_career_missing_name() {
        let application = CareerApplication {
            email: Some("a@b.com".to_string()),
            ..Default::default()
        };
        let err = application.validate().unwrap_err();
        assert_eq!(err.message(), "Name and email are required fields");
    }
}
