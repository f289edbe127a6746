//! Submission records for the two public forms.
//!
//! Wire records mirror what the browser posts: every field is optional so a
//! missing field surfaces as a validation failure rather than a body
//! rejection. Validated records are only produced by
//! [`crate::forms::validation`] and carry non-empty required fields.

use serde::{Deserialize, Deserializer};

/// Which public form a submission came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Consultation,
    Career,
}

impl FormKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormKind::Consultation => "consultation",
            FormKind::Career => "career",
        }
    }

    /// Message returned when required fields are missing.
    pub fn missing_fields_message(&self) -> &'static str {
        match self {
            FormKind::Consultation => "Name, email, and message are required fields",
            FormKind::Career => "Name and email are required fields",
        }
    }

    /// Message returned once both emails have been sent.
    pub fn success_message(&self) -> &'static str {
        match self {
            FormKind::Consultation => {
                "Your consultation request has been submitted successfully. We will contact you soon!"
            }
            FormKind::Career => {
                "Your application has been submitted successfully. We will contact you if your profile matches our requirements."
            }
        }
    }

    /// Message returned when delivery fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            FormKind::Consultation => {
                "Failed to submit consultation request. Please try again later."
            }
            FormKind::Career => "Failed to submit application. Please try again later.",
        }
    }
}

// =============================================================================
// Wire records
// =============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

/// Accept a string or a JSON number, keeping numbers in their decimal form.
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(value.map(|scalar| match scalar {
        Scalar::Text(text) => text,
        Scalar::Signed(n) => n.to_string(),
        Scalar::Unsigned(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
    }))
}

/// Consultation form as posted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConsultationRequest {
    #[serde(default, deserialize_with = "text_or_number")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub message: Option<String>,
}

/// Career application form as posted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CareerApplication {
    #[serde(default, deserialize_with = "text_or_number")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub notes: Option<String>,
}

// =============================================================================
// Validated records
// =============================================================================

/// Consultation request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidConsultation {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub message: String,
}

/// Career application that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidCareerApplication {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_fields_become_text() {
        let request: ConsultationRequest = serde_json::from_str(
            r#"{"name":"A","email":"a@b.com","phone":9876543210,"company":-3,"message":1.5}"#,
        )
        .unwrap();

        assert_eq!(request.phone.as_deref(), Some("9876543210"));
        assert_eq!(request.company.as_deref(), Some("-3"));
        assert_eq!(request.message.as_deref(), Some("1.5"));
    }

    #[test]
    fn test_null_and_absent_fields_are_none() {
        let application: CareerApplication =
            serde_json::from_str(r#"{"name":"A","phone":null}"#).unwrap();

        assert_eq!(application.name.as_deref(), Some("A"));
        assert!(application.phone.is_none());
        assert!(application.role.is_none());
    }

    #[test]
    fn test_structured_values_are_rejected() {
        let result = serde_json::from_str::<ConsultationRequest>(r#"{"name":["A"]}"#);
        assert!(result.is_err());
    }
}
