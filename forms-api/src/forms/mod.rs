//! Form submissions and their validation rules.

pub mod types;
pub mod validation;

pub use types::{
    CareerApplication, ConsultationRequest, FormKind, ValidCareerApplication, ValidConsultation,
};
pub use validation::{is_valid_email, ValidationError, Violation, INVALID_EMAIL_MESSAGE};
