//! Career application templates.

use chrono::{DateTime, Utc};

use super::{
    confirmation_footer, escape_html, escaped_or, submitted_block, RenderedEmail, FIRM_NAME,
    NOT_PROVIDED,
};
use crate::forms::ValidCareerApplication;

const ACCENT: &str = "#059669";
const TINT: &str = "#ECFDF5";
const HEADER_GRADIENT: &str = "linear-gradient(135deg, #10B981, #059669)";

/// Subject fallback when no role was given.
pub const GENERAL_APPLICATION: &str = "General Application";

/// Internal notification for the operations inbox.
pub fn notification(
    application: &ValidCareerApplication,
    submitted_at: DateTime<Utc>,
) -> RenderedEmail {
    let subject = format!(
        "New Job Application - {}",
        application.role.as_deref().unwrap_or(GENERAL_APPLICATION)
    );

    let notes = match application.notes.as_deref() {
        Some(notes) => format!(
            r#"
          <div style="background: white; padding: 20px; border-radius: 8px;">
            <h4 style="color: {ACCENT}; margin-top: 0;">Additional Notes:</h4>
            <p style="line-height: 1.6; color: #374151;">{}</p>
          </div>
"#,
            escape_html(notes)
        ),
        None => String::new(),
    };

    let html = format!(
        r#"
      <div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
        <div style="background: {HEADER_GRADIENT}; padding: 20px; text-align: center;">
          <h2 style="color: white; margin: 0;">New Job Application</h2>
        </div>

        <div style="padding: 20px; background: #f8f9fa;">
          <h3 style="color: {ACCENT}; margin-bottom: 20px;">Applicant Details</h3>

          <div style="background: white; padding: 20px; border-radius: 8px; margin-bottom: 15px;">
            <p style="margin: 8px 0;"><strong>Name:</strong> {name}</p>
            <p style="margin: 8px 0;"><strong>Email:</strong> {email}</p>
            <p style="margin: 8px 0;"><strong>Phone:</strong> {phone}</p>
            <p style="margin: 8px 0;"><strong>Role Applied For:</strong> {role}</p>
          </div>
{notes}{submitted}
        </div>
      </div>
    "#,
        name = escape_html(&application.name),
        email = escape_html(&application.email),
        phone = escaped_or(application.phone.as_deref(), NOT_PROVIDED),
        role = escaped_or(application.role.as_deref(), "Not specified"),
        submitted = submitted_block(ACCENT, TINT, submitted_at),
    );

    RenderedEmail { subject, html }
}

/// Acknowledgement sent back to the applicant.
pub fn confirmation(application: &ValidCareerApplication) -> RenderedEmail {
    let subject = format!("Application Received - {FIRM_NAME}");
    let firm = escape_html(FIRM_NAME);

    let position = application
        .role
        .as_deref()
        .map(|role| {
            format!(
                " for the position of <strong>{}</strong>",
                escape_html(role)
            )
        })
        .unwrap_or_default();

    let html = format!(
        r#"
        <div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
          <div style="background: {HEADER_GRADIENT}; padding: 20px; text-align: center;">
            <h2 style="color: white; margin: 0;">Application Received</h2>
          </div>

          <div style="padding: 20px;">
            <p>Dear {name},</p>

            <p>Thank you for your interest in joining {firm}. We have received your application{position} and appreciate you taking the time to apply.</p>

            <div style="background: {TINT}; padding: 15px; border-radius: 8px; margin: 20px 0;">
              <p style="margin: 0; color: {ACCENT};"><strong>Next Steps:</strong></p>
              <ul style="color: #374151; margin: 10px 0;">
                <li>Our HR team will review your application</li>
                <li>If shortlisted, we'll contact you for further discussions</li>
                <li>We'll keep your application on file for future opportunities</li>
              </ul>
            </div>

            <p>We'll be in touch if your profile matches our current requirements.</p>
{footer}
          </div>
        </div>
      "#,
        name = escape_html(&application.name),
        footer = confirmation_footer(&format!("HR Team - {FIRM_NAME}")),
    );

    RenderedEmail { subject, html }
}
