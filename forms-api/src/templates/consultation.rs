//! Consultation request templates.

use chrono::{DateTime, Utc};

use super::{
    confirmation_footer, escape_html, escaped_or, submitted_block, RenderedEmail, FIRM_NAME,
    NOT_PROVIDED,
};
use crate::forms::ValidConsultation;

const ACCENT: &str = "#1E40AF";
const TINT: &str = "#EBF8FF";
const HEADER_GRADIENT: &str = "linear-gradient(135deg, #3B82F6, #1E40AF)";

/// Internal notification for the operations inbox.
pub fn notification(request: &ValidConsultation, submitted_at: DateTime<Utc>) -> RenderedEmail {
    let subject = format!("New Consultation Request from {}", request.name);

    let html = format!(
        r#"
      <div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
        <div style="background: {HEADER_GRADIENT}; padding: 20px; text-align: center;">
          <h2 style="color: white; margin: 0;">New Consultation Request</h2>
        </div>

        <div style="padding: 20px; background: #f8f9fa;">
          <h3 style="color: {ACCENT}; margin-bottom: 20px;">Client Details</h3>

          <div style="background: white; padding: 20px; border-radius: 8px; margin-bottom: 15px;">
            <p style="margin: 8px 0;"><strong>Name:</strong> {name}</p>
            <p style="margin: 8px 0;"><strong>Email:</strong> {email}</p>
            <p style="margin: 8px 0;"><strong>Phone:</strong> {phone}</p>
            <p style="margin: 8px 0;"><strong>Company:</strong> {company}</p>
          </div>

          <div style="background: white; padding: 20px; border-radius: 8px;">
            <h4 style="color: {ACCENT}; margin-top: 0;">Message:</h4>
            <p style="line-height: 1.6; color: #374151;">{message}</p>
          </div>
{submitted}
        </div>
      </div>
    "#,
        name = escape_html(&request.name),
        email = escape_html(&request.email),
        phone = escaped_or(request.phone.as_deref(), NOT_PROVIDED),
        company = escaped_or(request.company.as_deref(), NOT_PROVIDED),
        message = escape_html(&request.message),
        submitted = submitted_block(ACCENT, TINT, submitted_at),
    );

    RenderedEmail { subject, html }
}

/// Acknowledgement sent back to the client.
pub fn confirmation(request: &ValidConsultation) -> RenderedEmail {
    let subject = format!("Thank you for contacting {FIRM_NAME}");
    let firm = escape_html(FIRM_NAME);

    let html = format!(
        r#"
        <div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
          <div style="background: {HEADER_GRADIENT}; padding: 20px; text-align: center;">
            <h2 style="color: white; margin: 0;">Thank You for Reaching Out!</h2>
          </div>

          <div style="padding: 20px;">
            <p>Dear {name},</p>

            <p>Thank you for your interest in {firm}. We have received your consultation request and will get back to you within 1 business day.</p>

            <p>Our team will review your requirements and provide you with the best possible solution.</p>

            <div style="background: {TINT}; padding: 15px; border-radius: 8px; margin: 20px 0;">
              <p style="margin: 0; color: {ACCENT};"><strong>What happens next?</strong></p>
              <ul style="color: #374151; margin: 10px 0;">
                <li>Our team will review your request</li>
                <li>We'll schedule a call at your convenience</li>
                <li>We'll provide a customized solution for your needs</li>
              </ul>
            </div>
{footer}
          </div>
        </div>
      "#,
        name = escape_html(&request.name),
        footer = confirmation_footer(&format!("Team {FIRM_NAME}")),
    );

    RenderedEmail { subject, html }
}
