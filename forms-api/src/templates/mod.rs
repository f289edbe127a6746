//! HTML email templates for notifications and confirmations.
//!
//! Every renderer is a pure function of a validated record (plus the
//! submission instant for notifications). User-supplied values pass through
//! [`escape_html`] before they are placed in markup; subjects are header text
//! and stay unescaped.
//!
//! ```text
//! ValidConsultation      → consultation::notification / consultation::confirmation
//! ValidCareerApplication → career::notification       / career::confirmation
//! ```

pub mod career;
pub mod consultation;

use chrono::{DateTime, Utc};
use chrono_tz::Asia::Kolkata;

/// Firm name used in subjects and sign-offs.
pub const FIRM_NAME: &str = "MRS & Co.";

/// Placeholder for an optional contact field left blank.
pub const NOT_PROVIDED: &str = "Not provided";

/// Subject and HTML body of an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

/// Escape text for safe interpolation into HTML element content or attributes.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Escaped value, or `fallback` when absent.
fn escaped_or(value: Option<&str>, fallback: &str) -> String {
    value.map(escape_html).unwrap_or_else(|| fallback.to_string())
}

/// Render an instant the way the Indian office reads it, e.g. `5/3/2025, 2:07:09 pm`.
pub fn format_submitted_at(at: DateTime<Utc>) -> String {
    at.with_timezone(&Kolkata)
        .format("%-d/%-m/%Y, %-I:%M:%S %P")
        .to_string()
}

/// Shared footer block with the submission timestamp.
fn submitted_block(accent: &str, background: &str, at: DateTime<Utc>) -> String {
    format!(
        r#"
          <div style="margin-top: 20px; padding: 15px; background: {background}; border-radius: 8px;">
            <p style="margin: 0; color: {accent}; font-size: 14px;">
              <strong>Submitted:</strong> {submitted} IST
            </p>
          </div>"#,
        submitted = format_submitted_at(at),
    )
}

/// Sign-off shared by both confirmation emails.
fn confirmation_footer(team: &str) -> String {
    format!(
        r#"
            <p>Best regards,<br>
            <strong>{team}</strong><br>
            Chartered Accountants</p>

            <hr style="margin: 20px 0; border: none; border-top: 1px solid #e5e7eb;">
            <p style="font-size: 12px; color: #6B7280;">
              This is an automated response. Please do not reply to this email.
            </p>"#,
        team = escape_html(team),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x & 'y'")</script>"#),
            "&lt;script&gt;alert(&quot;x &amp; &#39;y&#39;&quot;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("plain text"), "plain text");
    }

    #[test]
    fn test_escaped_or() {
        assert_eq!(escaped_or(None, NOT_PROVIDED), "Not provided");
        assert_eq!(escaped_or(Some("A&B"), NOT_PROVIDED), "A&amp;B");
    }

    #[test]
    fn test_format_submitted_at_uses_ist() {
        // 08:37:09 UTC is 14:07:09 in Kolkata (UTC+05:30)
        let at = Utc.with_ymd_and_hms(2025, 3, 5, 8, 37, 9).unwrap();
        assert_eq!(format_submitted_at(at), "5/3/2025, 2:07:09 pm");
    }

    #[test]
    fn test_format_submitted_at_crosses_midnight() {
        let at = Utc.with_ymd_and_hms(2025, 12, 31, 20, 0, 0).unwrap();
        assert_eq!(format_submitted_at(at), "1/1/2026, 1:30:00 am");
    }

    #[test]
    fn test_confirmation_footer_escapes_team() {
        let footer = confirmation_footer("Team MRS & Co.");
        assert!(footer.contains("Team MRS &amp; Co."));
    }
}
