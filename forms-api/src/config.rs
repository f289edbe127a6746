//! Configuration module for environment variable parsing.
//!
//! Everything is read once at startup into an immutable [`Config`] that is
//! handed to the mailer, the rate limiter and the router. Nothing downstream
//! reads the environment again.

use std::env;
use std::time::Duration;

use tracing::warn;

/// Default CORS origin for the marketing site.
pub const DEFAULT_FRONTEND_URL: &str = "https://mrs-co1.vercel.app";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Origin allowed to call the API from a browser
    pub frontend_url: String,

    /// Outbound mail settings
    pub mail: MailConfig,

    /// Per-address request limit on `/api/*`
    pub rate_limit: RateLimitConfig,

    /// Whether `X-Forwarded-For` identifies the client (one trusted proxy hop)
    pub trust_proxy: bool,
}

/// Settings for the single authenticated mail account.
///
/// The account is both the `From` identity and the SMTP principal.
#[derive(Clone)]
pub struct MailConfig {
    /// Account address (`EMAIL_USER`)
    pub account: String,

    /// App password for the account (`EMAIL_APP_PASSWORD`)
    pub app_password: String,

    /// Operations inbox that receives internal notifications (`FIRM_EMAIL`)
    pub firm_address: String,

    /// SMTP relay host
    pub smtp_host: String,

    /// SMTP relay port (STARTTLS)
    pub smtp_port: u16,
}

impl MailConfig {
    /// True when both halves of the account credential are present.
    pub fn has_credentials(&self) -> bool {
        !self.account.trim().is_empty() && !self.app_password.is_empty()
    }
}

// The password must never end up in logs, so Debug is written by hand.
impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("account", &self.account)
            .field("app_password", &"<redacted>")
            .field("firm_address", &self.firm_address)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .finish()
    }
}

/// Fixed-window rate limit settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests allowed per window per source address
    pub max_requests: u32,

    /// Window length
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(15 * 60),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored when present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = RateLimitConfig::default();

        Config {
            port: parse_or("PORT", 3001),

            frontend_url: env::var("FRONTEND_URL")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string()),

            mail: MailConfig {
                account: env::var("EMAIL_USER").unwrap_or_default(),
                app_password: env::var("EMAIL_APP_PASSWORD").unwrap_or_default(),
                firm_address: env::var("FIRM_EMAIL").unwrap_or_default(),
                smtp_host: env::var("SMTP_HOST")
                    .unwrap_or_else(|_| "smtp.gmail.com".to_string()),
                smtp_port: parse_or("SMTP_PORT", 587),
            },

            rate_limit: RateLimitConfig {
                max_requests: parse_or("RATE_LIMIT_MAX", defaults.max_requests),
                window: Duration::from_secs(parse_or(
                    "RATE_LIMIT_WINDOW_SECS",
                    defaults.window.as_secs(),
                )),
            },

            trust_proxy: parse_bool("TRUST_PROXY", true),
        }
    }
}

/// Parse a numeric variable, falling back to `default` when unset or invalid.
fn parse_or<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match env::var(name) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!(env_var = name, value = %raw, "invalid_config_value_using_default");
                default
            }
        },
        Err(_) => default,
    }
}

/// Parse a boolean flag such as `1`, `true`, `yes`, `0`, `false`, `no`.
fn parse_bool(name: &str, default: bool) -> bool {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            warn!(env_var = name, value = %raw, "invalid_config_flag_using_default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    #[test]
    fn test_parse_or_valid() {
        let _lock = env_guard().lock().unwrap();
        env::set_var("MRS_TEST_PORT", "8081");
        assert_eq!(parse_or("MRS_TEST_PORT", 1u16), 8081);
        env::remove_var("MRS_TEST_PORT");
    }

    #[test]
    fn test_parse_or_invalid_falls_back() {
        let _lock = env_guard().lock().unwrap();
        env::set_var("MRS_TEST_BAD_PORT", "eighty");
        assert_eq!(parse_or("MRS_TEST_BAD_PORT", 3001u16), 3001);
        env::remove_var("MRS_TEST_BAD_PORT");
    }

    #[test]
    fn test_parse_or_default() {
        assert_eq!(parse_or("MRS_NONEXISTENT_VAR", 42u32), 42);
    }

    #[test]
    fn test_parse_bool() {
        let _lock = env_guard().lock().unwrap();
        env::set_var("MRS_TEST_FLAG", "no");
        assert!(!parse_bool("MRS_TEST_FLAG", true));
        env::set_var("MRS_TEST_FLAG", "YES");
        assert!(parse_bool("MRS_TEST_FLAG", false));
        env::set_var("MRS_TEST_FLAG", "maybe");
        assert!(parse_bool("MRS_TEST_FLAG", true));
        env::remove_var("MRS_TEST_FLAG");
    }

    #[test]
    fn test_default_rate_limit() {
        let limit = RateLimitConfig::default();
        assert_eq!(limit.max_requests, 10);
        assert_eq!(limit.window, Duration::from_secs(900));
    }

    #[test]
    fn test_mail_config_debug_redacts_password() {
        let mail = MailConfig {
            account: "ops@example.com".to_string(),
            app_password: "hunter2".to_string(),
            firm_address: "firm@example.com".to_string(),
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
        };
        let rendered = format!("{:?}", mail);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
        assert!(mail.has_credentials());
    }
}
