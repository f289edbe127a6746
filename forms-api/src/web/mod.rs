//! HTTP surface.
//!
//! This module provides:
//! - Form and diagnostic endpoint handlers
//! - Body extraction for JSON and URL-encoded posts
//! - The edge middleware: rate limiting, CORS, security headers, panic guard
//!
//! Everything is assembled by [`router`].

pub mod body;
pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod router;
pub mod security;

pub use error::{ApiError, ApiResponse};
pub use handlers::{careers, consultation, health, not_found, root, test_email, AppState};
pub use rate_limit::{RateLimitDecision, RateLimiter, RATE_LIMIT_MESSAGE};
pub use router::{router, App};
