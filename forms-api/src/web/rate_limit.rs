//! Fixed-window rate limiting for `/api/*`.
//!
//! Each source address gets a window that opens on its first request and
//! lasts `RateLimitConfig::window`. Once `max_requests` have been seen in the
//! window, further requests get a plain-text 429 until it closes.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header::RETRY_AFTER, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use super::handlers::AppState;
use crate::config::RateLimitConfig;

/// Body of the rejection. Plain text, not the JSON envelope.
pub const RATE_LIMIT_MESSAGE: &str = "Too many requests from this IP, please try again later.";

/// Windows are swept for expiry once the map grows past this size, at most
/// once per window length.
const PRUNE_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, Copy)]
struct Window {
    opened_at: Instant,
    hits: u32,
}

#[derive(Debug)]
struct Windows {
    entries: HashMap<String, Window>,
    last_sweep: Instant,
    sweeps: u64,
}

/// Outcome of counting one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

/// Per-address fixed-window counter shared by all requests.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    windows: Mutex<Windows>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Mutex::new(Windows {
                entries: HashMap::new(),
                last_sweep: Instant::now(),
                sweeps: 0,
            }),
        }
    }

    /// Count a request from `key` now.
    pub fn check(&self, key: &str) -> RateLimitDecision {
        self.check_at(key, Instant::now())
    }

    /// Count a request from `key` at `now`.
    pub fn check_at(&self, key: &str, now: Instant) -> RateLimitDecision {
        let window_len = self.config.window;
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if windows.entries.len() > PRUNE_THRESHOLD
            && now.duration_since(windows.last_sweep) >= window_len
        {
            windows
                .entries
                .retain(|_, w| now.duration_since(w.opened_at) < window_len);
            windows.last_sweep = now;
            windows.sweeps += 1;
        }

        let window = windows.entries.entry(key.to_string()).or_insert(Window {
            opened_at: now,
            hits: 0,
        });

        if now.duration_since(window.opened_at) >= window_len {
            *window = Window {
                opened_at: now,
                hits: 0,
            };
        }

        if window.hits >= self.config.max_requests {
            let elapsed = now.duration_since(window.opened_at);
            return RateLimitDecision::Limited {
                retry_after: window_len.saturating_sub(elapsed),
            };
        }

        window.hits += 1;
        RateLimitDecision::Allowed {
            remaining: self.config.max_requests - window.hits,
        }
    }

    /// Number of addresses currently tracked.
    pub fn tracked(&self) -> usize {
        self.windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .entries
            .len()
    }
}

/// True for paths the limiter applies to. The prefix matches in any case.
fn is_limited_path(path: &str) -> bool {
    match path.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("/api") => {
            path.len() == 4 || path[4..].starts_with('/')
        }
        _ => false,
    }
}

/// Identify the client.
///
/// Behind one trusted proxy the client is the right-most `X-Forwarded-For`
/// entry; otherwise it is the TCP peer.
pub fn client_key(req: &Request, trust_proxy: bool) -> String {
    if trust_proxy {
        let forwarded = req
            .headers()
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.rsplit(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty());

        if let Some(address) = forwarded {
            return address.to_string();
        }
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Middleware applying the limiter to `/api/*`.
pub async fn rate_limit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if !is_limited_path(req.uri().path()) {
        return next.run(req).await;
    }

    let key = client_key(&req, state.config.trust_proxy);

    match state.limiter.check(&key) {
        RateLimitDecision::Allowed { .. } => next.run(req).await,
        RateLimitDecision::Limited { retry_after } => {
            warn!(
                client = %key,
                path = %req.uri().path(),
                retry_after_secs = retry_after.as_secs(),
                "rate_limit_exceeded"
            );
            (
                StatusCode::TOO_MANY_REQUESTS,
                [(RETRY_AFTER, retry_after.as_secs().max(1).to_string())],
                RATE_LIMIT_MESSAGE,
            )
                .into_response()
        }
    }
}
