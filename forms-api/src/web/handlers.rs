//! Endpoint handlers.
//!
//! The two form handlers follow the same path:
//! 1. Validate the submission (400 on failure, nothing sent)
//! 2. Render the notification and confirmation
//! 3. Send both, notification first (500 on any failure)
//! 4. Respond with the form's success message

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use super::body::FormBody;
use super::error::{ApiError, ApiResponse};
use super::rate_limit::RateLimiter;
use crate::forms::{CareerApplication, ConsultationRequest, FormKind};
use crate::mail::Dispatcher;
use crate::templates;
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub dispatcher: Dispatcher,
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(config: Config, dispatcher: Dispatcher) -> Self {
        let limiter = RateLimiter::new(config.rate_limit);
        Self {
            config: Arc::new(config),
            dispatcher,
            limiter: Arc::new(limiter),
        }
    }
}

fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

// =============================================================================
// Info & Health
// =============================================================================

/// API information and endpoint listing.
pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "MRS & Co. Backend API",
        "status": "Server is running successfully!",
        "endpoints": {
            "GET /": "API Information",
            "GET /api/health": "Health check",
            "GET /api/test-email": "Test email configuration",
            "POST /api/consultation": "Submit consultation form (requires: name, email, message)",
            "POST /api/careers": "Submit career application (requires: name, email)"
        },
        "timestamp": now_iso8601(),
    }))
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        timestamp: now_iso8601(),
    })
}

/// Verify the relay and send a test message to the account itself.
pub async fn test_email(State(state): State<AppState>) -> Result<Json<ApiResponse>, ApiError> {
    state.dispatcher.send_test_email().await.map_err(|e| {
        error!(error = %e, "test_email_failed");
        ApiError::TestEmail(e)
    })?;

    Ok(Json(ApiResponse::ok("Test email sent successfully!")))
}

// =============================================================================
// Forms
// =============================================================================

/// Consultation form endpoint.
pub async fn consultation(
    State(state): State<AppState>,
    FormBody(request): FormBody<ConsultationRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    let kind = FormKind::Consultation;

    let submission = request.validate().map_err(|e| {
        warn!(form = kind.as_str(), violations = ?e.violations, "submission_invalid");
        e
    })?;

    info!(
        form = kind.as_str(),
        has_phone = submission.phone.is_some(),
        has_company = submission.company.is_some(),
        message_length = submission.message.len(),
        "submission_received"
    );

    let notification = templates::consultation::notification(&submission, Utc::now());
    let confirmation = templates::consultation::confirmation(&submission);

    state
        .dispatcher
        .deliver_pair(notification, confirmation, &submission.email)
        .await
        .map_err(|source| {
            error!(
                form = kind.as_str(),
                stage = %source.stage,
                notification_delivered = source.notification_delivered(),
                error = %source,
                "submission_failed"
            );
            ApiError::Submission { kind, source }
        })?;

    info!(form = kind.as_str(), "submission_completed");
    Ok(Json(ApiResponse::ok(kind.success_message())))
}

/// Career application endpoint.
pub async fn careers(
    State(state): State<AppState>,
    FormBody(application): FormBody<CareerApplication>,
) -> Result<Json<ApiResponse>, ApiError> {
    let kind = FormKind::Career;

    let submission = application.validate().map_err(|e| {
        warn!(form = kind.as_str(), violations = ?e.violations, "submission_invalid");
        e
    })?;

    info!(
        form = kind.as_str(),
        role = submission.role.as_deref().unwrap_or("-"),
        has_notes = submission.notes.is_some(),
        "submission_received"
    );

    let notification = templates::career::notification(&submission, Utc::now());
    let confirmation = templates::career::confirmation(&submission);

    state
        .dispatcher
        .deliver_pair(notification, confirmation, &submission.email)
        .await
        .map_err(|source| {
            error!(
                form = kind.as_str(),
                stage = %source.stage,
                notification_delivered = source.notification_delivered(),
                error = %source,
                "submission_failed"
            );
            ApiError::Submission { kind, source }
        })?;

    info!(form = kind.as_str(), "submission_completed");
    Ok(Json(ApiResponse::ok(kind.success_message())))
}

// =============================================================================
// Fallback
// =============================================================================

/// Unmatched route or method.
pub async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}
