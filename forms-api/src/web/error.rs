//! Handler error type and the JSON envelope shared by all responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::forms::{FormKind, ValidationError};
use crate::mail::{DeliveryError, DispatchError};

/// Message for unmatched routes.
pub const ROUTE_NOT_FOUND_MESSAGE: &str = "Route not found";

/// Message for unexpected failures. Details stay in the logs.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Message for bodies that could not be parsed.
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

/// `{success, message}` envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// `/api/test-email` failure body, which reports the transport error text.
#[derive(Debug, Serialize)]
pub struct DiagnosticFailure {
    pub success: bool,
    pub error: String,
}

/// Every way a request can fail after passing the rate limiter.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("{} submission failed: {source}", .kind.as_str())]
    Submission {
        kind: FormKind,
        #[source]
        source: DispatchError,
    },

    #[error("test email failed: {0}")]
    TestEmail(#[source] DeliveryError),

    #[error("route not found")]
    RouteNotFound,

    #[error("unhandled error: {0}")]
    Unhandled(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::failure(err.message())),
            )
                .into_response(),
            ApiError::InvalidBody(_) => (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::failure(INVALID_BODY_MESSAGE)),
            )
                .into_response(),
            ApiError::Submission { kind, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::failure(kind.failure_message())),
            )
                .into_response(),
            ApiError::TestEmail(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DiagnosticFailure {
                    success: false,
                    error: err.to_string(),
                }),
            )
                .into_response(),
            ApiError::RouteNotFound => (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::failure(ROUTE_NOT_FOUND_MESSAGE)),
            )
                .into_response(),
            ApiError::Unhandled(detail) => {
                error!(detail = %detail, "unhandled_error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::failure(INTERNAL_ERROR_MESSAGE)),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::Violation;
    use crate::mail::DispatchStage;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_error_response() {
        let err = ApiError::from(ValidationError {
            kind: FormKind::Career,
            violations: vec![Violation::InvalidEmail],
        });

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Please provide a valid email address");
    }

    #[tokio::test]
    async fn test_submission_error_hides_transport_details() {
        let err = ApiError::Submission {
            kind: FormKind::Consultation,
            source: DispatchError {
                stage: DispatchStage::Notification,
                source: DeliveryError::Unreachable {
                    host: "smtp.internal.example".to_string(),
                },
            },
        };

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(
            body["message"],
            "Failed to submit consultation request. Please try again later."
        );
        assert!(!body.to_string().contains("smtp.internal.example"));
    }

    #[tokio::test]
    async fn test_test_email_error_reports_detail() {
        let err = ApiError::TestEmail(DeliveryError::MissingCredentials);

        let body = body_json(err.into_response()).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "mail account credentials are not configured");
    }

    #[tokio::test]
    async fn test_unhandled_error_is_generic() {
        let response = ApiError::Unhandled("boom at line 3".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Internal server error");
        assert!(!body.to_string().contains("boom"));
    }
}
