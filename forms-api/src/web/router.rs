//! Route table and middleware stack.
//!
//! Layers, outermost first:
//!
//! ```text
//! trailing-slash trim → TraceLayer → security headers → CORS → rate limit (/api/*) → panic guard → routes
//! ```

use std::any::Any;

use axum::{
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, normalize_path::NormalizePath, trace::TraceLayer};

use super::error::ApiError;
use super::handlers::{careers, consultation, health, not_found, root, test_email, AppState};
use super::rate_limit::rate_limit;
use super::security::{cors_layer, with_security_headers};

/// The served application. Path normalization wraps the router so it runs
/// before route matching.
pub type App = NormalizePath<Router>;

/// Build the complete application.
pub fn router(state: AppState) -> App {
    let cors = cors_layer(&state.config.frontend_url);

    let routes = Router::new()
        .route("/", get(root).fallback(not_found))
        .route("/api/health", get(health).fallback(not_found))
        .route("/api/test-email", get(test_email).fallback(not_found))
        .route("/api/consultation", post(consultation).fallback(not_found))
        .route("/api/careers", post(careers).fallback(not_found))
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(cors);

    let app = with_security_headers(routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    NormalizePath::trim_trailing_slash(app)
}

/// Turn a handler panic into the generic 500 envelope.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::Unhandled(detail).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::web::error::INTERNAL_ERROR_MESSAGE;

    async fn assert_generic_500(response: Response) {
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], INTERNAL_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_handle_panic_payloads() {
        assert_generic_500(handle_panic(Box::new("static detail"))).await;
        assert_generic_500(handle_panic(Box::new(String::from("owned detail")))).await;
        assert_generic_500(handle_panic(Box::new(42_u32))).await;
    }

    async fn explode() -> &'static str {
        panic!("template lookup failed")
    }

    async fn explode_formatted() -> &'static str {
        let slot = 7;
        panic!("slot {slot} missing")
    }

    #[tokio::test]
    async fn test_panicking_handler_returns_500() {
        let app = Router::new()
            .route("/str", axum::routing::get(explode))
            .route("/string", axum::routing::get(explode_formatted))
            .layer(CatchPanicLayer::custom(handle_panic));

        for uri in ["/str", "/string"] {
            let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_generic_500(response).await;
        }
    }
}
