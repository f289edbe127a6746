//! Request body extraction for the form endpoints.
//!
//! Browsers post either JSON or classic URL-encoded forms. Bodies with any
//! other (or no) content type are treated as an empty object, so a bare POST
//! reaches validation and gets the usual "required fields" answer.

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form,
};
use serde::de::DeserializeOwned;
use tracing::warn;

use super::error::ApiError;

/// JSON or URL-encoded body.
#[derive(Debug)]
pub struct FormBody<T>(pub T);

#[derive(Debug, PartialEq, Eq)]
enum BodyFormat {
    Json,
    UrlEncoded,
    Other,
}

fn body_format(content_type: Option<&str>) -> BodyFormat {
    let Some(content_type) = content_type else {
        return BodyFormat::Other;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if essence == "application/x-www-form-urlencoded" {
        BodyFormat::UrlEncoded
    } else if essence == "application/json" || essence.ends_with("+json") {
        BodyFormat::Json
    } else {
        BodyFormat::Other
    }
}

fn empty_object<T: DeserializeOwned>() -> Result<T, ApiError> {
    serde_json::from_slice(b"{}").map_err(|e| ApiError::InvalidBody(e.to_string()))
}

#[async_trait]
impl<S, T> FromRequest<S> for FormBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let format = body_format(
            req.headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
        );

        match format {
            BodyFormat::UrlEncoded => {
                let Form(value) = Form::<T>::from_request(req, state).await.map_err(|rejection| {
                    warn!(error = %rejection.body_text(), "form_body_rejected");
                    ApiError::InvalidBody(rejection.body_text())
                })?;
                Ok(Self(value))
            }
            BodyFormat::Json => {
                let bytes = Bytes::from_request(req, state)
                    .await
                    .map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))?;

                if bytes.iter().all(u8::is_ascii_whitespace) {
                    return empty_object().map(Self);
                }

                serde_json::from_slice(&bytes).map(Self).map_err(|e| {
                    warn!(error = %e, "json_body_rejected");
                    ApiError::InvalidBody(e.to_string())
                })
            }
            BodyFormat::Other => empty_object().map(Self),
        }
    }
}
