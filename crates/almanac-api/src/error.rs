//! Error types for the HTTP API.
//!
//! [`ApiError`] unifies all failure modes into a single enum that can be
//! converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use almanac_core::{ResolveError, ValidationError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Message returned to clients for every internal failure.
const INTERNAL_MESSAGE: &str = "internal server error";

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The query string could not be decoded.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The `year` parameter failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No year with events could be found.
    #[error("not found: {0}")]
    NotFound(String),

    /// An internal error occurred. The message is logged, never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::NoMatch { .. } => Self::NotFound(err.to_string()),
            ResolveError::Source(_) => Self::Internal(error_chain(&err)),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::InvalidQuery(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Internal(detail) => {
                tracing::error!(error = %detail, "Error (global handler)");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_owned())
            }
        };

        error_response(status, &message)
    }
}

/// Build the JSON error body shared by every error path.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    let body = serde_json::json!({
        "error": message,
        "status": status.as_u16(),
    });

    (status, axum::Json(body)).into_response()
}

/// Render an error and all of its sources as `outer: inner: ...`.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("disk on fire")]
    struct Inner;

    #[test]
    fn chain_includes_sources() {
        let err = ResolveError::Source(Box::new(Inner));
        assert_eq!(error_chain(&err), "event source error: disk on fire");
    }

    #[test]
    fn status_codes() {
        assert_eq!(
            ApiError::Validation(ValidationError::Missing)
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvalidQuery(String::from("x")).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(ResolveError::NoMatch {
                requested: 1805,
                attempts: 3
            })
            .into_response()
            .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(ResolveError::Source(Box::new(Inner)))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
