//! HTTP mapping for library errors.
//!
//! Every response body is a short `{"error": ...}` message; internal
//! identifiers and failure detail stay in the server logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::Error;

/// A classified, client-facing failure.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// 400 with a caller-supplied reason.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// 401 for a missing or unverifiable credential.
    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "Authentication required".to_string(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = if err.is_authentication_error() {
            StatusCode::UNAUTHORIZED
        } else if err.is_permission_denied() {
            StatusCode::FORBIDDEN
        } else if err.is_not_found() {
            StatusCode::NOT_FOUND
        } else if err.is_validation_error() || err.is_conflict() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Unclassified failure in {}: {err}", err.module());
            "Internal server error".to_string()
        } else {
            err.to_string()
        };

        Self { status, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = axum::Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}
