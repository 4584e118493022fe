//! HTTP error type for rubin-mx
//!
//! Every failure leaves the service as `{"error": {"code", "message"}}`
//! JSON with a matching status code.

use crate::capture::CaptureError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    /// Unknown style or snapshot (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request parameters (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Request conflicts with existing state (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Audio capture failed (502)
    #[error("Capture failed: {0}")]
    Capture(#[from] CaptureError),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// rubin-common error, mapped by kind
    #[error(transparent)]
    Common(#[from] rubin_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Capture(_) => (StatusCode::BAD_GATEWAY, "CAPTURE_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Common(err) => match err {
                rubin_common::Error::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                rubin_common::Error::InvalidInput(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
                rubin_common::Error::Serialization(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "SERIALIZATION_ERROR")
                }
                rubin_common::Error::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
                rubin_common::Error::Config(_) | rubin_common::Error::Internal(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
                }
            },
        };

        let message = match &self {
            ApiError::Common(err) => err.to_string(),
            ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Conflict(msg)
            | ApiError::Internal(msg) => msg.clone(),
            ApiError::Capture(err) => err.to_string(),
        };

        if status.is_server_error() {
            error!(code, "{}", message);
        } else {
            warn!(code, "{}", message);
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
