//! Error types for studynotes-api
//!
//! Upstream LLM and persistence failures all map to the same opaque 500
//! body; the cause only goes to the log.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::service::ServiceError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Authenticated caller acting on another user's data (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Study session pipeline failure (500)
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::Service(ref err) => {
                tracing::error!(error = %err, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
