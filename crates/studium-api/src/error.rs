//! API boundary error type and HTTP status mapping.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

/// Errors surfaced to HTTP callers.
#[derive(Debug)]
pub enum ApiError {
    /// Internal failure (datastore, provider, extraction). The message is
    /// redacted outside development mode.
    Internal(studium_core::Error),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    BadRequest(String),
    PayloadTooLarge(String),
}

impl From<studium_core::Error> for ApiError {
    fn from(err: studium_core::Error) -> Self {
        use studium_core::Error;
        match err {
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::NoteNotFound(id) => ApiError::NotFound(format!("Note not found: {}", id)),
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::Unauthorized(msg) => ApiError::Unauthorized(msg),
            other => ApiError::Internal(other),
        }
    }
}

/// Whether internal error detail may be shown to callers.
fn development_mode() -> bool {
    std::env::var("APP_ENV")
        .map(|v| v == "development")
        .unwrap_or(false)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Internal(err) => {
                tracing::error!(subsystem = "api", error = %err, "Request failed");
                let message = if development_mode() {
                    err.to_string()
                } else {
                    "Internal server error".to_string()
                };
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
        };

        let body = Json(serde_json::json!({
            "success": false,
            "message": message,
        }));

        (status, body).into_response()
    }
}
