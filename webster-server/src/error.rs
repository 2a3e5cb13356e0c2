//! API error type and its mapping onto HTTP responses.
//!
//! Handlers return `ApiResult<T>`; the error half renders as a JSON body
//! `{"error": "..."}` with the status the failure class calls for:
//! 400 validation, 401 auth, 403 ownership, 404 missing, 409 duplicates,
//! 413 oversized uploads, 500 everything internal.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::metrics;

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced by API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request payload failed validation.
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid credentials/token.
    #[error("Authentication required")]
    Unauthorized,

    /// Authenticated but not allowed to touch this resource.
    #[error("{0}")]
    Forbidden(String),

    /// Entity does not exist (or is soft-deleted).
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness conflict (duplicate email/username).
    #[error("{0}")]
    Conflict(String),

    /// Upload body exceeded the configured size cap.
    #[error("Upload too large")]
    PayloadTooLarge,

    /// Malformed multipart body.
    #[error("Invalid multipart body: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    /// Database failure.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Filesystem failure while handling uploads.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else.
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(_: jsonwebtoken::errors::Error) -> Self {
        Self::Unauthorized
    }
}

impl From<webster_core::CanvasError> for ApiError {
    fn from(err: webster_core::CanvasError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl ApiError {
    /// Status code this error renders as.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Multipart(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Database(_) | Self::Io(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal details stay in the logs, not the response body.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Internal error: {self}");
            "Internal server error".to_string()
        } else {
            tracing::debug!("Request failed with {status}: {self}");
            self.to_string()
        };

        if matches!(self, ApiError::Validation(_)) {
            metrics::record_validation_failure();
        }

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Validation("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::Forbidden("no".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound("gone".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("dup".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::PayloadTooLarge.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ApiError::Database(sqlx::Error::PoolTimedOut).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_canvas_error_becomes_validation() {
        let err: ApiError = webster_core::CanvasError::InvalidContent("nope".into()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
