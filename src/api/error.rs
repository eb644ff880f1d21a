//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::generator::GeneratorError;
use crate::github::GitHubError;
use crate::storage::StoreError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed
    #[error("{0}")]
    Validation(String),

    /// No session, or the session expired
    #[error("{0}")]
    Unauthorized(String),

    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    /// GitHub call failed
    #[error(transparent)]
    GitHub(#[from] GitHubError),

    /// Changelog generation failed
    #[error(transparent)]
    Generator(#[from] GeneratorError),

    /// Changelog store error
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Service unavailable (dependency not configured)
    #[error("{0}")]
    ServiceUnavailable(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn unauthorized() -> Self {
        ApiError::Unauthorized("Not authenticated".to_string())
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::GitHub(e) => match e {
                GitHubError::NotConfigured => {
                    (StatusCode::SERVICE_UNAVAILABLE, "GITHUB_NOT_CONFIGURED")
                }
                GitHubError::InvalidToken => (StatusCode::UNAUTHORIZED, "GITHUB_UNAUTHORIZED"),
                GitHubError::NotFound(_) => (StatusCode::NOT_FOUND, "GITHUB_NOT_FOUND"),
                GitHubError::OAuth(_) => (StatusCode::BAD_REQUEST, "OAUTH_ERROR"),
                GitHubError::RateLimited => (StatusCode::BAD_GATEWAY, "GITHUB_RATE_LIMITED"),
                _ => (StatusCode::BAD_GATEWAY, "GITHUB_ERROR"),
            },
            ApiError::Generator(e) => match e {
                GeneratorError::NotConfigured => {
                    (StatusCode::SERVICE_UNAVAILABLE, "LLM_NOT_CONFIGURED")
                }
                _ => (StatusCode::BAD_GATEWAY, "LLM_ERROR"),
            },
            ApiError::Store(StoreError::NotFound(_)) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Human-readable message shown by the UI
    pub detail: String,
    pub code: String,
    pub request_id: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let request_id = uuid::Uuid::new_v4().to_string();

        if status.is_server_error() {
            tracing::error!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "API error occurred"
            );
        } else {
            tracing::warn!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "API request rejected"
            );
        }

        let body = ErrorResponse {
            detail: self.to_string(),
            code: code.to_string(),
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::unauthorized(), StatusCode::UNAUTHORIZED),
            (ApiError::Store(StoreError::NotFound(3)), StatusCode::NOT_FOUND),
            (
                ApiError::Generator(GeneratorError::NotConfigured),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ApiError::Generator(GeneratorError::Timeout),
                StatusCode::BAD_GATEWAY,
            ),
            (
                ApiError::GitHub(GitHubError::InvalidToken),
                StatusCode::UNAUTHORIZED,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_detail_is_plain_message() {
        let err = ApiError::Generator(GeneratorError::NotConfigured);
        assert_eq!(err.to_string(), "OpenAI API not configured");

        let err = ApiError::Store(StoreError::NotFound(9));
        assert_eq!(err.to_string(), "Storage error: Changelog 9 not found");
    }
}
