use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::backend::client::BackendError;

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A backend-as-a-service error.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// An I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An authentication error.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The caller is authenticated but lacks the required role.
    #[error("Forbidden")]
    Forbidden,

    /// A resource not found error.
    #[error("Resource not found")]
    NotFound,

    /// A validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The record changed since the caller last read it.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A multipart error.
    #[error("Multipart error: {0}")]
    Multipart(String),

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Backend(BackendError::NoRows) => {
                tracing::debug!("Backend returned no rows");
                (StatusCode::NOT_FOUND, "Resource not found".to_string())
            }

            AppError::Backend(ref e) => {
                tracing::error!("Backend error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }

            AppError::Io(ref e) => {
                tracing::error!("IO error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "File system error".to_string())
            }

            AppError::Authentication(ref msg) => {
                tracing::warn!("Authentication failed: {}", msg);
                (StatusCode::UNAUTHORIZED, msg.clone())
            }

            AppError::Forbidden => {
                tracing::warn!("Authorization failed");
                (StatusCode::FORBIDDEN, "Forbidden".to_string())
            }

            AppError::NotFound => {
                tracing::debug!("Resource not found");
                (StatusCode::NOT_FOUND, "Resource not found".to_string())
            }

            AppError::Validation(ref msg) => {
                tracing::debug!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }

            AppError::Conflict(ref msg) => {
                tracing::debug!("Conflict: {}", msg);
                (StatusCode::CONFLICT, msg.clone())
            }

            AppError::Multipart(ref msg) => {
                tracing::warn!("Multipart error: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }

            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        crate::response::json(status, &ErrorBody { error: message })
    }
}
