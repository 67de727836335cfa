//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::registry::DispatchError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Delivery errors (4xx)
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    // Server errors (5xx)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, details) = match &self {
            AppError::Dispatch(dispatch_err) => match dispatch_err {
                DispatchError::InvalidPath(path) => {
                    (StatusCode::BAD_REQUEST, "invalid_path", Some(path.clone()))
                }
                DispatchError::NoBinding { collection, kind } => (
                    StatusCode::NOT_FOUND,
                    "no_binding",
                    Some(format!("{}:{}", collection, kind)),
                ),
                DispatchError::InvalidTemplate(template) => {
                    tracing::error!("Invalid template reached dispatch: {}", template);
                    (StatusCode::INTERNAL_SERVER_ERROR, "invalid_template", None)
                }
                DispatchError::DuplicateBinding { .. } => {
                    tracing::error!("Duplicate binding reached dispatch: {}", dispatch_err);
                    (StatusCode::INTERNAL_SERVER_ERROR, "duplicate_binding", None)
                }
            },

            // 500 Internal Server Error
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
            AppError::Config(e) => {
                tracing::error!("Config error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "config_error", None)
            }
        };

        let body = ErrorResponse {
            error: self.to_string(),
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}
