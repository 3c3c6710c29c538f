//! Error types for the runpad server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use runpad_core::{ConfigError, ValidationError};
use serde_json::json;
use thiserror::Error;

/// Result type alias for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Errors that can occur in the runpad server.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Malformed request body
    #[error("{0}")]
    InvalidRequest(String),

    /// Requested resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// Server configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Create a new invalid request error.
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create a new not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new configuration error.
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<ValidationError> for ServerError {
    fn from(err: ValidationError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

impl From<ConfigError> for ServerError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Convert ServerError to HTTP status code
impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Config(_) | ServerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            ServerError::InvalidRequest(_) => "invalid_request",
            ServerError::NotFound(_) => "not_found",
            ServerError::Config(_) => "config_error",
            ServerError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Request failed ({}): {}", self.error_type(), self);
        } else {
            log::debug!("Request rejected ({}): {}", self.error_type(), self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
