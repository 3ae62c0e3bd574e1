//! Domain-specific error types for lingodesk

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::clients::ModelError;
use crate::extract::ExtractionError;

/// Main error type for the lingodesk service
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Upstream model error: {message}")]
    Upstream { message: String },

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Audio error: {message}")]
    Audio { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<anyhow::Error> for EngineError {
    fn from(err: anyhow::Error) -> Self {
        EngineError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<ModelError> for EngineError {
    fn from(err: ModelError) -> Self {
        EngineError::Upstream {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Internal {
            message: format!("I/O error: {err}"),
        }
    }
}

/// Convert EngineError to an HTTP error response
impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let (status, label, details) = match self {
            EngineError::Config { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error",
                message,
            ),
            EngineError::Upstream { message } => {
                (StatusCode::BAD_GATEWAY, "Upstream model error", message)
            }
            EngineError::Extraction(err) => {
                (StatusCode::BAD_GATEWAY, "Extraction error", err.to_string())
            }
            EngineError::Audio { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Audio error", message)
            }
            EngineError::Serialization { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Serialization error",
                message,
            ),
            EngineError::Validation { message } => {
                (StatusCode::BAD_REQUEST, "Validation error", message)
            }
            EngineError::Internal { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error", message)
            }
        };

        (
            status,
            [(header::CONTENT_TYPE, "application/json")],
            json!({"error": {"code": status.as_u16(), "message": format!("{label}: {details}")}})
                .to_string(),
        )
            .into_response()
    }
}

/// Result type alias for lingodesk operations
pub type Result<T> = std::result::Result<T, EngineError>;
