//! Error types for the Q&A service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for knowledge-qa operations
pub type Result<T> = std::result::Result<T, Error>;

/// Q&A service errors
#[derive(Debug, Error)]
pub enum Error {
    /// Rejected input (upload type, encoding, chunk parameters)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Blank or whitespace-only question
    #[error("Question cannot be empty")]
    EmptyQuestion,

    /// Query against an empty corpus
    #[error("No documents uploaded yet")]
    NoDocuments,

    /// Document not found
    #[error("Document not found: {0}")]
    DocumentNotFound(i64),

    /// Query and stored vectors live in different vocabularies
    #[error("Vector space mismatch: expected dimension {expected}, got {actual}")]
    VectorSpace { expected: usize, actual: usize },

    /// Upstream credential missing
    #[error("LLM unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Upstream returned a non-success response
    #[error("LLM API error: {0}")]
    UpstreamError(String),

    /// Upstream did not answer within the deadline
    #[error("LLM request timed out after {0}s")]
    UpstreamTimeout(u64),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// SQLite error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an upstream error
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::UpstreamError(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP status and machine-readable type for this error
    fn status_and_type(&self) -> (StatusCode, &'static str) {
        match self {
            Error::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            Error::EmptyQuestion => (StatusCode::BAD_REQUEST, "empty_question"),
            Error::NoDocuments => (StatusCode::BAD_REQUEST, "no_documents"),
            Error::DocumentNotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            Error::VectorSpace { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "vector_space_error"),
            Error::UpstreamUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "llm_unavailable"),
            Error::UpstreamError(_) => (StatusCode::BAD_GATEWAY, "llm_error"),
            Error::UpstreamTimeout(_) => (StatusCode::GATEWAY_TIMEOUT, "llm_timeout"),
            Error::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            Error::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            Error::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error"),
            Error::Json(_) => (StatusCode::INTERNAL_SERVER_ERROR, "json_error"),
            Error::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_type();

        if status.is_server_error() {
            tracing::error!("{} ({})", self, error_type);
        }

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
