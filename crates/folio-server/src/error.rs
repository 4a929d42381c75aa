//! API and server error types.

use crate::config::ConfigError;
use crate::provider::ProviderError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::net::SocketAddr;
use thiserror::Error;

/// Asks the visitor for a question
pub const MISSING_QUESTION_TEXT: &str = "Please provide a question.";

/// Sent for unexpected failures while handling a chat request
pub const INTERNAL_ERROR_TEXT: &str = "Sorry, something went wrong. Please try again later.";

/// Errors returned by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// `question` missing, null or empty.
    #[error("question is missing")]
    MissingQuestion,

    /// Unknown `/api` route.
    #[error("API route not found")]
    NotFound,

    /// Anything else.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Chat errors use the widget's {"text"} shape
        let (status, body) = match &self {
            ApiError::MissingQuestion => {
                (StatusCode::BAD_REQUEST, json!({ "text": MISSING_QUESTION_TEXT }))
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, json!({ "error": self.to_string() })),
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "text": INTERNAL_ERROR_TEXT }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Start-up and runtime failures of the server itself.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid listen address {0:?}")]
    Address(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("moderator failed to start: {0}")]
    Guard(#[from] folio_guard::GuardError),

    #[error("provider setup failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("server error: {0}")]
    Runtime(#[from] std::io::Error),
}
