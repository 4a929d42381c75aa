//! Error types for Folio Guard
//!
//! Rejections are never errors: they come back as a
//! [`ModerationVerdict`](crate::types::ModerationVerdict). The variants here
//! cover the moderator failing to come up at all.

use thiserror::Error;

/// Result type alias for Guard operations
pub type Result<T> = std::result::Result<T, GuardError>;

/// Guard error types
#[derive(Debug, Error)]
pub enum GuardError {
    /// A pattern in one of the tables failed to compile
    #[error("Invalid {table} pattern `{pattern}`: {source}")]
    Pattern {
        table: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Configuration values are inconsistent
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl GuardError {
    pub(crate) fn pattern(table: &'static str, pattern: &str, source: regex::Error) -> Self {
        GuardError::Pattern {
            table,
            pattern: pattern.to_string(),
            source,
        }
    }
}
