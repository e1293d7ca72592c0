//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Memora
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum MemoraError {
    /// Input failed validation (malformed draft fields, blank title). The
    /// caller must fix the input; nothing is coerced silently.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The calendar provider token is missing or rejected. User-actionable:
    /// the message always suggests reconnecting the calendar account.
    #[error("Calendar authorization required: {0}")]
    AuthRequired(String),

    /// The external calendar API rejected the request for a reason other
    /// than missing authorization. Carries the upstream status and message.
    #[error("Calendar API error (status {status}): {message}")]
    ExternalApi {
        /// Upstream HTTP status code
        status: u16,
        /// Upstream error message
        message: String,
    },

    /// Database-layer failure
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// No record matched the requested id within the caller's scope
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transport-level failure (connect, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Memora operations
pub type Result<T> = std::result::Result<T, MemoraError>;
