//! Error types for Waydeck.

use thiserror::Error;

/// Top-level result type for Waydeck operations.
pub type Result<T> = std::result::Result<T, WaydeckError>;

/// Top-level error type for Waydeck.
#[derive(Debug, Error)]
pub enum WaydeckError {
    #[error("date error: {0}")]
    Date(#[from] DateError),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while interpreting date/time input.
///
/// Absent input is never an error; only present input that cannot be read
/// as ISO-8601 ends up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("'{input}' is not an ISO-8601 date or timestamp")]
    Malformed { input: String },

    #[error("{wall} does not exist at offset {offset}")]
    Unrepresentable { wall: String, offset: String },
}
