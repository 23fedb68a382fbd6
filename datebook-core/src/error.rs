//! Error types for datebook.

use thiserror::Error;

/// Errors that can occur in datebook operations.
#[derive(Error, Debug)]
pub enum DatebookError {
    #[error("Invalid appointment: {0}")]
    Validation(String),

    #[error("Appointment not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Appointment '{0}' is already indexed")]
    DuplicateAppointment(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl DatebookError {
    /// Whether this error came from the store's transport or persistence
    /// rather than from the request itself.
    pub fn is_store_failure(&self) -> bool {
        matches!(self, DatebookError::Store(_) | DatebookError::Serialization(_))
    }
}

/// Result type alias for datebook operations.
pub type DatebookResult<T> = Result<T, DatebookError>;
