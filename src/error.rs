//! Error types for the front desk.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeskError {
    /// Malformed or out-of-range form input.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// The action conflicts with the room's current status.
    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    /// Bill creation against a room that is not occupied.
    #[error("Precondition failed: {message}")]
    Precondition { message: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Database error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Database unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Receipt rendering failed: {0}")]
    Render(String),

    #[error("Printing failed: {0}")]
    Print(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DeskError {
    pub fn validation(message: impl Into<String>) -> Self {
        DeskError::Validation {
            message: message.into(),
        }
    }

    pub fn room_not_found(room_number: &str) -> Self {
        DeskError::NotFound {
            entity: "Room",
            id: room_number.to_string(),
        }
    }

    pub fn bill_not_found(bill_number: &str) -> Self {
        DeskError::NotFound {
            entity: "Bill",
            id: bill_number.to_string(),
        }
    }
}

impl From<::config::ConfigError> for DeskError {
    fn from(err: ::config::ConfigError) -> Self {
        DeskError::Config(err.to_string())
    }
}

pub type DeskResult<T> = Result<T, DeskError>;
