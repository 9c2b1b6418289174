//! Application error types for core storage and domain logic.
use crate::validation::FieldError;
use thiserror::Error;

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    StorageMessage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation failed")]
    Validation(Vec<FieldError>),
}

impl AppError {
    /// Whether this error comes from the storage layer rather than the caller.
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            Self::Database(_) | Self::Io(_) | Self::Serialization(_) | Self::StorageMessage(_)
        )
    }
}

impl From<tempfile::PersistError> for AppError {
    fn from(value: tempfile::PersistError) -> Self {
        Self::Io(value.error)
    }
}
