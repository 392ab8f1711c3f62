//! Error types for meatbar-core

use thiserror::Error;

/// Main error type for the meatbar-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing input
    #[error("validation error: {0}")]
    Validation(String),

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Store failure not raised by SQLite itself
    #[error("storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True when the persistence layer failed to read or write.
    pub fn is_storage(&self) -> bool {
        matches!(self, Error::Database(_) | Error::Storage(_))
    }

    /// True when the caller supplied bad input.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

/// Result type alias for meatbar-core
pub type Result<T> = std::result::Result<T, Error>;
