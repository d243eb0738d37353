//! Unified error types and result handling.

use thiserror::Error;

/// Errors produced by the bucketbook core and its stores.
#[derive(Debug, Error)]
pub enum Error {
    /// The SQLite backend rejected a statement.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A store refused to write or remove a document.
    #[error("Storage error for '{key}': {message}")]
    Storage {
        /// The document key that could not be written
        key: String,
        /// What went wrong
        message: String,
    },

    /// A document could not be encoded to JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration could not be loaded or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// User input was rejected before anything was written.
    #[error("Validation error: {message}")]
    Validation {
        /// What went wrong
        message: String,
    },

    /// An amount was not a usable number.
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Builds a [`Error::Storage`] for the given key.
    pub fn storage(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Storage {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
