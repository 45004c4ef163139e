//! Storage error types.

use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested record does not exist.
    #[error("Record not found: {kind}/{id}")]
    NotFound { kind: String, id: String },

    /// A record with the same kind and ID already exists.
    #[error("Record already exists: {kind}/{id}")]
    AlreadyExists { kind: String, id: String },

    /// The record payload is malformed.
    #[error("Invalid record: {message}")]
    InvalidRecord { message: String },

    /// The list parameters are unsupported or malformed.
    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },

    /// The backend failed at the infrastructure level.
    #[error("Storage backend error: {message}")]
    Backend { message: String },
}

impl StorageError {
    /// Create a new NotFound error
    pub fn not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Create a new AlreadyExists error
    pub fn already_exists(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self::AlreadyExists {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Create a new InvalidRecord error
    pub fn invalid_record(message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            message: message.into(),
        }
    }

    /// Create a new InvalidQuery error
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }

    /// Create a new Backend error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}
