//! Cache error types.

use thiserror::Error;

use clerkship_storage::StorageError;

/// Errors that can occur during cache operations.
///
/// A backend that cannot get or set at all is a fatal dependency failure;
/// the only tolerated degradation is a missing pattern-delete capability,
/// which the store absorbs by switching to the full-scan strategy.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache backend failed at the infrastructure level.
    #[error("Cache backend error: {message}")]
    Backend {
        /// Description of the backend failure.
        message: String,
    },

    /// A cached payload could not be serialized or deserialized.
    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend does not support native pattern deletion.
    ///
    /// Raised by backends from `delete_pattern`; the store's capability
    /// probe keeps this from surfacing to callers.
    #[error("Backend '{backend}' does not support pattern deletion")]
    PatternUnsupported {
        /// The backend name.
        backend: &'static str,
    },

    /// The underlying query engine failed on a cache miss.
    #[error("Query error: {0}")]
    Query(#[from] StorageError),
}

impl CacheError {
    /// Create a new Backend error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Create a new PatternUnsupported error
    pub fn pattern_unsupported(backend: &'static str) -> Self {
        Self::PatternUnsupported { backend }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_message() {
        let err = CacheError::backend("connection reset");
        assert_eq!(err.to_string(), "Cache backend error: connection reset");
    }

    #[test]
    fn test_query_error_conversion() {
        let err: CacheError = StorageError::invalid_query("bad filter").into();
        assert!(matches!(err, CacheError::Query(_)));
    }
}
