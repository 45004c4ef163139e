//! Authorization error types.

use thiserror::Error;

/// Errors that can occur during authorization operations.
///
/// Policy checks themselves never error; [`crate::PolicyTable`] returns
/// booleans. These errors cover the grant/page layer, where the two page
/// denials must stay textually distinguishable for testability.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The principal has no access to the resource.
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Description of why access is forbidden.
        message: String,
    },

    /// A page-range string failed to parse.
    #[error("Invalid page range: {message}")]
    InvalidPageRange {
        /// Description of the malformed input.
        message: String,
    },

    /// A requested page lies outside the document.
    #[error("Invalid page {page}: file has pages 1-{total}")]
    PageOutOfBounds {
        /// The offending page number.
        page: u32,
        /// Total pages in the document.
        total: u32,
    },

    /// A requested page lies outside the principal's authorized subset.
    #[error("Page {page} is outside your authorized pages: {authorized}")]
    PageNotAuthorized {
        /// The offending page number.
        page: u32,
        /// The authorized page-range string.
        authorized: String,
    },

    /// A grant references zero or multiple origins.
    #[error("Grant integrity violation: {message}")]
    GrantIntegrity {
        /// Description of the violation.
        message: String,
    },

    /// Grant storage failed at the infrastructure level.
    #[error("Grant storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },
}

impl AuthError {
    /// Create a new Forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Create a new InvalidPageRange error
    pub fn invalid_page_range(message: impl Into<String>) -> Self {
        Self::InvalidPageRange {
            message: message.into(),
        }
    }

    /// Create a new GrantIntegrity error
    pub fn grant_integrity(message: impl Into<String>) -> Self {
        Self::GrantIntegrity {
            message: message.into(),
        }
    }

    /// Create a new Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Returns `true` for 403-equivalent denials.
    pub fn is_access_denial(&self) -> bool {
        matches!(
            self,
            Self::Forbidden { .. } | Self::PageOutOfBounds { .. } | Self::PageNotAuthorized { .. }
        )
    }

    /// Returns `true` for 400-equivalent validation failures.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidPageRange { .. } | Self::GrantIntegrity { .. }
        )
    }
}
