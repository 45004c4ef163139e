//! Storage traits for grant lookup.
//!
//! The grant index never queries the database directly; it talks to this
//! boundary. Implementations must be thread-safe (`Send + Sync`).

use async_trait::async_trait;

use clerkship_core::RequestStatus;

use crate::error::AuthError;
use crate::grants::FileGrant;

/// Read access to the grant and request state the file-grant index needs.
#[async_trait]
pub trait GrantStorage: Send + Sync {
    /// Returns the grants addressed to the given student for the given file,
    /// in storage order.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` for infrastructure failures.
    async fn grants_for_file(
        &self,
        file_id: &str,
        student_id: &str,
    ) -> Result<Vec<FileGrant>, AuthError>;

    /// Returns the lifecycle status of an originating request, or `None` if
    /// the request no longer exists.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` for infrastructure failures.
    async fn request_status(&self, request_id: &str) -> Result<Option<RequestStatus>, AuthError>;
}
