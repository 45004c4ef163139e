//! Storage traits for the repository abstraction layer.
//!
//! This module defines the contract every storage backend must implement.

use async_trait::async_trait;
use serde_json::Value;

use clerkship_core::ResourceKind;

use crate::error::StorageError;
use crate::types::{ListParams, ListResult, StoredRecord};

/// The repository trait the caching layer and write handlers talk to.
///
/// Implementations must be thread-safe (`Send + Sync`). The cache treats
/// `list` output as opaque: it stores the serialized result verbatim and
/// never inspects individual entries.
///
/// # Example
///
/// ```ignore
/// use clerkship_storage::{RecordStore, ListParams};
///
/// async fn patient_observations(
///     store: &dyn RecordStore,
///     patient_id: &str,
/// ) -> Result<ListResult, StorageError> {
///     let params = ListParams::new().with_filter("patient", patient_id);
///     store.list(ResourceKind::Observation, &params).await
/// }
/// ```
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Lists records of a kind matching the given parameters, in backend
    /// order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidQuery` for unsupported parameters and
    /// `StorageError::Backend` for infrastructure failures.
    async fn list(
        &self,
        kind: ResourceKind,
        params: &ListParams,
    ) -> Result<ListResult, StorageError>;

    /// Creates a new record and returns it as stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::AlreadyExists` if a record with the same kind
    /// and ID exists, `StorageError::InvalidRecord` if the payload is
    /// malformed.
    async fn create(&self, kind: ResourceKind, payload: &Value)
    -> Result<StoredRecord, StorageError>;

    /// Updates an existing record and returns the new stored state.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the record does not exist.
    async fn update(
        &self,
        kind: ResourceKind,
        id: &str,
        payload: &Value,
    ) -> Result<StoredRecord, StorageError>;

    /// Deletes a record and returns its pre-delete snapshot.
    ///
    /// The snapshot is what the write-invalidation hook extracts scoping
    /// attributes from; capture before the destructive action, not after.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the record does not exist.
    async fn delete(&self, kind: ResourceKind, id: &str) -> Result<StoredRecord, StorageError>;

    /// Returns the name of this storage backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time test that RecordStore is object-safe
    fn _assert_store_object_safe(_: &dyn RecordStore) {}
}
