//! The write-invalidation hook.
//!
//! Every create/update/delete handler calls
//! [`WriteInvalidationHook::invalidate_on_write`] post-commit. The hook
//! reads the written record's
//! scoping attributes through the typed [`RecordScope`] accessor (for
//! deletions, the pre-delete snapshot), encodes invalidation patterns, and
//! clears matching cache entries. Kinds with no declared scoping attributes
//! are a no-op and rely on TTL expiry.
//!
//! [`RecordScope`]: clerkship_core::RecordScope

use std::sync::Arc;

use clerkship_core::RecordScope;
use clerkship_storage::WriteOp;

use crate::config::CacheConfig;
use crate::error::CacheError;
use crate::key::encode_invalidation_patterns;
use crate::registry::cache_policy;
use crate::stats::CacheStats;
use crate::store::CacheStore;

/// Clears affected cached list-views after a record write.
pub struct WriteInvalidationHook {
    store: CacheStore,
    namespace: String,
    stats: Option<Arc<CacheStats>>,
}

impl WriteInvalidationHook {
    /// Creates a hook with the default namespace.
    #[must_use]
    pub fn new(store: CacheStore) -> Self {
        Self::with_config(store, &CacheConfig::default())
    }

    /// Creates a hook from configuration.
    #[must_use]
    pub fn with_config(store: CacheStore, config: &CacheConfig) -> Self {
        Self {
            store,
            namespace: config.namespace.clone(),
            stats: None,
        }
    }

    /// Attaches shared counters (see [`QueryCache::stats_handle`]).
    ///
    /// [`QueryCache::stats_handle`]: crate::middleware::QueryCache::stats_handle
    #[must_use]
    pub fn with_stats(mut self, stats: Arc<CacheStats>) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Invalidates the cached list-views affected by a write.
    ///
    /// Runs uniformly for create, update, and delete; for deletions the
    /// caller passes the record's pre-delete snapshot. Returns the number of
    /// entries removed. No-op when the kind declares no scoping attributes
    /// or the record yields none.
    ///
    /// Patterns are cleared independently: entries removed before a failing
    /// pattern stay removed, which only costs hit rate.
    ///
    /// # Errors
    ///
    /// Propagates backend failures as `CacheError::Backend`.
    pub async fn invalidate_on_write(
        &self,
        record: &dyn RecordScope,
        op: WriteOp,
    ) -> Result<u64, CacheError> {
        let policy = cache_policy(record.kind());
        if policy.scope_attrs.is_empty() {
            tracing::debug!(
                entity = policy.entity,
                op = %op,
                "no scoping attributes declared; skipping invalidation"
            );
            return Ok(0);
        }

        let scoping: Vec<(String, String)> = policy
            .scope_attrs
            .iter()
            .filter_map(|attr| {
                record
                    .scope_value(*attr)
                    .map(|value| (attr.key().to_string(), value))
            })
            .collect();
        if scoping.is_empty() {
            tracing::debug!(
                entity = policy.entity,
                op = %op,
                "no scoping values extractable; skipping invalidation"
            );
            return Ok(0);
        }

        let patterns = encode_invalidation_patterns(&self.namespace, policy.entity, &scoping);
        let removed = self.store.invalidate(&patterns).await?;
        if let Some(stats) = &self.stats {
            stats.record_invalidations(removed);
        }
        tracing::debug!(
            entity = policy.entity,
            op = %op,
            removed,
            "write invalidation"
        );
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBackend;
    use clerkship_core::{Observation, Patient};
    use serde_json::json;

    fn observation(id: &str, patient: &str, owner: &str) -> Observation {
        Observation::new(id, patient, owner, "blood-pressure", json!({"systolic": 120}))
    }

    async fn seeded_store() -> CacheStore {
        let store = CacheStore::new(Arc::new(MemoryBackend::new()));
        store
            .set("clerkship:observation:list:aaaa", json!(1), None)
            .await
            .unwrap();
        store
            .set("clerkship:observation:list:bbbb", json!(2), None)
            .await
            .unwrap();
        store
            .set("clerkship:patient:list:cccc", json!(3), None)
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_create_clears_entity_list_caches() {
        let store = seeded_store().await;
        let hook = WriteInvalidationHook::new(store.clone());

        let removed = hook
            .invalidate_on_write(&observation("obs-1", "p-1", "s-1"), WriteOp::Create)
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.get("clerkship:observation:list:aaaa").await.unwrap(), None);
        assert_eq!(store.get("clerkship:observation:list:bbbb").await.unwrap(), None);
        // Other entities stay cached.
        assert_eq!(
            store.get("clerkship:patient:list:cccc").await.unwrap(),
            Some(json!(3))
        );
    }

    #[tokio::test]
    async fn test_all_write_ops_invalidate_uniformly() {
        for op in [WriteOp::Create, WriteOp::Update, WriteOp::Delete] {
            let store = seeded_store().await;
            let hook = WriteInvalidationHook::new(store.clone());
            // For deletes this is the pre-delete snapshot.
            let removed = hook
                .invalidate_on_write(&observation("obs-1", "p-1", "s-1"), op)
                .await
                .unwrap();
            assert_eq!(removed, 2, "op {op} should clear observation lists");
        }
    }

    #[tokio::test]
    async fn test_patient_writes_are_a_no_op() {
        let store = seeded_store().await;
        let hook = WriteInvalidationHook::new(store.clone());

        let removed = hook
            .invalidate_on_write(&Patient::new("p-1", "Ada Lovelace"), WriteOp::Update)
            .await
            .unwrap();
        assert_eq!(removed, 0);
        // Patient lists expire by TTL alone.
        assert_eq!(
            store.get("clerkship:patient:list:cccc").await.unwrap(),
            Some(json!(3))
        );
    }

    #[tokio::test]
    async fn test_stats_record_invalidations() {
        let store = seeded_store().await;
        let stats = Arc::new(CacheStats::new());
        let hook = WriteInvalidationHook::new(store).with_stats(Arc::clone(&stats));

        hook.invalidate_on_write(&observation("obs-1", "p-1", "s-1"), WriteOp::Create)
            .await
            .unwrap();
        assert_eq!(stats.snapshot().invalidations, 2);
    }

    #[tokio::test]
    async fn test_scan_only_backend_invalidates_too() {
        let store = CacheStore::new(Arc::new(MemoryBackend::scan_only()));
        store
            .set("clerkship:observation:list:aaaa", json!(1), None)
            .await
            .unwrap();
        let hook = WriteInvalidationHook::new(store.clone());

        let removed = hook
            .invalidate_on_write(&observation("obs-1", "p-1", "s-1"), WriteOp::Create)
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.get("clerkship:observation:list:aaaa").await.unwrap(), None);
    }
}
