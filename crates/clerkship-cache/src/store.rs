//! The cache store and its backends.
//!
//! [`CacheStore`] fronts an abstract key-value backend. Invalidation runs
//! through one of two strategies: native pattern deletion when the backend
//! supports it, or a full scan over live keys otherwise. The capability is
//! probed once at construction, not per call.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use time::{Duration, OffsetDateTime};
use tokio::sync::RwLock;

use crate::error::CacheError;

/// Default entry time-to-live applied when a caller does not specify one.
///
/// TTL is absolute from insertion; reads never extend an entry's life.
pub const DEFAULT_TTL: Duration = Duration::seconds(300);

// =============================================================================
// Backend Trait
// =============================================================================

/// The key-value backend contract.
///
/// Implementations must be thread-safe (`Send + Sync`) and must treat
/// expired entries as absent at lookup time; no background sweep is
/// required of them.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Fetches a live entry.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Backend` for infrastructure failures. A missing
    /// or expired key is `Ok(None)`, not an error.
    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError>;

    /// Stores an entry with the given time-to-live.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Backend` for infrastructure failures.
    async fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<(), CacheError>;

    /// Deletes a single key. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Enumerates all live (unexpired) keys, for the full-scan strategy.
    async fn live_keys(&self) -> Result<Vec<String>, CacheError>;

    /// Natively deletes all keys matching a trailing-glob pattern, returning
    /// the number removed.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::PatternUnsupported` when the backend lacks the
    /// capability; the store's construction-time probe avoids calling it in
    /// that case.
    async fn delete_pattern(&self, pattern: &str) -> Result<u64, CacheError>;

    /// Whether `delete_pattern` is supported.
    fn supports_pattern_delete(&self) -> bool;

    /// Returns the name of this backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}

// =============================================================================
// In-Memory Backend
// =============================================================================

struct StoredEntry {
    value: Value,
    expires_at: OffsetDateTime,
}

impl StoredEntry {
    fn is_expired(&self) -> bool {
        self.expires_at <= OffsetDateTime::now_utc()
    }
}

/// In-memory cache backend.
///
/// The default construction is pattern-capable. [`MemoryBackend::scan_only`]
/// builds one without the capability, which forces the store onto the
/// full-scan invalidation strategy, for backends that genuinely
/// lack glob deletion and for exercising the fallback in tests.
pub struct MemoryBackend {
    entries: RwLock<std::collections::HashMap<String, StoredEntry>>,
    pattern_capable: bool,
}

impl MemoryBackend {
    /// Creates a pattern-capable in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(std::collections::HashMap::new()),
            pattern_capable: true,
        }
    }

    /// Creates a backend without native pattern deletion.
    #[must_use]
    pub fn scan_only() -> Self {
        Self {
            entries: RwLock::new(std::collections::HashMap::new()),
            pattern_capable: false,
        }
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns `true` if no entries are stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<(), CacheError> {
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            StoredEntry {
                value,
                expires_at: OffsetDateTime::now_utc() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn live_keys(&self) -> Result<Vec<String>, CacheError> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect())
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<u64, CacheError> {
        if !self.pattern_capable {
            return Err(CacheError::pattern_unsupported(self.backend_name()));
        }
        let prefix = pattern.strip_suffix('*').unwrap_or(pattern);
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        Ok((before - entries.len()) as u64)
    }

    fn supports_pattern_delete(&self) -> bool {
        self.pattern_capable
    }

    fn backend_name(&self) -> &'static str {
        if self.pattern_capable {
            "memory"
        } else {
            "memory-scan-only"
        }
    }
}

// =============================================================================
// Invalidation Strategy
// =============================================================================

/// How the store clears pattern matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InvalidationStrategy {
    /// Delegate each pattern to the backend's native glob deletion.
    PatternDelete,
    /// Enumerate live keys and prefix-match each pattern.
    FullScan,
}

/// Reduces an invalidation pattern to the prefix used by the full-scan
/// strategy.
///
/// The trailing `*` is stripped. A literal `:write:` marker truncates the
/// pattern at the marker, which lets an invalidation expressed against the
/// write key-namespace match read-path keys under `{ns}:{entity}:list:...`.
fn scan_prefix(pattern: &str) -> &str {
    let prefix = pattern.strip_suffix('*').unwrap_or(pattern);
    match prefix.find(":write:") {
        Some(idx) => &prefix[..=idx],
        None => prefix,
    }
}

// =============================================================================
// Cache Store
// =============================================================================

/// The cache store fronting an abstract backend.
///
/// Injected into the middleware and the invalidation hook as a value; tests
/// substitute an in-memory backend. There is no process-wide singleton.
/// Clones share the backend.
#[derive(Clone)]
pub struct CacheStore {
    backend: Arc<dyn CacheBackend>,
    strategy: InvalidationStrategy,
    default_ttl: Duration,
}

impl CacheStore {
    /// Creates a store over the backend, probing the pattern-delete
    /// capability once.
    #[must_use]
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        let strategy = if backend.supports_pattern_delete() {
            InvalidationStrategy::PatternDelete
        } else {
            InvalidationStrategy::FullScan
        };
        tracing::debug!(
            backend = backend.backend_name(),
            strategy = ?strategy,
            "cache store initialized"
        );
        Self {
            backend,
            strategy,
            default_ttl: DEFAULT_TTL,
        }
    }

    /// Overrides the default TTL applied when `set` is called without one.
    #[must_use]
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Fetches a live entry.
    ///
    /// # Errors
    ///
    /// Propagates backend failures; a backend that cannot read is a fatal
    /// dependency failure, not a miss.
    pub async fn get(&self, key: &str) -> Result<Option<Value>, CacheError> {
        self.backend.get(key).await
    }

    /// Stores an entry, applying the default TTL when none is given.
    ///
    /// # Errors
    ///
    /// Propagates backend failures.
    pub async fn set(
        &self,
        key: &str,
        value: Value,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        self.backend
            .set(key, value, ttl.unwrap_or(self.default_ttl))
            .await
    }

    /// Clears all entries matching the given patterns, returning the number
    /// removed.
    ///
    /// Patterns are processed independently; clearing is not atomic as a
    /// batch.
    ///
    /// # Errors
    ///
    /// Propagates backend failures. Entries cleared before a failing pattern
    /// stay cleared.
    pub async fn invalidate(&self, patterns: &[String]) -> Result<u64, CacheError> {
        let mut removed = 0;
        for pattern in patterns {
            removed += self.invalidate_pattern(pattern).await?;
        }
        Ok(removed)
    }

    async fn invalidate_pattern(&self, pattern: &str) -> Result<u64, CacheError> {
        let removed = match self.strategy {
            InvalidationStrategy::PatternDelete => self.backend.delete_pattern(pattern).await?,
            InvalidationStrategy::FullScan => {
                let prefix = scan_prefix(pattern);
                let mut removed = 0;
                for key in self.backend.live_keys().await? {
                    if key.starts_with(prefix) {
                        self.backend.delete(&key).await?;
                        removed += 1;
                    }
                }
                removed
            }
        };
        tracing::debug!(pattern, removed, "cache invalidation");
        Ok(removed)
    }

    /// The default TTL for entries stored without an explicit one.
    #[must_use]
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// The underlying backend's name, for logging.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }
}
