//! The cached list-query middleware.
//!
//! [`QueryCache::fetch_list`] wraps a list-style read of the query engine:
//! it derives a key from the request's parameters and the caller's identity,
//! serves hits from the store, and on a miss executes the underlying query
//! and stores the successful result. Writes and other non-read verbs pass
//! through untouched.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use clerkship_auth::Principal;
use clerkship_core::{Method, ResourceKind};
use clerkship_storage::StorageError;

use crate::config::CacheConfig;
use crate::error::CacheError;
use crate::key::{LIST_OPERATION, ParamBag, encode_key};
use crate::registry::{KindCachePolicy, cache_policy};
use crate::stats::{CacheStats, CacheStatsSnapshot};
use crate::store::CacheStore;

/// Presentation-only query parameters never admitted into the bag.
const PARAM_DENY_LIST: &[&str] = &["format", "callback"];

/// The page parameter, handled specially: it always joins the bag with a
/// default of "1" rather than flowing through as an ordinary query param.
const PAGE_PARAM: &str = "page";

/// The bag parameter carrying the caller's identity on user-sensitive kinds.
const USER_PARAM: &str = "user_id";

// =============================================================================
// List Request
// =============================================================================

/// A list-style read as seen by the cache layer.
///
/// Handlers translate their framework's request into this shape at the
/// boundary: recognized query parameters, route path parameters (e.g. a
/// parent patient id), and the pagination page number.
#[derive(Debug, Clone)]
pub struct ListRequest {
    /// The kind being listed.
    pub kind: ResourceKind,
    /// The request method. Only GET-equivalents are cached.
    pub method: Method,
    /// Query parameters.
    pub query: HashMap<String, String>,
    /// Route path parameters.
    pub path_params: HashMap<String, String>,
    /// 1-based page number; absent means page 1.
    pub page: Option<u32>,
}

impl ListRequest {
    /// Creates a GET list request for a kind.
    #[must_use]
    pub fn get(kind: ResourceKind) -> Self {
        Self {
            kind,
            method: Method::Get,
            query: HashMap::new(),
            path_params: HashMap::new(),
            page: None,
        }
    }

    /// Sets the method.
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn with_query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Adds a route path parameter.
    #[must_use]
    pub fn with_path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    /// Sets the page number.
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }
}

/// A list payload with its cache provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedList {
    /// The serialized list response.
    pub payload: Value,
    /// Whether the payload came from the cache.
    pub from_cache: bool,
}

// =============================================================================
// Query Cache
// =============================================================================

/// The cached list-query wrapper.
pub struct QueryCache {
    store: CacheStore,
    namespace: String,
    enabled: bool,
    stats: Arc<CacheStats>,
}

impl QueryCache {
    /// Creates a query cache with the default configuration.
    #[must_use]
    pub fn new(store: CacheStore) -> Self {
        Self::with_config(store, &CacheConfig::default())
    }

    /// Creates a query cache from configuration. The configured TTL becomes
    /// the store's default.
    #[must_use]
    pub fn with_config(store: CacheStore, config: &CacheConfig) -> Self {
        Self {
            store: store.with_default_ttl(config.ttl()),
            namespace: config.namespace.clone(),
            enabled: config.enabled,
            stats: Arc::new(CacheStats::new()),
        }
    }

    /// A snapshot of the hit/miss counters.
    #[must_use]
    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }

    /// A handle to the live counters, shareable with the invalidation hook.
    #[must_use]
    pub fn stats_handle(&self) -> Arc<CacheStats> {
        Arc::clone(&self.stats)
    }

    /// The configured key namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Serves a list request through the cache.
    ///
    /// Non-GET-equivalent methods, a disabled cache, and anonymous callers
    /// on user-sensitive kinds bypass the cache and execute the query
    /// directly. On a miss, only a successful query result is stored.
    ///
    /// # Errors
    ///
    /// Propagates backend failures as `CacheError::Backend` and underlying
    /// query failures as `CacheError::Query`. A failed query stores nothing.
    pub async fn fetch_list<F, Fut>(
        &self,
        request: &ListRequest,
        principal: Option<&Principal>,
        query: F,
    ) -> Result<CachedList, CacheError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, StorageError>>,
    {
        if !self.enabled || !request.method.is_cached_read() {
            self.stats.record_bypass();
            let payload = query().await?;
            return Ok(CachedList {
                payload,
                from_cache: false,
            });
        }

        let policy = cache_policy(request.kind);

        // Never cache an unattributed result for a user-scoped surface.
        if policy.user_sensitive && principal.is_none() {
            tracing::debug!(
                entity = policy.entity,
                "cache bypass: anonymous caller on user-sensitive kind"
            );
            self.stats.record_bypass();
            let payload = query().await?;
            return Ok(CachedList {
                payload,
                from_cache: false,
            });
        }

        let bag = build_param_bag(request, policy, principal);
        let key = encode_key(&self.namespace, policy.entity, LIST_OPERATION, &bag);

        if let Some(payload) = self.store.get(&key).await? {
            self.stats.record_hit();
            tracing::debug!(key = %key, entity = policy.entity, "cache hit");
            return Ok(CachedList {
                payload,
                from_cache: true,
            });
        }

        self.stats.record_miss();
        tracing::debug!(key = %key, entity = policy.entity, "cache miss");

        let payload = query().await?;
        self.store.set(&key, payload.clone(), None).await?;
        Ok(CachedList {
            payload,
            from_cache: false,
        })
    }
}

/// Builds the parameter bag for a request.
///
/// An allow-list configured for the kind admits exactly those query
/// parameters; otherwise all query parameters join except the deny-list and
/// `page`. Route path parameters always join, the page number joins with a
/// default of "1", and the caller's id joins iff the kind is user-sensitive.
fn build_param_bag(
    request: &ListRequest,
    policy: &KindCachePolicy,
    principal: Option<&Principal>,
) -> ParamBag {
    let mut bag = ParamBag::new();

    match policy.allowed_params {
        Some(allowed) => {
            for name in allowed {
                if let Some(value) = request.query.get(*name) {
                    bag.insert((*name).to_string(), value.clone());
                }
            }
        }
        None => {
            for (name, value) in &request.query {
                if name == PAGE_PARAM || PARAM_DENY_LIST.contains(&name.as_str()) {
                    continue;
                }
                bag.insert(name.clone(), value.clone());
            }
        }
    }

    for (name, value) in &request.path_params {
        bag.insert(name.clone(), value.clone());
    }

    bag.insert(PAGE_PARAM.to_string(), request.page.unwrap_or(1).to_string());

    if policy.user_sensitive {
        if let Some(principal) = principal {
            bag.insert(USER_PARAM.to_string(), principal.id.clone());
        }
    }

    bag
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBackend;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cache() -> QueryCache {
        QueryCache::new(CacheStore::new(Arc::new(MemoryBackend::new())))
    }

    fn counted_query(
        counter: &Arc<AtomicUsize>,
        payload: Value,
    ) -> impl Future<Output = Result<Value, StorageError>> {
        let counter = Arc::clone(counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(payload)
        }
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let cache = cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let request = ListRequest::get(ResourceKind::Patient).with_page(1);
        let payload = json!({"entries": [{"id": "p-1"}]});

        let first = cache
            .fetch_list(&request, None, || counted_query(&calls, payload.clone()))
            .await
            .unwrap();
        assert!(!first.from_cache);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let second = cache
            .fetch_list(&request, None, || counted_query(&calls, payload.clone()))
            .await
            .unwrap();
        assert!(second.from_cache);
        assert_eq!(second.payload, payload);
        // The underlying query never ran again.
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[tokio::test]
    async fn test_non_get_passes_through_uncached() {
        let cache = cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let request = ListRequest::get(ResourceKind::Patient).with_method(Method::Post);

        for _ in 0..2 {
            let result = cache
                .fetch_list(&request, None, || counted_query(&calls, json!([])))
                .await
                .unwrap();
            assert!(!result.from_cache);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.stats().bypasses, 2);
    }

    #[tokio::test]
    async fn test_disabled_cache_bypasses() {
        let config = CacheConfig {
            enabled: false,
            ..CacheConfig::default()
        };
        let cache = QueryCache::with_config(CacheStore::new(Arc::new(MemoryBackend::new())), &config);
        let calls = Arc::new(AtomicUsize::new(0));
        let request = ListRequest::get(ResourceKind::Patient);

        for _ in 0..2 {
            cache
                .fetch_list(&request, None, || counted_query(&calls, json!([])))
                .await
                .unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_user_sensitive_kinds_isolate_principals() {
        let cache = cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let student_a = Principal::student("student-a");
        let student_b = Principal::student("student-b");
        let request = ListRequest::get(ResourceKind::Observation)
            .with_path_param("patient", "p-1")
            .with_page(1);

        let a_payload = json!({"entries": [{"id": "obs-a"}]});
        let b_payload = json!({"entries": [{"id": "obs-b"}]});

        let first = cache
            .fetch_list(&request, Some(&student_a), || {
                counted_query(&calls, a_payload.clone())
            })
            .await
            .unwrap();
        assert!(!first.from_cache);

        // Same parameters, different principal: a distinct key, so the query
        // runs and student B never sees student A's rows.
        let second = cache
            .fetch_list(&request, Some(&student_b), || {
                counted_query(&calls, b_payload.clone())
            })
            .await
            .unwrap();
        assert!(!second.from_cache);
        assert_eq!(second.payload, b_payload);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // Each principal now hits their own entry.
        let a_again = cache
            .fetch_list(&request, Some(&student_a), || {
                counted_query(&calls, json!(null))
            })
            .await
            .unwrap();
        assert!(a_again.from_cache);
        assert_eq!(a_again.payload, a_payload);
    }

    #[tokio::test]
    async fn test_shared_kind_is_shared_across_principals() {
        let cache = cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let student = Principal::student("student-a");
        let instructor = Principal::instructor("instructor-1");
        let request = ListRequest::get(ResourceKind::Patient).with_page(1);
        let payload = json!({"entries": [{"id": "p-1"}]});

        cache
            .fetch_list(&request, Some(&student), || {
                counted_query(&calls, payload.clone())
            })
            .await
            .unwrap();
        let second = cache
            .fetch_list(&request, Some(&instructor), || {
                counted_query(&calls, payload.clone())
            })
            .await
            .unwrap();
        // The patient directory is not user-sensitive: one shared entry.
        assert!(second.from_cache);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_anonymous_on_user_sensitive_kind_bypasses() {
        let cache = cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let request = ListRequest::get(ResourceKind::Observation);

        for _ in 0..2 {
            let result = cache
                .fetch_list(&request, None, || counted_query(&calls, json!([])))
                .await
                .unwrap();
            assert!(!result.from_cache);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.stats().bypasses, 2);
    }

    #[tokio::test]
    async fn test_deny_listed_params_do_not_affect_the_key() {
        let cache = cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let student = Principal::student("s-1");
        let plain = ListRequest::get(ResourceKind::Observation).with_page(1);
        let decorated = ListRequest::get(ResourceKind::Observation)
            .with_page(1)
            .with_query_param("format", "json")
            .with_query_param("callback", "cb");

        cache
            .fetch_list(&plain, Some(&student), || counted_query(&calls, json!([1])))
            .await
            .unwrap();
        let second = cache
            .fetch_list(&decorated, Some(&student), || {
                counted_query(&calls, json!([2]))
            })
            .await
            .unwrap();
        assert!(second.from_cache);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_allow_list_filters_unrecognized_params() {
        let cache = cache();
        let calls = Arc::new(AtomicUsize::new(0));
        // Patient admits only "search" and "ordering".
        let plain = ListRequest::get(ResourceKind::Patient).with_query_param("search", "ada");
        let noisy = ListRequest::get(ResourceKind::Patient)
            .with_query_param("search", "ada")
            .with_query_param("verbose", "yes");

        cache
            .fetch_list(&plain, None, || counted_query(&calls, json!([1])))
            .await
            .unwrap();
        let second = cache
            .fetch_list(&noisy, None, || counted_query(&calls, json!([2])))
            .await
            .unwrap();
        assert!(second.from_cache);

        // A recognized parameter still discriminates.
        let searched = ListRequest::get(ResourceKind::Patient).with_query_param("search", "grace");
        let third = cache
            .fetch_list(&searched, None, || counted_query(&calls, json!([3])))
            .await
            .unwrap();
        assert!(!third.from_cache);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_absent_page_defaults_to_one() {
        let cache = cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let implicit = ListRequest::get(ResourceKind::Patient);
        let explicit = ListRequest::get(ResourceKind::Patient).with_page(1);

        cache
            .fetch_list(&implicit, None, || counted_query(&calls, json!([1])))
            .await
            .unwrap();
        let second = cache
            .fetch_list(&explicit, None, || counted_query(&calls, json!([2])))
            .await
            .unwrap();
        assert!(second.from_cache);

        let page_two = ListRequest::get(ResourceKind::Patient).with_page(2);
        let third = cache
            .fetch_list(&page_two, None, || counted_query(&calls, json!([3])))
            .await
            .unwrap();
        assert!(!third.from_cache);
    }

    #[tokio::test]
    async fn test_failed_query_is_not_stored() {
        let cache = cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let request = ListRequest::get(ResourceKind::Patient);

        let failing = {
            let calls = Arc::clone(&calls);
            move || {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(StorageError::backend("db down"))
                }
            }
        };
        let err = cache.fetch_list(&request, None, failing).await.unwrap_err();
        assert!(matches!(err, CacheError::Query(_)));

        // Nothing was cached: the next call executes the query again.
        let result = cache
            .fetch_list(&request, None, || counted_query(&calls, json!([])))
            .await
            .unwrap();
        assert!(!result.from_cache);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_param_bag_shape() {
        let student = Principal::student("s-1");
        let request = ListRequest::get(ResourceKind::Observation)
            .with_query_param("sort", "date")
            .with_query_param("format", "json")
            .with_path_param("patient", "p-1")
            .with_page(3);
        let bag = build_param_bag(&request, cache_policy(ResourceKind::Observation), Some(&student));

        assert_eq!(bag.get("sort").map(String::as_str), Some("date"));
        assert_eq!(bag.get("patient").map(String::as_str), Some("p-1"));
        assert_eq!(bag.get("page").map(String::as_str), Some("3"));
        assert_eq!(bag.get("user_id").map(String::as_str), Some("s-1"));
        assert!(!bag.contains_key("format"));
    }
}
