//! # clerkship-cache
//!
//! Query-result caching for the Clerkship training-records platform.
//!
//! Every cache key encodes exactly the access-control dimensions that affect
//! the result set: request parameters, page, route scope, and (for
//! user-sensitive resources) the caller's identity. A key that under-encodes
//! those dimensions turns the cache into a data-leak vector between users,
//! so key derivation is the correctness core of this crate.
//!
//! This crate provides:
//! - Deterministic cache-key encoding from sorted parameter bags
//! - A cache store with dual invalidation strategies (native pattern delete
//!   or full-scan fallback), selected by a one-time capability probe
//! - The cached-list middleware wrapping the query engine
//! - The write-invalidation hook clearing affected list views after writes
//! - A static per-kind registry of cache scoping declarations
//!
//! ## Modules
//!
//! - [`config`] - Cache configuration
//! - [`error`] - Cache error types
//! - [`key`] - Key and invalidation-pattern encoding
//! - [`store`] - Backend trait, in-memory backend, and the store
//! - [`registry`] - Per-kind cache policy declarations
//! - [`middleware`] - The cached list-query wrapper
//! - [`invalidate`] - The write-invalidation hook
//! - [`stats`] - Hit/miss statistics

pub mod config;
pub mod error;
pub mod invalidate;
pub mod key;
pub mod middleware;
pub mod registry;
pub mod stats;
pub mod store;

pub use config::CacheConfig;
pub use error::CacheError;
pub use invalidate::WriteInvalidationHook;
pub use key::{ParamBag, encode_invalidation_patterns, encode_key};
pub use middleware::{CachedList, ListRequest, QueryCache};
pub use registry::{KindCachePolicy, cache_policy};
pub use stats::{CacheStats, CacheStatsSnapshot};
pub use store::{CacheBackend, CacheStore, DEFAULT_TTL, MemoryBackend};

/// Type alias for cache results.
pub type CacheResult<T> = Result<T, CacheError>;
