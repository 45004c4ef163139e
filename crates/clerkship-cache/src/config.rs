//! Cache configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::store::DEFAULT_TTL;

/// Cache layer configuration.
///
/// # Example (TOML)
///
/// ```toml
/// [cache]
/// enabled = true
/// namespace = "clerkship"
/// default_ttl = "5m"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable/disable the query cache entirely. When disabled, every list
    /// request executes the underlying query.
    pub enabled: bool,

    /// The `{namespace}` segment prefixing every cache key.
    pub namespace: String,

    /// Entry time-to-live, absolute from insertion.
    #[serde(with = "humantime_serde")]
    pub default_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            namespace: "clerkship".to_string(),
            default_ttl: Duration::from_secs(300),
        }
    }
}

impl CacheConfig {
    /// The default TTL as a `time::Duration` for the store.
    #[must_use]
    pub fn ttl(&self) -> time::Duration {
        time::Duration::try_from(self.default_ttl).unwrap_or(DEFAULT_TTL)
    }
}
