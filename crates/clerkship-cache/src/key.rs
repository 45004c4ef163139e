//! Cache-key and invalidation-pattern encoding.
//!
//! Keys take the form `{namespace}:{entity}:{operation}` with an optional
//! digest suffix derived from the request's parameter bag. The bag is a
//! `BTreeMap`, so pairs serialize in key order regardless of insertion
//! order: two bags with identical pairs always produce byte-identical
//! serializations, and therefore identical digests. That determinism is the
//! single most important correctness property of the cache layer.
//!
//! Invalidation patterns are deliberately coarser than keys: a digest cannot
//! be targeted individually, so a write clears every list cache of its
//! entity. Over-clearing costs hit rate; under-clearing serves stale data.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

/// The list operation segment used by cached list queries.
pub const LIST_OPERATION: &str = "list";

/// Length of the hex digest suffix on parameterized keys.
const DIGEST_LEN: usize = 16;

/// An order-irrelevant parameter bag. `BTreeMap` keeps pairs sorted by key.
pub type ParamBag = BTreeMap<String, String>;

/// Encodes a cache key for an operation on an entity.
///
/// An empty bag yields the bare `{namespace}:{entity}:{operation}` key with
/// no digest. Otherwise the sorted pairs are serialized and hashed to a
/// fixed-length hex digest suffix.
#[must_use]
pub fn encode_key(namespace: &str, entity: &str, operation: &str, params: &ParamBag) -> String {
    if params.is_empty() {
        return format!("{namespace}:{entity}:{operation}");
    }
    // BTreeMap serializes in key order; the JSON form is unambiguous even
    // when values contain separator characters.
    let serialized = serde_json::to_string(params).unwrap_or_default();
    let digest = hex::encode(Sha256::digest(serialized.as_bytes()));
    format!(
        "{namespace}:{entity}:{operation}:{}",
        &digest[..DIGEST_LEN]
    )
}

/// Encodes the invalidation patterns for a write scoped by the given
/// parameters.
///
/// Always includes the unscoped `{namespace}:{entity}:list:*` pattern, plus
/// one `{namespace}:{entity}:list:{param}_{value}:*` per scoping pair.
#[must_use]
pub fn encode_invalidation_patterns(
    namespace: &str,
    entity: &str,
    scoping_params: &[(String, String)],
) -> Vec<String> {
    let mut patterns = Vec::with_capacity(1 + scoping_params.len());
    patterns.push(format!("{namespace}:{entity}:{LIST_OPERATION}:*"));
    for (param, value) in scoping_params {
        patterns.push(format!(
            "{namespace}:{entity}:{LIST_OPERATION}:{param}_{value}:*"
        ));
    }
    patterns
}
