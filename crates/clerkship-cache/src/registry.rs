//! Per-kind cache policy declarations.
//!
//! The registry is a static table: each resource kind declares its cache
//! entity name, whether cached lists are user-sensitive, an optional query
//! parameter allow-list, and the scoping attributes that drive write
//! invalidation. The table replaces runtime attribute reflection with an
//! explicit declaration resolved through the typed [`RecordScope`] accessor.
//!
//! [`RecordScope`]: clerkship_core::RecordScope

use clerkship_core::{ResourceKind, ScopeAttr};

/// Cache declarations for one resource kind.
#[derive(Debug, Clone)]
pub struct KindCachePolicy {
    /// The `{entity}` segment of this kind's cache keys.
    pub entity: &'static str,
    /// Whether different principals must never share cached results for
    /// identical parameters. When set, the caller's user id joins the
    /// parameter bag.
    pub user_sensitive: bool,
    /// Query parameters admitted into the bag. `None` admits everything
    /// except the deny-list.
    pub allowed_params: Option<&'static [&'static str]>,
    /// Record attributes whose values scope write invalidation. Empty means
    /// writes to this kind rely on TTL expiry alone.
    pub scope_attrs: &'static [ScopeAttr],
}

/// Patient directory: shared reference data, searchable, TTL-expired only.
static PATIENT: KindCachePolicy = KindCachePolicy {
    entity: "patient",
    user_sensitive: false,
    allowed_params: Some(&["search", "ordering"]),
    scope_attrs: &[],
};

static OBSERVATION: KindCachePolicy = KindCachePolicy {
    entity: "observation",
    user_sensitive: true,
    allowed_params: None,
    scope_attrs: &[ScopeAttr::Patient, ScopeAttr::Owner],
};

static LAB_REQUEST: KindCachePolicy = KindCachePolicy {
    entity: "lab_request",
    user_sensitive: true,
    allowed_params: None,
    scope_attrs: &[ScopeAttr::Patient, ScopeAttr::Owner],
};

/// File listings are row-filtered per student at the query layer, so cached
/// lists are user-sensitive even though file metadata itself is not personal.
static CASE_FILE: KindCachePolicy = KindCachePolicy {
    entity: "case_file",
    user_sensitive: true,
    allowed_params: None,
    scope_attrs: &[ScopeAttr::Patient],
};

/// The cache policy for a resource kind.
#[must_use]
pub fn cache_policy(kind: ResourceKind) -> &'static KindCachePolicy {
    match kind {
        ResourceKind::Patient => &PATIENT,
        ResourceKind::Observation => &OBSERVATION,
        ResourceKind::LabRequest => &LAB_REQUEST,
        ResourceKind::CaseFile => &CASE_FILE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entities_match_kind_names() {
        for kind in ResourceKind::ALL {
            assert_eq!(cache_policy(*kind).entity, kind.entity());
        }
    }

    #[test]
    fn test_personal_kinds_are_user_sensitive() {
        assert!(cache_policy(ResourceKind::Observation).user_sensitive);
        assert!(cache_policy(ResourceKind::LabRequest).user_sensitive);
        assert!(cache_policy(ResourceKind::CaseFile).user_sensitive);
        assert!(!cache_policy(ResourceKind::Patient).user_sensitive);
    }

    #[test]
    fn test_patient_has_no_scope_attrs() {
        assert!(cache_policy(ResourceKind::Patient).scope_attrs.is_empty());
    }

    #[test]
    fn test_observation_scopes_by_patient_and_owner() {
        let attrs = cache_policy(ResourceKind::Observation).scope_attrs;
        assert!(attrs.contains(&ScopeAttr::Patient));
        assert!(attrs.contains(&ScopeAttr::Owner));
    }
}
