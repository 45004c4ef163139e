//! Principals, membership snapshots, and role resolution.
//!
//! Roles are derived, never stored: the session source hands the
//! authorization layer a point-in-time snapshot of a user's group and flag
//! memberships, and [`resolve_role`] computes the effective role from it.
//! The resolver is a pure function with no I/O, so a single logical
//! authorization decision can resolve once and reuse the result for both the
//! collection-level and object-level checks of the same request.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Group name conferring the admin role.
pub const ADMIN_GROUP: &str = "admin";
/// Group name conferring the instructor role.
pub const INSTRUCTOR_GROUP: &str = "instructor";
/// Group name conferring the student role.
pub const STUDENT_GROUP: &str = "student";

// =============================================================================
// Role
// =============================================================================

/// A principal's effective role.
///
/// Ordering is precedence: `Admin > Instructor > Student`. A principal with
/// overlapping group memberships gets exactly one role, chosen by precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Instructor,
    Admin,
}

impl Role {
    /// The canonical role name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Instructor => "instructor",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Membership Snapshot
// =============================================================================

/// A point-in-time snapshot of a principal's group and flag memberships.
///
/// Supplied by the session source per request; the resolver never fetches
/// membership data itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipSnapshot {
    /// Superuser flag; implies the admin role regardless of groups.
    #[serde(default)]
    pub is_superuser: bool,
    /// Group names the principal belongs to.
    #[serde(default)]
    pub groups: BTreeSet<String>,
}

impl MembershipSnapshot {
    /// Creates an empty snapshot (no groups, no flags).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a superuser snapshot.
    #[must_use]
    pub fn superuser() -> Self {
        Self {
            is_superuser: true,
            groups: BTreeSet::new(),
        }
    }

    /// Adds a group membership.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.insert(group.into());
        self
    }

    /// Returns `true` if the principal belongs to the named group.
    #[must_use]
    pub fn has_group(&self, group: &str) -> bool {
        self.groups.contains(group)
    }
}

// =============================================================================
// Principal
// =============================================================================

/// An authenticated caller.
///
/// Anonymous requests are represented as `Option::<&Principal>::None`
/// throughout the authorization layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Unique user ID.
    pub id: String,
    /// Membership snapshot taken when the request was authenticated.
    pub memberships: MembershipSnapshot,
}

impl Principal {
    /// Creates a new `Principal`.
    #[must_use]
    pub fn new(id: impl Into<String>, memberships: MembershipSnapshot) -> Self {
        Self {
            id: id.into(),
            memberships,
        }
    }

    /// Convenience constructor for a student principal.
    #[must_use]
    pub fn student(id: impl Into<String>) -> Self {
        Self::new(id, MembershipSnapshot::new().with_group(STUDENT_GROUP))
    }

    /// Convenience constructor for an instructor principal.
    #[must_use]
    pub fn instructor(id: impl Into<String>) -> Self {
        Self::new(id, MembershipSnapshot::new().with_group(INSTRUCTOR_GROUP))
    }

    /// Convenience constructor for an admin principal.
    #[must_use]
    pub fn admin(id: impl Into<String>) -> Self {
        Self::new(id, MembershipSnapshot::new().with_group(ADMIN_GROUP))
    }
}

// =============================================================================
// Role Resolution
// =============================================================================

/// Derives the effective role from a principal's membership snapshot.
///
/// Precedence: superuser flag or admin group wins over instructor, which
/// wins over student. An absent principal or a principal with no matching
/// membership resolves to `None`.
#[must_use]
pub fn resolve_role(principal: Option<&Principal>) -> Option<Role> {
    let principal = principal?;
    let memberships = &principal.memberships;

    if memberships.is_superuser || memberships.has_group(ADMIN_GROUP) {
        Some(Role::Admin)
    } else if memberships.has_group(INSTRUCTOR_GROUP) {
        Some(Role::Instructor)
    } else if memberships.has_group(STUDENT_GROUP) {
        Some(Role::Student)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_resolves_to_none() {
        assert_eq!(resolve_role(None), None);
    }

    #[test]
    fn test_no_matching_group_resolves_to_none() {
        let principal = Principal::new("u-1", MembershipSnapshot::new().with_group("librarian"));
        assert_eq!(resolve_role(Some(&principal)), None);
    }

    #[test]
    fn test_single_group_roles() {
        assert_eq!(
            resolve_role(Some(&Principal::student("s-1"))),
            Some(Role::Student)
        );
        assert_eq!(
            resolve_role(Some(&Principal::instructor("i-1"))),
            Some(Role::Instructor)
        );
        assert_eq!(
            resolve_role(Some(&Principal::admin("a-1"))),
            Some(Role::Admin)
        );
    }

    #[test]
    fn test_superuser_flag_wins() {
        let principal = Principal::new(
            "u-1",
            MembershipSnapshot {
                is_superuser: true,
                groups: [STUDENT_GROUP.to_string()].into(),
            },
        );
        assert_eq!(resolve_role(Some(&principal)), Some(Role::Admin));
    }

    #[test]
    fn test_admin_and_student_resolves_to_admin() {
        let principal = Principal::new(
            "u-1",
            MembershipSnapshot::new()
                .with_group(ADMIN_GROUP)
                .with_group(STUDENT_GROUP),
        );
        assert_eq!(resolve_role(Some(&principal)), Some(Role::Admin));
    }

    #[test]
    fn test_instructor_and_student_resolves_to_instructor() {
        let principal = Principal::new(
            "u-1",
            MembershipSnapshot::new()
                .with_group(INSTRUCTOR_GROUP)
                .with_group(STUDENT_GROUP),
        );
        assert_eq!(resolve_role(Some(&principal)), Some(Role::Instructor));
    }

    #[test]
    fn test_role_precedence_ordering() {
        assert!(Role::Admin > Role::Instructor);
        assert!(Role::Instructor > Role::Student);
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::Student.to_string(), "student");
        assert_eq!(Role::Instructor.to_string(), "instructor");
        assert_eq!(Role::Admin.to_string(), "admin");
    }
}
