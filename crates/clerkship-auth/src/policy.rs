//! The role/ownership access-policy table.
//!
//! Every endpoint gates requests through [`PolicyTable::check`]: once for the
//! collection-level check and once more per object for detail-level checks.
//! The returned [`AccessCheck`] captures the resolved role, so both checks of
//! one logical decision share a single role resolution.
//!
//! Policy answers are booleans, never errors: an unresolvable role is an
//! ordinary denial.

use std::collections::HashMap;

use clerkship_core::{Method, RecordScope};

use crate::principal::{Principal, Role, resolve_role};

// =============================================================================
// Access Surfaces
// =============================================================================

/// The policy resource kinds.
///
/// Surfaces are endpoint-shaped, not entity-shaped: student-facing request
/// handling and instructor-facing request management are distinct surfaces
/// over the same records, as are file metadata, listing, and content access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessSurface {
    /// Patient demographic records.
    Patients,
    /// Clinical observations (vitals, notes).
    Observations,
    /// Imaging/blood-test requests, student-facing.
    StudentRequests,
    /// Imaging/blood-test requests, instructor-facing management.
    RequestManagement,
    /// Case file upload/edit/delete.
    FileManagement,
    /// Case file listing. Which rows appear for a student is a query-layer
    /// concern; this surface only gates the verb.
    FileListing,
    /// Case file content (bytes/pages). Students additionally pass through
    /// the grant index for the specific file.
    FileContent,
}

impl AccessSurface {
    /// The canonical surface name, used in deny logging.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Patients => "patients",
            Self::Observations => "observations",
            Self::StudentRequests => "student_requests",
            Self::RequestManagement => "request_management",
            Self::FileManagement => "file_management",
            Self::FileListing => "file_listing",
            Self::FileContent => "file_content",
        }
    }
}

impl std::fmt::Display for AccessSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Rules
// =============================================================================

/// The methods a role may use on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodRule {
    /// No access.
    None,
    /// Safe methods only (GET/HEAD/OPTIONS).
    ReadOnly,
    /// All methods.
    Full,
    /// Exactly the listed methods.
    Only(&'static [Method]),
}

impl MethodRule {
    /// Returns `true` if the rule permits the method.
    #[must_use]
    pub fn permits(self, method: Method) -> bool {
        match self {
            Self::None => false,
            Self::ReadOnly => method.is_safe(),
            Self::Full => true,
            Self::Only(methods) => methods.contains(&method),
        }
    }
}

/// Which target objects a role's access extends to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectScope {
    /// Any object of the surface.
    Any,
    /// Only objects owned by the principal.
    OwnerOnly,
}

/// The rule row for one surface.
#[derive(Debug, Clone)]
pub struct SurfaceRules {
    /// Methods permitted to students.
    pub student: MethodRule,
    /// Methods permitted to instructors.
    pub instructor: MethodRule,
    /// Methods permitted to admins. Full unless the surface restricts it.
    pub admin: MethodRule,
    /// Object scope applied to students.
    pub student_scope: ObjectScope,
    /// Object scope applied to instructors.
    pub instructor_scope: ObjectScope,
}

impl SurfaceRules {
    /// Creates a rule row with implicit full admin access and unrestricted
    /// object scopes.
    #[must_use]
    pub fn new(student: MethodRule, instructor: MethodRule) -> Self {
        Self {
            student,
            instructor,
            admin: MethodRule::Full,
            student_scope: ObjectScope::Any,
            instructor_scope: ObjectScope::Any,
        }
    }

    /// Restricts students to objects they own.
    #[must_use]
    pub fn with_student_owner_scope(mut self) -> Self {
        self.student_scope = ObjectScope::OwnerOnly;
        self
    }

    /// The method rule for a role.
    #[must_use]
    pub fn rule_for(&self, role: Role) -> MethodRule {
        match role {
            Role::Student => self.student,
            Role::Instructor => self.instructor,
            Role::Admin => self.admin,
        }
    }

    /// The object scope for a role. Admin access is never owner-scoped.
    #[must_use]
    pub fn scope_for(&self, role: Role) -> ObjectScope {
        match role {
            Role::Student => self.student_scope,
            Role::Instructor => self.instructor_scope,
            Role::Admin => ObjectScope::Any,
        }
    }
}

// =============================================================================
// Policy Table
// =============================================================================

/// Methods granted to students on the student-facing request surface:
/// create plus read of their own requests.
const STUDENT_REQUEST_METHODS: &[Method] =
    &[Method::Post, Method::Get, Method::Head, Method::Options];

/// The per-surface access-policy table.
pub struct PolicyTable {
    rules: HashMap<AccessSurface, SurfaceRules>,
}

impl PolicyTable {
    /// The platform's standard rule table.
    #[must_use]
    pub fn standard() -> Self {
        let mut rules = HashMap::new();

        rules.insert(
            AccessSurface::Patients,
            SurfaceRules::new(MethodRule::ReadOnly, MethodRule::Full),
        );
        rules.insert(
            AccessSurface::Observations,
            SurfaceRules::new(MethodRule::Full, MethodRule::ReadOnly)
                .with_student_owner_scope(),
        );
        rules.insert(
            AccessSurface::StudentRequests,
            SurfaceRules::new(MethodRule::Only(STUDENT_REQUEST_METHODS), MethodRule::None)
                .with_student_owner_scope(),
        );
        rules.insert(
            AccessSurface::RequestManagement,
            SurfaceRules::new(MethodRule::None, MethodRule::Full),
        );
        rules.insert(
            AccessSurface::FileManagement,
            SurfaceRules::new(MethodRule::None, MethodRule::Full),
        );
        rules.insert(
            AccessSurface::FileListing,
            SurfaceRules::new(MethodRule::ReadOnly, MethodRule::Full),
        );
        rules.insert(
            AccessSurface::FileContent,
            SurfaceRules::new(MethodRule::ReadOnly, MethodRule::Full),
        );

        Self { rules }
    }

    /// Begins an authorization decision for one request.
    ///
    /// Resolves the principal's role exactly once; the returned check serves
    /// both the collection-level and the per-object calls.
    #[must_use]
    pub fn check<'a>(
        &'a self,
        principal: Option<&'a Principal>,
        surface: AccessSurface,
    ) -> AccessCheck<'a> {
        AccessCheck {
            surface,
            role: resolve_role(principal),
            principal_id: principal.map(|p| p.id.as_str()),
            rules: self.rules.get(&surface),
        }
    }

    /// One-shot collection-level check.
    #[must_use]
    pub fn allows(
        &self,
        principal: Option<&Principal>,
        method: Method,
        surface: AccessSurface,
    ) -> bool {
        self.check(principal, surface).allows(method)
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::standard()
    }
}

// =============================================================================
// Access Check
// =============================================================================

/// A single authorization decision with the role resolved once.
pub struct AccessCheck<'a> {
    surface: AccessSurface,
    role: Option<Role>,
    principal_id: Option<&'a str>,
    rules: Option<&'a SurfaceRules>,
}

impl AccessCheck<'_> {
    /// The role resolved for this decision.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// Collection-level check: may this principal use the method on the
    /// surface at all?
    #[must_use]
    pub fn allows(&self, method: Method) -> bool {
        let Some(role) = self.role else {
            tracing::debug!(surface = %self.surface, method = %method, "access denied: no resolvable role");
            return false;
        };
        // Surfaces without a declared rule row deny everything.
        let Some(rules) = self.rules else {
            tracing::debug!(surface = %self.surface, method = %method, role = %role, "access denied: no rule row");
            return false;
        };
        let allowed = rules.rule_for(role).permits(method);
        if !allowed {
            tracing::debug!(surface = %self.surface, method = %method, role = %role, "access denied");
        }
        allowed
    }

    /// Object-level check: collection-level access plus the role's object
    /// scope against the target's ownership attribute.
    ///
    /// Fails closed: an owner-scoped role is denied when the target exposes
    /// no recognizable ownership attribute.
    #[must_use]
    pub fn allows_object(&self, method: Method, target: &dyn RecordScope) -> bool {
        if !self.allows(method) {
            return false;
        }
        // allows() returned true, so role and rules are present.
        let (Some(role), Some(rules)) = (self.role, self.rules) else {
            return false;
        };
        match rules.scope_for(role) {
            ObjectScope::Any => true,
            ObjectScope::OwnerOnly => match (target.owner_id(), self.principal_id) {
                (Some(owner), Some(principal)) if owner == principal => true,
                _ => {
                    tracing::debug!(
                        surface = %self.surface,
                        method = %method,
                        role = %role,
                        "object access denied: not the owner"
                    );
                    false
                }
            },
        }
    }
}
