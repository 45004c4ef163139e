//! # clerkship-auth
//!
//! Authorization module for the Clerkship training-records platform.
//!
//! This crate provides:
//! - Role resolution from group/flag membership snapshots
//! - The role/ownership access-policy table gating every endpoint
//! - Page-range parsing and page-level authorization for case files
//! - AccessGrant integrity validation and the file-grant index
//!
//! ## Modules
//!
//! - [`principal`] - Principals, membership snapshots, and role resolution
//! - [`policy`] - The per-surface access-policy table
//! - [`pages`] - Page-range specifications
//! - [`grants`] - File-access grants and origin validation
//! - [`storage`] - Storage traits for grant lookup
//! - [`grant_index`] - Grant precedence and page authorization

pub mod error;
pub mod grant_index;
pub mod grants;
pub mod pages;
pub mod policy;
pub mod principal;
pub mod storage;

pub use error::AuthError;
pub use grant_index::{FileAccess, FileGrantIndex};
pub use grants::{FileGrant, GrantOrigin};
pub use pages::PageRangeSpec;
pub use policy::{AccessCheck, AccessSurface, MethodRule, ObjectScope, PolicyTable, SurfaceRules};
pub use principal::{
    ADMIN_GROUP, INSTRUCTOR_GROUP, MembershipSnapshot, Principal, Role, STUDENT_GROUP,
    resolve_role,
};
pub use storage::GrantStorage;

/// Type alias for authorization results.
pub type AuthResult<T> = Result<T, AuthError>;
