//! # clerkship-core
//!
//! Core types shared across the Clerkship training-records platform.
//!
//! This crate provides:
//! - The error taxonomy with client/server classification
//! - The HTTP-equivalent [`Method`] enum used by the access-control layer
//! - [`ResourceKind`] naming the platform's data entities
//! - Typed domain records (patients, observations, requests, files)
//! - The [`RecordScope`] accessor used by cache invalidation scoping
//!
//! ## Modules
//!
//! - [`error`] - Error types and categories
//! - [`method`] - Request method abstraction
//! - [`kind`] - Resource kind enumeration
//! - [`record`] - Domain record types and scope accessors

pub mod error;
pub mod kind;
pub mod method;
pub mod record;

pub use error::{CoreError, ErrorCategory, Result};
pub use kind::ResourceKind;
pub use method::Method;
pub use record::{
    CaseFile, LabRequest, Observation, Patient, RecordScope, RequestKind, RequestStatus, ScopeAttr,
};
