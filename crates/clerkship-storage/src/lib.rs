//! # clerkship-storage
//!
//! Storage abstraction layer for the Clerkship platform.
//!
//! The caching and access-control core never executes queries itself: it
//! talks to an abstract repository that returns ordered record sets and
//! write results. This crate defines that boundary: the [`RecordStore`]
//! trait plus the parameter and result types it exchanges.

pub mod error;
pub mod traits;
pub mod types;

pub use error::StorageError;
pub use traits::RecordStore;
pub use types::{ListParams, ListResult, StoredRecord, WriteOp};
