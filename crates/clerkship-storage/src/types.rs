//! Storage types for the repository abstraction layer.
//!
//! This module defines all data types exchanged through the storage traits.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use time::OffsetDateTime;

use clerkship_core::ResourceKind;

/// A record as stored in the storage backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecord {
    /// The record ID.
    pub id: String,
    /// The kind of the record.
    pub kind: ResourceKind,
    /// The full record content as JSON.
    pub payload: Value,
    /// When this record was last updated.
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
    /// When the record was originally created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl StoredRecord {
    /// Creates a new `StoredRecord`.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: ResourceKind, payload: Value) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: id.into(),
            kind,
            payload,
            last_updated: now,
            created_at: now,
        }
    }
}

/// Parameters for a list query.
///
/// Filters are opaque name/value pairs interpreted by the query engine; the
/// caching layer only uses them to derive keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListParams {
    /// Filter parameters (e.g. `patient` -> patient id).
    #[serde(default)]
    pub filters: HashMap<String, String>,
    /// 1-based page number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Page size; backend default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl ListParams {
    /// Creates empty parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter.
    #[must_use]
    pub fn with_filter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(name.into(), value.into());
        self
    }

    /// Sets the page number.
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }
}

/// Result of a list query: an ordered record set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListResult {
    /// The matching records, in backend order.
    pub entries: Vec<StoredRecord>,
    /// Total count of matching records, if available.
    pub total: Option<u32>,
    /// Whether more results exist beyond this page.
    pub has_more: bool,
}

impl ListResult {
    /// Creates a new empty `ListResult`.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a new `ListResult` with entries.
    #[must_use]
    pub fn with_entries(entries: Vec<StoredRecord>) -> Self {
        Self {
            entries,
            total: None,
            has_more: false,
        }
    }

    /// Sets the total count.
    #[must_use]
    pub fn with_total(mut self, total: u32) -> Self {
        self.total = Some(total);
        self
    }

    /// Returns the number of entries in this result.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The write operation applied to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteOp {
    /// Record was created.
    Create,
    /// Record was updated.
    Update,
    /// Record was deleted.
    Delete,
}

impl std::fmt::Display for WriteOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_params_builder() {
        let params = ListParams::new()
            .with_filter("patient", "p-1")
            .with_page(2);
        assert_eq!(params.filters.get("patient").map(String::as_str), Some("p-1"));
        assert_eq!(params.page, Some(2));
    }

    #[test]
    fn test_list_result_builders() {
        let record = StoredRecord::new("r-1", ResourceKind::Patient, json!({"id": "r-1"}));
        let result = ListResult::with_entries(vec![record]).with_total(1);
        assert_eq!(result.len(), 1);
        assert!(!result.is_empty());
        assert_eq!(result.total, Some(1));
        assert!(ListResult::empty().is_empty());
    }

    #[test]
    fn test_write_op_display() {
        assert_eq!(WriteOp::Create.to_string(), "create");
        assert_eq!(WriteOp::Update.to_string(), "update");
        assert_eq!(WriteOp::Delete.to_string(), "delete");
    }
}
