//! Domain record types and cache-scoping accessors.
//!
//! Records are deliberately light: the platform treats clinical payloads as
//! opaque JSON and only models the fields that participate in access control
//! (ownership) and cache invalidation (scoping attributes).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::kind::ResourceKind;

// =============================================================================
// Scope Attributes
// =============================================================================

/// A named record attribute that participates in cache scoping.
///
/// Writes to a record invalidate the cached list-views keyed by these
/// attributes. The set of attributes per kind is declared statically in the
/// cache registry; this enum is the typed accessor that replaces pulling
/// arbitrary field names off records at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeAttr {
    /// The parent patient of the record.
    Patient,
    /// The user who owns the record.
    Owner,
}

impl ScopeAttr {
    /// The parameter name this attribute contributes to invalidation
    /// patterns (`{ns}:{entity}:list:{key}_{value}:*`).
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Owner => "user",
        }
    }
}

/// Typed access to the attributes of a written record that the cache layer
/// scopes by.
///
/// Implemented by every domain record. `scope_value` returns `None` when the
/// record has no value for the attribute, which the invalidation hook treats
/// as "not extractable" and skips.
pub trait RecordScope {
    /// The kind of this record.
    fn kind(&self) -> ResourceKind;

    /// The value of a scoping attribute, if the record carries one.
    fn scope_value(&self, attr: ScopeAttr) -> Option<String>;

    /// The id of the user who owns this record, if ownership applies.
    ///
    /// Object-level access checks fail closed when this returns `None`.
    fn owner_id(&self) -> Option<&str> {
        None
    }
}

// =============================================================================
// Patient
// =============================================================================

/// A patient demographic record.
///
/// Patient directory data is shared reference data: it declares no scoping
/// attributes, so cached patient lists expire by TTL alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    /// The record ID.
    pub id: String,
    /// The patient's full name.
    pub full_name: String,
    /// Hospital medical record number, if assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_record_number: Option<String>,
    /// When the record was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Patient {
    /// Creates a new `Patient`.
    #[must_use]
    pub fn new(id: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
            medical_record_number: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

impl RecordScope for Patient {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Patient
    }

    fn scope_value(&self, _attr: ScopeAttr) -> Option<String> {
        None
    }
}

// =============================================================================
// Observation
// =============================================================================

/// A clinical observation recorded by a student against a patient.
///
/// The measurement itself (blood pressure, temperature, free-text note) is an
/// opaque JSON body; only the linkage fields are typed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    /// The record ID.
    pub id: String,
    /// The patient this observation belongs to.
    pub patient_id: String,
    /// The user who recorded the observation. Object-level access for
    /// students is restricted to their own observations.
    pub recorded_by: String,
    /// Observation type, e.g. "blood-pressure" or "note".
    pub observation_type: String,
    /// The measurement payload.
    pub body: Value,
    /// When the observation was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub recorded_at: OffsetDateTime,
}

impl Observation {
    /// Creates a new `Observation`.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        patient_id: impl Into<String>,
        recorded_by: impl Into<String>,
        observation_type: impl Into<String>,
        body: Value,
    ) -> Self {
        Self {
            id: id.into(),
            patient_id: patient_id.into(),
            recorded_by: recorded_by.into(),
            observation_type: observation_type.into(),
            body,
            recorded_at: OffsetDateTime::now_utc(),
        }
    }
}

impl RecordScope for Observation {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Observation
    }

    fn scope_value(&self, attr: ScopeAttr) -> Option<String> {
        match attr {
            ScopeAttr::Patient => Some(self.patient_id.clone()),
            ScopeAttr::Owner => Some(self.recorded_by.clone()),
        }
    }

    fn owner_id(&self) -> Option<&str> {
        Some(&self.recorded_by)
    }
}

// =============================================================================
// Lab Request
// =============================================================================

/// The kind of a student-raised request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestKind {
    Imaging,
    BloodTest,
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Imaging => write!(f, "imaging"),
            Self::BloodTest => write!(f, "blood-test"),
        }
    }
}

/// Lifecycle state of a request.
///
/// Only completed requests confer file-access grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Completed,
    Rejected,
}

impl RequestStatus {
    /// Returns `true` once an instructor has approved and fulfilled the
    /// request.
    #[must_use]
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Completed => write!(f, "completed"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// An imaging or blood-test request raised by a student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabRequest {
    /// The record ID.
    pub id: String,
    /// Imaging or blood test.
    pub request_kind: RequestKind,
    /// The patient the request concerns.
    pub patient_id: String,
    /// The student who raised the request.
    pub requested_by: String,
    /// Current lifecycle state.
    pub status: RequestStatus,
    /// The case file holding the result, once completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_file: Option<String>,
    /// When the request was raised.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl LabRequest {
    /// Creates a new pending `LabRequest`.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        request_kind: RequestKind,
        patient_id: impl Into<String>,
        requested_by: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            request_kind,
            patient_id: patient_id.into(),
            requested_by: requested_by.into(),
            status: RequestStatus::Pending,
            result_file: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    /// Marks the request completed with its result file.
    #[must_use]
    pub fn completed(mut self, result_file: impl Into<String>) -> Self {
        self.status = RequestStatus::Completed;
        self.result_file = Some(result_file.into());
        self
    }
}

impl RecordScope for LabRequest {
    fn kind(&self) -> ResourceKind {
        ResourceKind::LabRequest
    }

    fn scope_value(&self, attr: ScopeAttr) -> Option<String> {
        match attr {
            ScopeAttr::Patient => Some(self.patient_id.clone()),
            ScopeAttr::Owner => Some(self.requested_by.clone()),
        }
    }

    fn owner_id(&self) -> Option<&str> {
        Some(&self.requested_by)
    }
}

// =============================================================================
// Case File
// =============================================================================

/// A patient case file (document, report, scan).
///
/// The byte content lives in an external file store; `total_pages` is
/// reported by that store for paginated documents and bounds every page
/// request regardless of role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseFile {
    /// The record ID.
    pub id: String,
    /// The patient this file belongs to.
    pub patient_id: String,
    /// Display title.
    pub title: String,
    /// MIME type of the stored content.
    pub content_type: String,
    /// Page count for paginated documents, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
    /// The instructor who uploaded the file.
    pub uploaded_by: String,
    /// When the file was uploaded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl CaseFile {
    /// Creates a new `CaseFile`.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        patient_id: impl Into<String>,
        title: impl Into<String>,
        uploaded_by: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            patient_id: patient_id.into(),
            title: title.into(),
            content_type: "application/pdf".to_string(),
            total_pages: None,
            uploaded_by: uploaded_by.into(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    /// Sets the page count reported by the file store.
    #[must_use]
    pub fn with_total_pages(mut self, total_pages: u32) -> Self {
        self.total_pages = Some(total_pages);
        self
    }
}

impl RecordScope for CaseFile {
    fn kind(&self) -> ResourceKind {
        ResourceKind::CaseFile
    }

    fn scope_value(&self, attr: ScopeAttr) -> Option<String> {
        match attr {
            ScopeAttr::Patient => Some(self.patient_id.clone()),
            ScopeAttr::Owner => None,
        }
    }
}
