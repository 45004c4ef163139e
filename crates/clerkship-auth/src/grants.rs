//! File-access grants.
//!
//! A grant authorizes one student to view one case file, in full or by page
//! subset. Every grant originates from exactly one of: a completed imaging
//! request, a completed blood-test request, or a manual release by an
//! instructor. The exactly-one-origin invariant is enforced at write time;
//! a grant that references zero or multiple origins is never persisted.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::AuthError;

/// The origin a grant was created from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantOrigin<'a> {
    /// A completed imaging request.
    ImagingRequest(&'a str),
    /// A completed blood-test request.
    BloodTestRequest(&'a str),
    /// A manual release by the named instructor.
    ManualRelease(&'a str),
}

/// A stored file-access grant.
///
/// The three origin fields are mutually exclusive; use the per-origin
/// constructors or [`FileGrant::new`], both of which enforce the invariant.
/// Grants are deleted when the approval is revoked or the originating
/// request is deleted (cascade, handled by the persistence layer).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileGrant {
    /// The record ID.
    pub id: String,
    /// The case file this grant targets.
    pub file_id: String,
    /// The student the grant is addressed to.
    pub student_id: String,
    /// Authorized page subset as a range string; empty means no pages.
    pub page_range: String,
    /// Originating imaging request, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imaging_request: Option<String>,
    /// Originating blood-test request, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_test_request: Option<String>,
    /// Releasing instructor for manual releases, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_release: Option<String>,
    /// When the grant was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl FileGrant {
    /// Creates a grant from raw origin fields, enforcing the
    /// exactly-one-origin invariant.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::GrantIntegrity` when zero or multiple origin
    /// fields are set.
    pub fn new(
        id: impl Into<String>,
        file_id: impl Into<String>,
        student_id: impl Into<String>,
        page_range: impl Into<String>,
        imaging_request: Option<String>,
        blood_test_request: Option<String>,
        manual_release: Option<String>,
    ) -> Result<Self, AuthError> {
        let grant = Self {
            id: id.into(),
            file_id: file_id.into(),
            student_id: student_id.into(),
            page_range: page_range.into(),
            imaging_request,
            blood_test_request,
            manual_release,
            created_at: OffsetDateTime::now_utc(),
        };
        grant.validate()?;
        Ok(grant)
    }

    /// Creates a grant originating from a completed imaging request.
    #[must_use]
    pub fn from_imaging_request(
        id: impl Into<String>,
        file_id: impl Into<String>,
        student_id: impl Into<String>,
        request_id: impl Into<String>,
        page_range: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            file_id: file_id.into(),
            student_id: student_id.into(),
            page_range: page_range.into(),
            imaging_request: Some(request_id.into()),
            blood_test_request: None,
            manual_release: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    /// Creates a grant originating from a completed blood-test request.
    #[must_use]
    pub fn from_blood_test_request(
        id: impl Into<String>,
        file_id: impl Into<String>,
        student_id: impl Into<String>,
        request_id: impl Into<String>,
        page_range: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            file_id: file_id.into(),
            student_id: student_id.into(),
            page_range: page_range.into(),
            imaging_request: None,
            blood_test_request: Some(request_id.into()),
            manual_release: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    /// Creates a grant released manually by an instructor.
    #[must_use]
    pub fn from_manual_release(
        id: impl Into<String>,
        file_id: impl Into<String>,
        student_id: impl Into<String>,
        released_by: impl Into<String>,
        page_range: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            file_id: file_id.into(),
            student_id: student_id.into(),
            page_range: page_range.into(),
            imaging_request: None,
            blood_test_request: None,
            manual_release: Some(released_by.into()),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    /// Checks the exactly-one-origin invariant and returns the origin.
    ///
    /// Storage implementations call this before persisting; deserialized
    /// grants from untrusted sources must be validated the same way.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::GrantIntegrity` when zero or multiple origin
    /// fields are set.
    pub fn validate(&self) -> Result<GrantOrigin<'_>, AuthError> {
        let origins = [
            self.imaging_request.as_deref().map(GrantOrigin::ImagingRequest),
            self.blood_test_request
                .as_deref()
                .map(GrantOrigin::BloodTestRequest),
            self.manual_release.as_deref().map(GrantOrigin::ManualRelease),
        ];
        let mut found = origins.into_iter().flatten();

        let Some(origin) = found.next() else {
            return Err(AuthError::grant_integrity(format!(
                "grant '{}' references no origin",
                self.id
            )));
        };
        if found.next().is_some() {
            return Err(AuthError::grant_integrity(format!(
                "grant '{}' references multiple origins",
                self.id
            )));
        }
        Ok(origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_imaging_grant_validates() {
        let grant = FileGrant::from_imaging_request("g-1", "f-1", "s-1", "req-1", "1-3");
        assert_eq!(
            grant.validate().unwrap(),
            GrantOrigin::ImagingRequest("req-1")
        );
    }

    #[test]
    fn test_blood_test_grant_validates() {
        let grant = FileGrant::from_blood_test_request("g-1", "f-1", "s-1", "req-2", "5");
        assert_eq!(
            grant.validate().unwrap(),
            GrantOrigin::BloodTestRequest("req-2")
        );
    }

    #[test]
    fn test_manual_release_grant_validates() {
        let grant = FileGrant::from_manual_release("g-1", "f-1", "s-1", "instructor-1", "5-7");
        assert_eq!(
            grant.validate().unwrap(),
            GrantOrigin::ManualRelease("instructor-1")
        );
    }

    #[test]
    fn test_zero_origins_rejected() {
        let err = FileGrant::new("g-1", "f-1", "s-1", "1-3", None, None, None).unwrap_err();
        assert!(matches!(err, AuthError::GrantIntegrity { .. }));
        assert!(err.to_string().contains("no origin"));
    }

    #[test]
    fn test_multiple_origins_rejected() {
        let err = FileGrant::new(
            "g-1",
            "f-1",
            "s-1",
            "1-3",
            Some("req-1".to_string()),
            None,
            Some("instructor-1".to_string()),
        )
        .unwrap_err();
        assert!(matches!(err, AuthError::GrantIntegrity { .. }));
        assert!(err.to_string().contains("multiple origins"));
    }

    #[test]
    fn test_new_with_single_origin_succeeds() {
        let grant = FileGrant::new(
            "g-1",
            "f-1",
            "s-1",
            "1-3",
            Some("req-1".to_string()),
            None,
            None,
        )
        .unwrap();
        assert_eq!(grant.imaging_request.as_deref(), Some("req-1"));
    }

    #[test]
    fn test_tampered_deserialized_grant_fails_validation() {
        let mut grant = FileGrant::from_imaging_request("g-1", "f-1", "s-1", "req-1", "1-3");
        grant.blood_test_request = Some("req-2".to_string());
        assert!(grant.validate().is_err());
    }
}
