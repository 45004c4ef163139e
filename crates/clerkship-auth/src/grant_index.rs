//! The file-grant index: which pages of a case file may a principal see?
//!
//! Admins and instructors are unrestricted. Students need a grant, resolved
//! with first-match-wins precedence over origins: a completed imaging
//! request, then a completed blood-test request, then a manual release.

use std::sync::Arc;

use clerkship_core::{CaseFile, RequestStatus};

use crate::error::AuthError;
use crate::grants::FileGrant;
use crate::pages::PageRangeSpec;
use crate::principal::{Principal, Role, resolve_role};
use crate::storage::GrantStorage;

// =============================================================================
// File Access
// =============================================================================

/// The page scope a principal is authorized for on a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileAccess {
    /// No page filtering applies.
    Unrestricted,
    /// Only the pages of the matched grant's range.
    Pages(PageRangeSpec),
}

// =============================================================================
// File Grant Index
// =============================================================================

/// Resolves a principal's authorized page scope for a case file.
pub struct FileGrantIndex {
    storage: Arc<dyn GrantStorage>,
}

impl FileGrantIndex {
    /// Creates a new index over the given grant storage.
    #[must_use]
    pub fn new(storage: Arc<dyn GrantStorage>) -> Self {
        Self { storage }
    }

    /// Returns the authorized page scope for the file, or `None` when the
    /// principal has no grant.
    ///
    /// Precedence among a student's grants: imaging request, then blood-test
    /// request, then manual release; first match wins. Request-origin
    /// grants count only while the originating request is completed.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` for lookup failures and
    /// `AuthError::InvalidPageRange` if the matched grant's range string is
    /// malformed.
    pub async fn authorized_range(
        &self,
        file: &CaseFile,
        principal: Option<&Principal>,
    ) -> Result<Option<FileAccess>, AuthError> {
        let role = resolve_role(principal);
        match role {
            Some(Role::Admin) | Some(Role::Instructor) => {
                return Ok(Some(FileAccess::Unrestricted));
            }
            Some(Role::Student) => {}
            None => return Ok(None),
        }
        // Role resolution guarantees a principal here.
        let Some(principal) = principal else {
            return Ok(None);
        };

        let grants = self.storage.grants_for_file(&file.id, &principal.id).await?;

        if let Some(grant) = self.completed_request_grant(&grants, GrantField::Imaging).await? {
            return Ok(Some(FileAccess::Pages(PageRangeSpec::parse(
                &grant.page_range,
            )?)));
        }
        if let Some(grant) = self
            .completed_request_grant(&grants, GrantField::BloodTest)
            .await?
        {
            return Ok(Some(FileAccess::Pages(PageRangeSpec::parse(
                &grant.page_range,
            )?)));
        }
        if let Some(grant) = grants.iter().find(|g| g.manual_release.is_some()) {
            return Ok(Some(FileAccess::Pages(PageRangeSpec::parse(
                &grant.page_range,
            )?)));
        }

        Ok(None)
    }

    /// Authorizes a requested page list against the file and the principal's
    /// grant scope.
    ///
    /// Pages outside `1..=total_pages` are rejected for every role, before
    /// any grant lookup.
    ///
    /// # Errors
    ///
    /// - `AuthError::PageOutOfBounds` for pages outside the document
    /// - `AuthError::Forbidden` when no grant exists
    /// - `AuthError::PageNotAuthorized` for pages outside the grant's range
    /// - `AuthError::InvalidPageRange` if the file carries no page count
    pub async fn authorize_pages(
        &self,
        file: &CaseFile,
        principal: Option<&Principal>,
        requested: &[u32],
    ) -> Result<(), AuthError> {
        let Some(total) = file.total_pages else {
            return Err(AuthError::invalid_page_range(format!(
                "file '{}' does not support page extraction",
                file.id
            )));
        };
        for &page in requested {
            if page < 1 || page > total {
                return Err(AuthError::PageOutOfBounds { page, total });
            }
        }

        match self.authorized_range(file, principal).await? {
            Some(FileAccess::Unrestricted) => Ok(()),
            Some(FileAccess::Pages(spec)) => {
                for &page in requested {
                    if !spec.contains(page) {
                        return Err(AuthError::PageNotAuthorized {
                            page,
                            authorized: spec.as_str().to_string(),
                        });
                    }
                }
                Ok(())
            }
            None => Err(AuthError::forbidden(format!(
                "no access grant for file '{}'",
                file.id
            ))),
        }
    }

    /// Finds the first grant with the given request-origin field whose
    /// originating request is completed.
    async fn completed_request_grant<'a>(
        &self,
        grants: &'a [FileGrant],
        field: GrantField,
    ) -> Result<Option<&'a FileGrant>, AuthError> {
        for grant in grants {
            let request_id = match field {
                GrantField::Imaging => grant.imaging_request.as_deref(),
                GrantField::BloodTest => grant.blood_test_request.as_deref(),
            };
            let Some(request_id) = request_id else {
                continue;
            };
            let status = self.storage.request_status(request_id).await?;
            if status.is_some_and(RequestStatus::is_completed) {
                return Ok(Some(grant));
            }
        }
        Ok(None)
    }
}

#[derive(Clone, Copy)]
enum GrantField {
    Imaging,
    BloodTest,
}
