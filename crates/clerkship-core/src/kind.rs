//! Resource kind enumeration.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The data entities managed by the platform.
///
/// The entity name doubles as the `{entity}` segment of cache keys and
/// invalidation patterns, so it must stay stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Patient demographic records.
    Patient,
    /// Clinical observations (vital signs, notes) recorded by students.
    Observation,
    /// Imaging and blood-test requests raised by students.
    LabRequest,
    /// Patient case files (documents, reports, scans).
    CaseFile,
}

impl ResourceKind {
    /// All kinds, in declaration order.
    pub const ALL: &'static [ResourceKind] = &[
        ResourceKind::Patient,
        ResourceKind::Observation,
        ResourceKind::LabRequest,
        ResourceKind::CaseFile,
    ];

    /// The stable entity name used in cache keys.
    #[must_use]
    pub fn entity(self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Observation => "observation",
            Self::LabRequest => "lab_request",
            Self::CaseFile => "case_file",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.entity())
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "patient" => Ok(Self::Patient),
            "observation" => Ok(Self::Observation),
            "lab_request" => Ok(Self::LabRequest),
            "case_file" => Ok(Self::CaseFile),
            other => Err(CoreError::invalid_resource_kind(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_entity_names_are_stable() {
        assert_eq!(ResourceKind::Patient.entity(), "patient");
        assert_eq!(ResourceKind::Observation.entity(), "observation");
        assert_eq!(ResourceKind::LabRequest.entity(), "lab_request");
        assert_eq!(ResourceKind::CaseFile.entity(), "case_file");
    }

    #[test]
    fn test_round_trip_through_str() {
        for kind in ResourceKind::ALL {
            let parsed = ResourceKind::from_str(kind.entity()).unwrap();
            assert_eq!(parsed, *kind);
        }
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let err = ResourceKind::from_str("widget").unwrap_err();
        assert!(err.is_client_error());
    }
}
