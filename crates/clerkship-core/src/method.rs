//! Request method abstraction.
//!
//! The access-control and caching layers reason about HTTP-equivalent verbs
//! without depending on any HTTP framework. Routing and request parsing live
//! outside this workspace; handlers translate their framework's method into
//! [`Method`] at the boundary.

use serde::{Deserialize, Serialize};

/// The HTTP-equivalent method of an inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Head,
    Options,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// The read-only methods, usable as a shortcut when declaring a role's
    /// permissions.
    pub const SAFE: &'static [Method] = &[Method::Get, Method::Head, Method::Options];

    /// Returns `true` for read-only methods (GET/HEAD/OPTIONS).
    #[must_use]
    pub fn is_safe(self) -> bool {
        matches!(self, Self::Get | Self::Head | Self::Options)
    }

    /// Returns `true` if list responses for this method are served through
    /// the query cache. Only GET produces a cacheable list payload.
    #[must_use]
    pub fn is_cached_read(self) -> bool {
        matches!(self, Self::Get)
    }

    /// Returns `true` for methods that mutate records.
    #[must_use]
    pub fn is_write(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch | Self::Delete)
    }

    /// The canonical method name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
