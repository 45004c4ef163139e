//! Page-range specifications for partial file release.
//!
//! Grants authorize a subset of a paginated document as a range string:
//! comma-separated tokens, each a single 1-based page number or an inclusive
//! `start-end` range, e.g. `"1-3,5,7-9"`.

use std::collections::BTreeSet;

use crate::error::AuthError;

/// A parsed page-range specification.
///
/// Keeps both the raw string (for messages and persistence) and the expanded
/// page set (for membership checks).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRangeSpec {
    raw: String,
    pages: BTreeSet<u32>,
}

impl PageRangeSpec {
    /// Parses a range string.
    ///
    /// The empty string parses to the empty set. Whitespace around tokens is
    /// tolerated.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidPageRange` for non-integer tokens and for
    /// descending ranges; a bad token is never silently dropped.
    pub fn parse(raw: &str) -> Result<Self, AuthError> {
        let mut pages = BTreeSet::new();

        for token in raw.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            match token.split_once('-') {
                Some((start, end)) => {
                    let start = parse_page(start)?;
                    let end = parse_page(end)?;
                    if start > end {
                        return Err(AuthError::invalid_page_range(format!(
                            "descending range '{token}'"
                        )));
                    }
                    pages.extend(start..=end);
                }
                None => {
                    pages.insert(parse_page(token)?);
                }
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            pages,
        })
    }

    /// The raw range string as written on the grant.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The expanded set of authorized pages.
    #[must_use]
    pub fn pages(&self) -> &BTreeSet<u32> {
        &self.pages
    }

    /// Returns `true` if the page is in the authorized set.
    #[must_use]
    pub fn contains(&self, page: u32) -> bool {
        self.pages.contains(&page)
    }

    /// Returns `true` if the spec authorizes no pages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl std::fmt::Display for PageRangeSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

fn parse_page(token: &str) -> Result<u32, AuthError> {
    token
        .trim()
        .parse::<u32>()
        .map_err(|_| AuthError::invalid_page_range(format!("non-integer token '{}'", token.trim())))
}
