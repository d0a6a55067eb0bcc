//! Data types crossing the gateway boundary.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// An opaque cursor for fetching the next page of a paginated result set.
///
/// The store owns the token format; callers only carry it back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContinuationToken(String);

impl ContinuationToken {
    /// Wraps a store-issued token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContinuationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ContinuationToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// One bounded, ordered page of a search result.
///
/// Entries are raw JSON: a store may interleave resources of other types
/// (or operation outcomes) in a result bundle, so filtering by type is the
/// consumer's job. The full match set is the concatenation of all pages
/// reachable by following `continuation` until it is `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultPage {
    /// The entries in this page.
    pub entries: Vec<Value>,
    /// Cursor for the next page, if more results exist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continuation: Option<ContinuationToken>,
}

impl ResultPage {
    /// Creates an empty final page.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a final page with entries.
    #[must_use]
    pub fn with_entries(entries: Vec<Value>) -> Self {
        Self {
            entries,
            continuation: None,
        }
    }

    /// Sets the continuation cursor.
    #[must_use]
    pub fn with_continuation(mut self, token: ContinuationToken) -> Self {
        self.continuation = Some(token);
        self
    }

    /// Returns the number of entries in this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if this page has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if more pages exist beyond this one.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.continuation.is_some()
    }
}
