//! Domain identifier types with proper encapsulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Bookmaker identifier - newtype for type safety.
///
/// Ordering is lexicographic on the raw identifier; the detector relies on it
/// to break ties between bookmakers quoting the same best price.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookmakerId(String);

impl BookmakerId {
    /// Create a new BookmakerId from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the bookmaker ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookmakerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for BookmakerId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for BookmakerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
