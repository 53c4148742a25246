//! Typed ID wrappers for domain entities.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::num::ParseIntError;

/// A strongly-typed wrapper for user IDs.
///
/// Values come from the store's sequence and are never reused, so an id
/// observed once always refers to the same (possibly deleted) user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl UserId {
    /// Creates a user ID from a raw database value.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Parses a user ID from a string such as a path segment.
    pub fn parse(s: &str) -> Result<Self, ParseIntError> {
        Ok(Self(s.trim().parse()?))
    }

    /// Returns the inner integer.
    #[must_use]
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
