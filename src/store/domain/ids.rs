//! Identifier newtypes for stored message records.
//!
//! These types wrap the raw column values to prevent accidental mixing of
//! surrogate keys and version counters at call sites.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned surrogate key for a persisted message record.
///
/// Assigned once at creation by a [`SurrogateKeyIncrementer`] and immutable
/// thereafter. The value is independent of payload content.
///
/// [`SurrogateKeyIncrementer`]: crate::store::ports::SurrogateKeyIncrementer
///
/// # Examples
///
/// ```
/// use depot::store::domain::SurrogateId;
///
/// let id = SurrogateId::new(42);
/// assert_eq!(id.as_i64(), 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurrogateId(i64);

impl SurrogateId {
    /// Creates a surrogate identifier from a raw key value.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw key value.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl From<i64> for SurrogateId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for SurrogateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Optimistic-lock version counter for a persisted message record.
///
/// Starts at 0 on creation and increments by exactly 1 on every successful
/// update. An update only succeeds while the stored counter still equals the
/// counter the writer read, which makes stale writes detectable without any
/// held lock.
///
/// # Examples
///
/// ```
/// use depot::store::domain::Version;
///
/// let version = Version::initial();
/// assert_eq!(version.as_i32(), 0);
/// assert_eq!(version.next().as_i32(), 1);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(i32);

impl Version {
    /// Creates a version counter from a raw column value.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Returns the version assigned to freshly inserted records.
    #[must_use]
    pub const fn initial() -> Self {
        Self(0)
    }

    /// Returns the raw counter value.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Returns the counter an update writes back.
    ///
    /// Saturating, so a counter at `i32::MAX` stays there instead of
    /// wrapping. That many updates to a single record is practically
    /// unreachable.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl From<i32> for Version {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
