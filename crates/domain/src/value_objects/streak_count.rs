//! Streak count value object

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of hot-and-dry days counted since the counter was last at zero
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct StreakCount(u64);

impl StreakCount {
    /// Create a streak count
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the count
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Convert a stored SQLite integer into a count
    ///
    /// Returns `None` for negative values.
    #[must_use]
    pub fn from_stored(value: i64) -> Option<Self> {
        u64::try_from(value).ok().map(Self)
    }
}

impl fmt::Display for StreakCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for StreakCount {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<StreakCount> for u64 {
    fn from(count: StreakCount) -> Self {
        count.0
    }
}
