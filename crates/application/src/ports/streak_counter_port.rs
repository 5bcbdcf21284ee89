//! Streak counter port
//!
//! Defines the interface for the single named counter of hot-and-dry days.

use async_trait::async_trait;
use domain::StreakCount;

use crate::error::ApplicationError;

/// Port for the persisted streak counter
///
/// Implementations must make `increment` atomic with respect to concurrent
/// callers: two overlapping increments always advance the counter by two.
#[async_trait]
pub trait StreakCounterPort: Send + Sync {
    /// Read the current count without modifying it
    ///
    /// Returns zero when the counter has never been incremented.
    async fn current(&self) -> Result<StreakCount, ApplicationError>;

    /// Atomically add one to the counter and return the new value
    ///
    /// A missing counter starts from zero, so the first call returns one.
    async fn increment(&self) -> Result<StreakCount, ApplicationError>;

    /// Increment on a hot-and-dry day, otherwise only read
    ///
    /// The read path never resets the counter.
    async fn read_or_increment(
        &self,
        should_increment: bool,
    ) -> Result<StreakCount, ApplicationError> {
        if should_increment {
            self.increment().await
        } else {
            self.current().await
        }
    }
}
