//! Weather history port
//!
//! Defines the interface for persisting one weather record per calendar day.

use async_trait::async_trait;
use chrono::NaiveDate;
use domain::DailyWeatherRecord;

use crate::error::ApplicationError;

/// Port for weather history persistence
///
/// Records are keyed by date. Writing a record for a date that already has
/// one replaces it, so repeating a run on the same day is idempotent.
#[async_trait]
pub trait WeatherHistoryPort: Send + Sync {
    /// Insert or replace the record for `record.date`
    async fn record_day(&self, record: &DailyWeatherRecord) -> Result<(), ApplicationError>;

    /// Get the record stored for a date, if any
    async fn find_by_date(
        &self,
        date: NaiveDate,
    ) -> Result<Option<DailyWeatherRecord>, ApplicationError>;
}
