//! SQLite weather history store
//!
//! One row per calendar day keyed by `MM-DD-YYYY`. Writing a day twice keeps
//! the latest values.

use std::sync::Arc;

use application::{error::ApplicationError, ports::WeatherHistoryPort};
use async_trait::async_trait;
use chrono::NaiveDate;
use domain::{DATE_KEY_FORMAT, DailyWeatherRecord};
use rusqlite::{OptionalExtension, params};
use tokio::task;
use tracing::{debug, instrument};

use super::connection::ConnectionPool;
use super::schema::TableName;

/// SQLite-based weather history
#[derive(Debug, Clone)]
pub struct SqliteWeatherHistoryStore {
    pool: Arc<ConnectionPool>,
    table: TableName,
}

impl SqliteWeatherHistoryStore {
    /// Create a store over an existing table
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>, table: TableName) -> Self {
        Self { pool, table }
    }

    #[must_use]
    pub const fn table(&self) -> &TableName {
        &self.table
    }
}

fn storage_error(e: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::Storage(e.to_string())
}

#[async_trait]
impl WeatherHistoryPort for SqliteWeatherHistoryStore {
    #[instrument(skip(self, record), fields(date = %record.date_key()))]
    async fn record_day(&self, record: &DailyWeatherRecord) -> Result<(), ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let sql = format!(
            "INSERT INTO {} (date, High, Rainfall) VALUES (?1, ?2, ?3)
             ON CONFLICT(date) DO UPDATE SET High = excluded.High, Rainfall = excluded.Rainfall",
            self.table.quoted()
        );
        let date_key = record.date_key();
        let high = record.high_attribute();
        let rainfall = record.rainfall_attribute();

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(storage_error)?;
            conn.execute(&sql, params![date_key, high, rainfall])
                .map_err(storage_error)?;

            debug!(high = %high, rainfall = %rainfall, "Recorded weather day");
            Ok(())
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self))]
    async fn find_by_date(
        &self,
        date: NaiveDate,
    ) -> Result<Option<DailyWeatherRecord>, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let sql = format!(
            "SELECT date, High, Rainfall FROM {} WHERE date = ?1",
            self.table.quoted()
        );
        let date_key = date.format(DATE_KEY_FORMAT).to_string();

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(storage_error)?;
            let row = conn
                .query_row(&sql, [&date_key], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                })
                .optional()
                .map_err(storage_error)?;

            row.map(|(key, high, rainfall)| {
                DailyWeatherRecord::from_attributes(&key, &high, &rainfall)
                    .map_err(|e| storage_error(format!("Corrupt row for {key}: {e}")))
            })
            .transpose()
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }
}
