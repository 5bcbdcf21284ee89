//! SQLite streak counter
//!
//! A single row `{ID, Count}`. The increment is one upsert statement, so
//! concurrent runs never lose an update.

use std::sync::Arc;

use application::{error::ApplicationError, ports::StreakCounterPort};
use async_trait::async_trait;
use domain::StreakCount;
use rusqlite::OptionalExtension;
use tokio::task;
use tracing::{debug, instrument};

use super::connection::ConnectionPool;
use super::schema::TableName;

/// SQLite-based streak counter
#[derive(Debug, Clone)]
pub struct SqliteStreakCounter {
    pool: Arc<ConnectionPool>,
    table: TableName,
    counter_id: String,
}

impl SqliteStreakCounter {
    /// Create a counter stored under `counter_id` in `table`
    #[must_use]
    pub fn new(pool: Arc<ConnectionPool>, table: TableName, counter_id: impl Into<String>) -> Self {
        Self {
            pool,
            table,
            counter_id: counter_id.into(),
        }
    }

    #[must_use]
    pub fn counter_id(&self) -> &str {
        &self.counter_id
    }
}

fn storage_error(e: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::Storage(e.to_string())
}

fn to_count(stored: i64) -> Result<StreakCount, ApplicationError> {
    StreakCount::from_stored(stored)
        .ok_or_else(|| storage_error(format!("Stored count is negative: {stored}")))
}

#[async_trait]
impl StreakCounterPort for SqliteStreakCounter {
    /// A missing row reads as zero
    #[instrument(skip(self), fields(counter_id = %self.counter_id))]
    async fn current(&self) -> Result<StreakCount, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let sql = format!("SELECT Count FROM {} WHERE ID = ?1", self.table.quoted());
        let id = self.counter_id.clone();

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(storage_error)?;
            let stored: Option<i64> = conn
                .query_row(&sql, [&id], |row| row.get(0))
                .optional()
                .map_err(storage_error)?;

            stored.map_or_else(|| Ok(StreakCount::default()), to_count)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    /// Atomically add one, creating the row at 1
    #[instrument(skip(self), fields(counter_id = %self.counter_id))]
    async fn increment(&self) -> Result<StreakCount, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let sql = format!(
            "INSERT INTO {} (ID, Count) VALUES (?1, 1)
             ON CONFLICT(ID) DO UPDATE SET Count = Count + 1
             RETURNING Count",
            self.table.quoted()
        );
        let id = self.counter_id.clone();

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(storage_error)?;
            let stored: i64 = conn
                .query_row(&sql, [&id], |row| row.get(0))
                .map_err(storage_error)?;

            let count = to_count(stored)?;
            debug!(count = %count, "Incremented streak");
            Ok(count)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }
}
