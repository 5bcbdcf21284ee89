//! Persistence module
//!
//! SQLite-based weather history and streak counter.

pub mod connection;
pub mod schema;
pub mod streak_counter_store;
pub mod weather_history_store;

use std::sync::Arc;

use tracing::info;

pub use connection::{ConnectionPool, DatabaseError, PooledConn, create_pool};
pub use schema::{TableName, ensure_tables};
pub use streak_counter_store::SqliteStreakCounter;
pub use weather_history_store::SqliteWeatherHistoryStore;

use crate::config::{DatabaseConfig, StorageConfig};

/// The opened database and both stores sharing its pool
#[derive(Debug, Clone)]
pub struct Persistence {
    pub pool: Arc<ConnectionPool>,
    pub history: SqliteWeatherHistoryStore,
    pub counter: SqliteStreakCounter,
}

impl Persistence {
    /// Open the pool, create missing tables and build both stores
    ///
    /// # Errors
    ///
    /// Returns an error if a table name is invalid, the database cannot be
    /// opened, or the tables cannot be created.
    pub fn open(database: &DatabaseConfig, storage: &StorageConfig) -> Result<Self, DatabaseError> {
        let weather = TableName::new(storage.weather_table.as_str())?;
        let counter = TableName::new(storage.counter_table.as_str())?;

        let pool = Arc::new(create_pool(database)?);
        let conn = pool.get()?;
        ensure_tables(&conn, &weather, &counter)?;
        drop(conn);
        info!(weather = %weather, counter = %counter, "Persistence ready");

        Ok(Self {
            history: SqliteWeatherHistoryStore::new(Arc::clone(&pool), weather),
            counter: SqliteStreakCounter::new(Arc::clone(&pool), counter, &storage.counter_id),
            pool,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(weather: &str, counter: &str) -> StorageConfig {
        StorageConfig {
            weather_table: weather.to_string(),
            counter_table: counter.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn open_creates_tables() {
        let persistence =
            Persistence::open(&DatabaseConfig::in_memory(), &storage("Weather", "Streak")).unwrap();
        assert_eq!(persistence.history.table().as_str(), "Weather");
        assert_eq!(persistence.counter.counter_id(), "Counter");
    }

    #[test]
    fn open_rejects_bad_table_name() {
        let result = Persistence::open(&DatabaseConfig::in_memory(), &storage("bad name", "Streak"));
        assert!(matches!(result, Err(DatabaseError::InvalidTableName(_))));
    }

    #[tokio::test]
    async fn opened_stores_share_the_bootstrap_connection() {
        use application::ports::StreakCounterPort;

        let persistence =
            Persistence::open(&DatabaseConfig::in_memory(), &storage("Weather", "Streak")).unwrap();
        assert_eq!(persistence.counter.increment().await.unwrap().value(), 1);
        assert_eq!(persistence.counter.current().await.unwrap().value(), 1);
    }
}
