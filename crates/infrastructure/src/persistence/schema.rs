//! Table names and table creation.

use std::fmt;

use rusqlite::Connection;
use tracing::debug;

use super::connection::DatabaseError;

/// A validated SQLite table identifier (`[A-Za-z_][A-Za-z0-9_]*`)
///
/// Table names come from configuration and are interpolated into SQL, so
/// nothing else is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(String);

impl TableName {
    /// Validate a table name
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidTableName` for anything that is not a
    /// plain identifier.
    pub fn new(name: impl Into<String>) -> Result<Self, DatabaseError> {
        let name = name.into();
        let mut chars = name.chars();
        let valid = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

        if valid {
            Ok(Self(name))
        } else {
            Err(DatabaseError::InvalidTableName(name))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Double-quoted form for SQL text
    #[must_use]
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Create the weather and counter tables if they do not exist
///
/// # Errors
///
/// Returns an error if a `CREATE TABLE` statement fails.
pub fn ensure_tables(
    conn: &Connection,
    weather: &TableName,
    counter: &TableName,
) -> Result<(), DatabaseError> {
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {weather} (
            date TEXT PRIMARY KEY NOT NULL,
            High TEXT NOT NULL,
            Rainfall TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS {counter} (
            ID TEXT PRIMARY KEY NOT NULL,
            Count INTEGER NOT NULL CHECK (Count >= 0)
        );",
        weather = weather.quoted(),
        counter = counter.quoted(),
    ))?;

    debug!(weather = %weather, counter = %counter, "Tables ready");
    Ok(())
}
