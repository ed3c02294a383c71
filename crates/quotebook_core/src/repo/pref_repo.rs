//! Key/value preference storage.
//!
//! # Responsibility
//! - Read and write the selected category between sessions.
//! - Offer a volatile implementation for tests and `--ephemeral` runs.
//!
//! # Invariants
//! - `set` is an upsert; the latest write wins.
//! - Keys are trimmed and must be non-empty.

use crate::db::DbError;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Preference key holding the last selected category filter.
pub const SELECTED_CATEGORY_KEY: &str = "selectedCategory";

pub type PrefsResult<T> = Result<T, PrefsError>;

#[derive(Debug)]
pub enum PrefsError {
    InvalidKey(String),
    Db(DbError),
}

impl Display for PrefsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKey(key) => write!(f, "invalid preference key: `{key}`"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PrefsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidKey(_) => None,
        }
    }
}

impl From<DbError> for PrefsError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for PrefsError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract for string preferences.
pub trait PreferenceRepository {
    fn get(&self, key: &str) -> PrefsResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> PrefsResult<()>;
}

/// SQLite-backed preferences over a migrated connection.
pub struct SqlitePreferenceRepository {
    conn: Connection,
}

impl SqlitePreferenceRepository {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl PreferenceRepository for SqlitePreferenceRepository {
    fn get(&self, key: &str) -> PrefsResult<Option<String>> {
        let key = normalize_key(key)?;
        let value = self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> PrefsResult<()> {
        let key = normalize_key(key)?;
        self.conn.execute(
            "INSERT INTO preferences (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        debug!("event=pref_set module=prefs status=ok key={key}");
        Ok(())
    }
}

/// Volatile preferences that vanish with the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryPreferenceRepository {
    values: HashMap<String, String>,
}

impl MemoryPreferenceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceRepository for MemoryPreferenceRepository {
    fn get(&self, key: &str) -> PrefsResult<Option<String>> {
        let key = normalize_key(key)?;
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> PrefsResult<()> {
        let key = normalize_key(key)?;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<P: PreferenceRepository + ?Sized> PreferenceRepository for Box<P> {
    fn get(&self, key: &str) -> PrefsResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> PrefsResult<()> {
        (**self).set(key, value)
    }
}

fn normalize_key(key: &str) -> PrefsResult<&str> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(PrefsError::InvalidKey(key.to_string()));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::{
        MemoryPreferenceRepository, PreferenceRepository, PrefsError,
        SqlitePreferenceRepository, SELECTED_CATEGORY_KEY,
    };
    use crate::db::open_db_in_memory;

    #[test]
    fn sqlite_set_is_upsert() {
        let mut repo = SqlitePreferenceRepository::new(open_db_in_memory().unwrap());
        assert_eq!(repo.get(SELECTED_CATEGORY_KEY).unwrap(), None);

        repo.set(SELECTED_CATEGORY_KEY, "Education").unwrap();
        repo.set(SELECTED_CATEGORY_KEY, "Motivation").unwrap();
        assert_eq!(
            repo.get(SELECTED_CATEGORY_KEY).unwrap().as_deref(),
            Some("Motivation")
        );
    }

    #[test]
    fn blank_key_is_rejected() {
        let mut repo = MemoryPreferenceRepository::new();
        let err = repo.set("  ", "x").unwrap_err();
        assert!(matches!(err, PrefsError::InvalidKey(_)));
    }
}
