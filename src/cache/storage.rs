//! Local store trait and SQLite implementation.

use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;
use tracing::warn;

use super::traits::Cacheable;

/// Local persistence failures.
#[derive(Debug, Error)]
pub enum StorageError {
  #[error("Storage error: {0}")]
  Sqlite(#[from] rusqlite::Error),
  #[error("Storage error: {0}")]
  Serialize(#[from] serde_json::Error),
  #[error("Storage error: {0}")]
  Io(#[from] std::io::Error),
  #[error("Storage error: lock poisoned")]
  Poisoned,
}

/// Trait for local store backends.
///
/// Single-process, single-writer. Each call is atomic on its own; there is
/// no batching across calls.
pub trait LocalStore: Send + Sync {
  /// Check whether an entity with this id is stored.
  fn exists<T: Cacheable>(&self, id: i64) -> Result<bool, StorageError>;

  /// Store an entity unless one with the same id already exists.
  ///
  /// Returns `true` if the entity was written. An existing entity is never
  /// overwritten, even if the incoming fields differ.
  fn insert_if_absent<T: Cacheable>(&self, entity: &T) -> Result<bool, StorageError>;

  /// All stored entities of this type, ascending by id.
  fn all_sorted_by_id<T: Cacheable>(&self) -> Result<Vec<T>, StorageError>;
}

/// SQLite-based store implementation.
pub struct SqliteStore {
  conn: Mutex<Connection>,
}

impl SqliteStore {
  /// Open or create a store at `path`.
  pub fn open(path: &Path) -> Result<Self, StorageError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path)?;
    Self::with_connection(conn)
  }

  /// Create a store that lives only as long as this value.
  pub fn open_in_memory() -> Result<Self, StorageError> {
    Self::with_connection(Connection::open_in_memory()?)
  }

  fn with_connection(conn: Connection) -> Result<Self, StorageError> {
    conn.execute_batch(CACHE_SCHEMA)?;
    Ok(Self {
      conn: Mutex::new(conn),
    })
  }

  fn conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StorageError> {
    self.conn.lock().map_err(|_| StorageError::Poisoned)
  }
}

/// Schema for cache tables.
const CACHE_SCHEMA: &str = r#"
-- Generic entity cache (stores serialized JSON)
CREATE TABLE IF NOT EXISTS entity_cache (
    entity_type TEXT NOT NULL,
    entity_id INTEGER NOT NULL,
    data BLOB NOT NULL,
    cached_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (entity_type, entity_id)
);
"#;

impl LocalStore for SqliteStore {
  fn exists<T: Cacheable>(&self, id: i64) -> Result<bool, StorageError> {
    let conn = self.conn()?;

    let found: bool = conn.query_row(
      "SELECT EXISTS(SELECT 1 FROM entity_cache WHERE entity_type = ? AND entity_id = ?)",
      params![T::entity_type(), id],
      |row| row.get(0),
    )?;

    Ok(found)
  }

  fn insert_if_absent<T: Cacheable>(&self, entity: &T) -> Result<bool, StorageError> {
    let data = serde_json::to_vec(entity)?;
    let conn = self.conn()?;

    let written = conn.execute(
      "INSERT OR IGNORE INTO entity_cache (entity_type, entity_id, data, cached_at)
       VALUES (?, ?, ?, datetime('now'))",
      params![T::entity_type(), entity.cache_id(), data],
    )?;

    Ok(written == 1)
  }

  fn all_sorted_by_id<T: Cacheable>(&self) -> Result<Vec<T>, StorageError> {
    let conn = self.conn()?;
    let entity_type = T::entity_type();

    let mut stmt = conn.prepare(
      "SELECT entity_id, data FROM entity_cache
       WHERE entity_type = ?
       ORDER BY entity_id ASC",
    )?;

    let rows = stmt
      .query_map(params![entity_type], |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, Vec<u8>>(1)?))
      })?
      .collect::<Result<Vec<_>, _>>()?;

    let entities = rows
      .into_iter()
      .filter_map(|(id, data)| match serde_json::from_slice(&data) {
        Ok(entity) => Some(entity),
        Err(e) => {
          warn!(entity_type, id, error = %e, "skipping undecodable cache row");
          None
        }
      })
      .collect();

    Ok(entities)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::Movie;

  fn movie(id: i64, title: &str) -> Movie {
    Movie {
      id,
      title: title.to_string(),
      overview: format!("Overview {}", id),
      poster_path: None,
    }
  }

  #[test]
  fn test_insert_and_exists() {
    let store = SqliteStore::open_in_memory().unwrap();

    assert!(!store.exists::<Movie>(1).unwrap());
    assert!(store.insert_if_absent(&movie(1, "Movie 1")).unwrap());
    assert!(store.exists::<Movie>(1).unwrap());
  }

  #[test]
  fn test_second_insert_keeps_original_fields() {
    let store = SqliteStore::open_in_memory().unwrap();

    assert!(store.insert_if_absent(&movie(1, "Original")).unwrap());
    assert!(!store.insert_if_absent(&movie(1, "Changed")).unwrap());

    let all: Vec<Movie> = store.all_sorted_by_id().unwrap();
    assert_eq!(all, vec![movie(1, "Original")]);
  }

  #[test]
  fn test_all_sorted_by_id_ignores_insert_order() {
    let store = SqliteStore::open_in_memory().unwrap();
    for id in [42, 7, 99, 1] {
      store.insert_if_absent(&movie(id, "m")).unwrap();
    }

    let ids: Vec<i64> = store
      .all_sorted_by_id::<Movie>()
      .unwrap()
      .into_iter()
      .map(|m| m.id)
      .collect();
    assert_eq!(ids, vec![1, 7, 42, 99]);
  }

  #[test]
  fn test_empty_store_returns_empty_list() {
    let store = SqliteStore::open_in_memory().unwrap();
    assert!(store.all_sorted_by_id::<Movie>().unwrap().is_empty());
  }

  #[test]
  fn test_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("catalog.db");

    {
      let store = SqliteStore::open(&path).unwrap();
      store.insert_if_absent(&movie(5, "Kept")).unwrap();
    }

    let reopened = SqliteStore::open(&path).unwrap();
    assert!(reopened.exists::<Movie>(5).unwrap());
    assert_eq!(
      reopened.all_sorted_by_id::<Movie>().unwrap(),
      vec![movie(5, "Kept")]
    );
  }

  #[test]
  fn test_undecodable_rows_are_skipped() {
    let store = SqliteStore::open_in_memory().unwrap();
    store.insert_if_absent(&movie(2, "Good")).unwrap();
    store
      .conn()
      .unwrap()
      .execute(
        "INSERT INTO entity_cache (entity_type, entity_id, data) VALUES ('movie', 1, x'00')",
        [],
      )
      .unwrap();

    let all: Vec<Movie> = store.all_sorted_by_id().unwrap();
    assert_eq!(all, vec![movie(2, "Good")]);
  }
}
