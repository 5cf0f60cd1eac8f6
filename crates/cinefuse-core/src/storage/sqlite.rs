//! SQLite-based storage backend.

use super::StorageBackend;
use crate::error::{CinefuseError, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// SQLite-backed key-value storage.
///
/// A single `kv_slots` table in one database file. Thread-safe via an
/// internal mutex on the connection.
pub struct SqliteStorage {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStorage {
    /// Open (or create) the storage database at the given path.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CinefuseError::Io {
                message: format!("Failed to create storage directory: {}", e),
                path: Some(parent.to_path_buf()),
                source: Some(e),
            })?;
        }

        let conn = Connection::open(db_path).map_err(|e| CinefuseError::Database {
            message: format!("Failed to open storage database: {}", e),
            source: Some(e),
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
            .map_err(|e| CinefuseError::Database {
                message: format!("Failed to set pragmas: {}", e),
                source: Some(e),
            })?;

        let storage = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        storage.init_schema()?;

        Ok(storage)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv_slots (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| CinefuseError::Database {
            message: format!("Failed to initialize storage schema: {}", e),
            source: Some(e),
        })?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| CinefuseError::Database {
            message: format!("Failed to lock database: {}", e),
            source: None,
        })
    }
}

impl StorageBackend for SqliteStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| CinefuseError::Database {
                message: format!("Failed to read slot '{}': {}", key, e),
                source: Some(e),
            })?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO kv_slots (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )
        .map_err(|e| CinefuseError::Database {
            message: format!("Failed to write slot '{}': {}", key, e),
            source: Some(e),
        })?;
        debug!("Persisted slot '{}' ({} bytes)", key, value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let conn = self.lock()?;
        let removed = conn
            .execute("DELETE FROM kv_slots WHERE key = ?1", params![key])
            .map_err(|e| CinefuseError::Database {
                message: format!("Failed to remove slot '{}': {}", key, e),
                source: Some(e),
            })?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, SqliteStorage) {
        let temp_dir = TempDir::new().unwrap();
        let storage = SqliteStorage::new(temp_dir.path().join("test.db")).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_missing_key_is_none() {
        let (_temp, storage) = create_test_storage();
        assert_eq!(storage.get("movies").unwrap(), None);
    }

    #[test]
    fn test_set_and_get() {
        let (_temp, storage) = create_test_storage();

        storage.set("movies", "[]").unwrap();
        assert_eq!(storage.get("movies").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_set_overwrites() {
        let (_temp, storage) = create_test_storage();

        storage.set("left", "4").unwrap();
        storage.set("left", "3").unwrap();
        assert_eq!(storage.get("left").unwrap().as_deref(), Some("3"));
    }

    #[test]
    fn test_remove() {
        let (_temp, storage) = create_test_storage();

        storage.set("left", "4").unwrap();
        assert!(storage.remove("left").unwrap());
        assert!(!storage.remove("left").unwrap());
        assert_eq!(storage.get("left").unwrap(), None);
    }

    #[test]
    fn test_reopen_preserves_values() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        {
            let storage = SqliteStorage::new(&db_path).unwrap();
            storage.set("movies", r#"[{"id":"tt1","title":"A"}]"#).unwrap();
        }

        let storage = SqliteStorage::new(&db_path).unwrap();
        assert_eq!(
            storage.get("movies").unwrap().as_deref(),
            Some(r#"[{"id":"tt1","title":"A"}]"#)
        );
    }
}
