//! The persisted collection state machine.
//!
//! Owns the ordered movie list and the remaining-additions counter, and
//! mirrors every mutation to durable storage as a full-snapshot overwrite
//! under two independent keys. State is restored from storage once, at
//! construction; absent or unreadable snapshots mean a fresh start.
//!
//! The store is not designed for concurrent mutation from multiple
//! callers; the surrounding caller serializes add/clear/decrement.

use crate::config::StoreConfig;
use crate::error::Result;
use crate::models::Movie;
use crate::storage::StorageBackend;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

struct CollectionState {
    movies: Vec<Movie>,
    remaining_adds: i32,
}

/// Process-wide collection state, mirrored to durable storage.
pub struct CollectionStore {
    storage: Arc<dyn StorageBackend>,
    state: RwLock<CollectionState>,
}

impl CollectionStore {
    /// Restore the store from its persisted snapshot.
    ///
    /// Missing keys start the collection empty with the default counter.
    /// An unreadable snapshot is logged and treated the same way.
    pub fn new(storage: Arc<dyn StorageBackend>) -> Result<Self> {
        let movies = match storage.get(StoreConfig::MOVIES_KEY)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(movies) => movies,
                Err(e) => {
                    warn!("Stored collection is unreadable, starting empty: {}", e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        let remaining_adds = match storage.get(StoreConfig::SLOTS_KEY)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(n) => n,
                Err(e) => {
                    warn!("Stored counter is unreadable, using default: {}", e);
                    StoreConfig::DEFAULT_ADD_SLOTS
                }
            },
            None => StoreConfig::DEFAULT_ADD_SLOTS,
        };

        debug!(
            "Restored collection: {} movies, {} additions left",
            movies.len(),
            remaining_adds
        );

        Ok(Self {
            storage,
            state: RwLock::new(CollectionState {
                movies,
                remaining_adds,
            }),
        })
    }

    /// Append a movie and persist the updated collection.
    pub fn append(&self, movie: Movie) -> Result<()> {
        let mut state = self.write_state();
        state.movies.push(movie);
        self.storage.set(
            StoreConfig::MOVIES_KEY,
            &serde_json::to_string(&state.movies)?,
        )?;
        info!("Collection now holds {} movies", state.movies.len());
        Ok(())
    }

    /// Decrement the remaining-additions counter and persist it.
    ///
    /// No floor: the counter may go negative if the caller keeps
    /// decrementing.
    pub fn decrement_slots(&self) -> Result<i32> {
        let mut state = self.write_state();
        state.remaining_adds -= 1;
        self.storage.set(
            StoreConfig::SLOTS_KEY,
            &serde_json::to_string(&state.remaining_adds)?,
        )?;
        Ok(state.remaining_adds)
    }

    /// Delete both persisted keys and reset in-memory state.
    pub fn clear(&self) -> Result<()> {
        self.storage.remove(StoreConfig::MOVIES_KEY)?;
        self.storage.remove(StoreConfig::SLOTS_KEY)?;

        let mut state = self.write_state();
        state.movies.clear();
        state.remaining_adds = StoreConfig::DEFAULT_ADD_SLOTS;
        info!("Collection cleared");
        Ok(())
    }

    /// Snapshot of the collection, in insertion order.
    pub fn movies(&self) -> Vec<Movie> {
        self.read_state().movies.clone()
    }

    /// Current value of the remaining-additions counter.
    pub fn remaining_adds(&self) -> i32 {
        self.read_state().remaining_adds
    }

    fn read_state(&self) -> RwLockReadGuard<'_, CollectionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, CollectionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStorage;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, CollectionStore) {
        let temp_dir = TempDir::new().unwrap();
        let storage = Arc::new(SqliteStorage::new(temp_dir.path().join("test.db")).unwrap());
        let store = CollectionStore::new(storage).unwrap();
        (temp_dir, store)
    }

    fn movie(id: &str, title: &str) -> Movie {
        Movie {
            id: id.into(),
            title: title.into(),
        }
    }

    #[test]
    fn test_fresh_store_defaults() {
        let (_temp, store) = create_test_store();
        assert!(store.movies().is_empty());
        assert_eq!(store.remaining_adds(), 4);
    }

    #[test]
    fn test_append_grows_by_one_and_preserves_order() {
        let (_temp, store) = create_test_store();

        store.append(movie("tt1", "First")).unwrap();
        store.append(movie("tt2", "Second")).unwrap();

        let movies = store.movies();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].id, "tt1");
        assert_eq!(movies[1].id, "tt2");
    }

    #[test]
    fn test_persisted_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        {
            let storage = Arc::new(SqliteStorage::new(&db_path).unwrap());
            let store = CollectionStore::new(storage).unwrap();
            store.append(movie("tt0133093", "The Matrix")).unwrap();
            store.decrement_slots().unwrap();
        }

        let storage = Arc::new(SqliteStorage::new(&db_path).unwrap());
        let restored = CollectionStore::new(storage).unwrap();

        let movies = restored.movies();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0], movie("tt0133093", "The Matrix"));
        assert_eq!(restored.remaining_adds(), 3);
    }

    #[test]
    fn test_clear_resets_state_and_storage() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let storage = Arc::new(SqliteStorage::new(&db_path).unwrap());
        let store = CollectionStore::new(storage.clone()).unwrap();
        store.append(movie("tt1", "First")).unwrap();
        store.decrement_slots().unwrap();

        store.clear().unwrap();
        assert!(store.movies().is_empty());
        assert_eq!(store.remaining_adds(), 4);

        // Re-initialization sees no snapshot at all.
        let reopened = CollectionStore::new(Arc::new(SqliteStorage::new(&db_path).unwrap())).unwrap();
        assert!(reopened.movies().is_empty());
        assert_eq!(reopened.remaining_adds(), 4);
    }

    #[test]
    fn test_counter_may_go_negative() {
        let (_temp, store) = create_test_store();

        for _ in 0..5 {
            store.decrement_slots().unwrap();
        }
        assert_eq!(store.remaining_adds(), -1);
    }

    #[test]
    fn test_corrupt_snapshot_starts_fresh() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Arc::new(SqliteStorage::new(temp_dir.path().join("test.db")).unwrap());
        storage.set(StoreConfig::MOVIES_KEY, "not json").unwrap();
        storage.set(StoreConfig::SLOTS_KEY, "also not json").unwrap();

        let store = CollectionStore::new(storage).unwrap();
        assert!(store.movies().is_empty());
        assert_eq!(store.remaining_adds(), 4);
    }
}
