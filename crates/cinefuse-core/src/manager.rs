//! The movie manager facade and its builder.
//!
//! `MovieManager` is the surface a UI layer consumes: a read-only view of
//! the collection and counter, plus the add/clear/decrement/lookup/merge
//! operations. The builder wires the real OMDb and OpenAI clients (keys
//! from parameters or the environment) and SQLite storage, and accepts
//! injected implementations at every seam for tests.

use crate::collection::CollectionStore;
use crate::config::{GenerationConfig, LookupConfig, StoreConfig};
use crate::error::{CinefuseError, Result};
use crate::merge::MergeOrchestrator;
use crate::models::{Movie, MovieRecord};
use crate::omdb_client::OmdbClient;
use crate::openai_client::OpenAiClient;
use crate::storage::{SqliteStorage, StorageBackend};
use crate::traits::{MovieLookup, TitleSuggester};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Entry point for collection and merge operations.
pub struct MovieManager {
    store: CollectionStore,
    lookup: Arc<dyn MovieLookup>,
    orchestrator: MergeOrchestrator,
}

impl MovieManager {
    /// Create a manager with default clients and storage under `data_dir`.
    ///
    /// API keys are resolved from `OMDB_API_KEY` and `OPENAI_API_KEY`.
    /// Use [`MovieManager::builder`] for more control.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::builder(data_dir).build()
    }

    /// Start building a manager rooted at `data_dir`.
    pub fn builder(data_dir: impl Into<PathBuf>) -> MovieManagerBuilder {
        MovieManagerBuilder::new(data_dir)
    }

    /// Snapshot of the collection, in insertion order.
    pub fn movies(&self) -> Vec<Movie> {
        self.store.movies()
    }

    /// How many more movies may be added before the UI-level limit.
    pub fn remaining_adds(&self) -> i32 {
        self.store.remaining_adds()
    }

    /// Fetch the movie's record, append it to the collection, and persist.
    ///
    /// A failed lookup still appends the movie, with an empty title; the
    /// add is never rejected. Does not touch the counter; consuming a slot
    /// is a separate caller action ([`MovieManager::decrement_adds`]).
    pub async fn add_movie(&self, movie_id: &str) -> Result<Movie> {
        let record = self.lookup.fetch_by_id(movie_id).await;
        let movie = Movie {
            id: movie_id.to_string(),
            title: record.map(|r| r.title).unwrap_or_default(),
        };
        self.store.append(movie.clone())?;
        Ok(movie)
    }

    /// Consume one addition slot. The counter may go negative.
    pub fn decrement_adds(&self) -> Result<i32> {
        self.store.decrement_slots()
    }

    /// Empty the collection and reset the counter, deleting the snapshot.
    pub fn clear_movies(&self) -> Result<()> {
        self.store.clear()
    }

    /// Resolve an identifier to its descriptive record.
    pub async fn fetch_movie_by_id(&self, movie_id: &str) -> Option<MovieRecord> {
        self.lookup.fetch_by_id(movie_id).await
    }

    /// Resolve a free-text title to a canonical identifier.
    pub async fn fetch_movie_id(&self, title: &str) -> Option<String> {
        self.lookup.fetch_id_by_title(title).await
    }

    /// Merge two movies into a third, lookup-verified one.
    ///
    /// Returns the resolved identifier, or `id_a` unchanged when no
    /// suggestion validates within the attempt bound. The result is not
    /// added to the collection; the caller decides that.
    pub async fn merge(&self, id_a: &str, id_b: &str) -> String {
        self.orchestrator.merge(id_a, id_b).await
    }
}

/// Builder for configuring [`MovieManager`] initialization.
///
/// # Example
///
/// ```rust,ignore
/// use cinefuse_library::MovieManager;
///
/// let manager = MovieManager::builder("./cinefuse-data")
///     .omdb_api_key("...")
///     .openai_api_key("...")
///     .build()?;
/// ```
pub struct MovieManagerBuilder {
    data_dir: PathBuf,
    omdb_api_key: Option<String>,
    openai_api_key: Option<String>,
    generation_model: Option<String>,
    lookup: Option<Arc<dyn MovieLookup>>,
    suggester: Option<Arc<dyn TitleSuggester>>,
    storage: Option<Arc<dyn StorageBackend>>,
}

impl MovieManagerBuilder {
    /// Create a new builder rooted at `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            omdb_api_key: None,
            openai_api_key: None,
            generation_model: None,
            lookup: None,
            suggester: None,
            storage: None,
        }
    }

    /// API key for the metadata lookup service.
    ///
    /// Falls back to the `OMDB_API_KEY` environment variable.
    pub fn omdb_api_key(mut self, key: impl Into<String>) -> Self {
        self.omdb_api_key = Some(key.into());
        self
    }

    /// API key for the text-generation service.
    ///
    /// Falls back to the `OPENAI_API_KEY` environment variable.
    pub fn openai_api_key(mut self, key: impl Into<String>) -> Self {
        self.openai_api_key = Some(key.into());
        self
    }

    /// Override the generation model id (default: `gpt-3.5-turbo`).
    pub fn generation_model(mut self, model: impl Into<String>) -> Self {
        self.generation_model = Some(model.into());
        self
    }

    /// Use the given lookup client instead of the OMDb default.
    pub fn with_lookup_client(mut self, lookup: Arc<dyn MovieLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    /// Use the given generation client instead of the OpenAI default.
    pub fn with_generation_client(mut self, suggester: Arc<dyn TitleSuggester>) -> Self {
        self.suggester = Some(suggester);
        self
    }

    /// Use the given storage backend instead of SQLite under `data_dir`.
    pub fn with_storage(mut self, storage: Arc<dyn StorageBackend>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Assemble the manager, restoring persisted state.
    ///
    /// Fails with a `Config` error when a real client is needed and no API
    /// key can be resolved; injected clients need no keys.
    pub fn build(self) -> Result<MovieManager> {
        let storage = match self.storage {
            Some(storage) => storage,
            None => Arc::new(SqliteStorage::new(
                self.data_dir.join(StoreConfig::DB_FILE_NAME),
            )?),
        };

        let lookup: Arc<dyn MovieLookup> = match self.lookup {
            Some(lookup) => lookup,
            None => {
                let key = resolve_key(self.omdb_api_key, LookupConfig::API_KEY_ENV, "OMDb")?;
                Arc::new(OmdbClient::new(key))
            }
        };

        let suggester: Arc<dyn TitleSuggester> = match self.suggester {
            Some(suggester) => suggester,
            None => {
                let key = resolve_key(
                    self.openai_api_key,
                    GenerationConfig::API_KEY_ENV,
                    "the generation service",
                )?;
                let mut client = OpenAiClient::new(key);
                if let Some(model) = self.generation_model {
                    client = client.with_model(model);
                }
                Arc::new(client)
            }
        };

        let store = CollectionStore::new(storage)?;
        let orchestrator = MergeOrchestrator::new(Arc::clone(&lookup), suggester);

        debug!("MovieManager ready under {}", self.data_dir.display());

        Ok(MovieManager {
            store,
            lookup,
            orchestrator,
        })
    }
}

/// Use the explicit key if given, otherwise consult the environment.
fn resolve_key(explicit: Option<String>, env_var: &str, service: &str) -> Result<String> {
    explicit
        .or_else(|| std::env::var(env_var).ok())
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| CinefuseError::Config {
            message: format!(
                "No API key for {}; pass one to the builder or set {}",
                service, env_var
            ),
        })
}
