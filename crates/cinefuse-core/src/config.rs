//! Centralized configuration for the Cinefuse library.
//!
//! Service endpoints, timeouts, retry bounds, and storage key names live
//! here so the clients and the store share one source of truth.

use std::time::Duration;

/// Metadata lookup service (OMDb) configuration.
pub struct LookupConfig;

impl LookupConfig {
    pub const OMDB_API_BASE: &'static str = "https://www.omdbapi.com";
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
    /// Environment variable consulted when no key is passed to the builder.
    pub const API_KEY_ENV: &'static str = "OMDB_API_KEY";
}

/// Text-generation service (OpenAI-compatible) configuration.
pub struct GenerationConfig;

impl GenerationConfig {
    pub const OPENAI_API_BASE: &'static str = "https://api.openai.com/v1";
    pub const DEFAULT_MODEL: &'static str = "gpt-3.5-turbo";
    /// Connect timeout only; the response body is streamed and a total
    /// timeout would cut off slow generations mid-stream.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    /// Environment variable consulted when no key is passed to the builder.
    pub const API_KEY_ENV: &'static str = "OPENAI_API_KEY";

    /// Fixed system instruction constraining the model to answer with only
    /// a movie title.
    pub const SYSTEM_PROMPT: &'static str = "You are a function that ingests information about two different movies, \"Movie A\" & \"Movie B\" and returns a third movie that is most similar / relevant to the two given movies. IMPORTANT: Return just the movie Title and nothing else in the format \"Movie Title\".";
}

/// Merge orchestration configuration.
pub struct MergeConfig;

impl MergeConfig {
    /// Maximum generation requests per merge before falling back to the
    /// first input. Retries are immediate; there is no backoff.
    pub const MAX_ATTEMPTS: u32 = 3;
}

/// Collection store configuration.
pub struct StoreConfig;

impl StoreConfig {
    /// Fresh-collection value of the remaining-additions counter.
    pub const DEFAULT_ADD_SLOTS: i32 = 4;
    /// Storage slot holding the serialized collection.
    pub const MOVIES_KEY: &'static str = "movies";
    /// Storage slot holding the serialized counter.
    pub const SLOTS_KEY: &'static str = "left";
    /// Database file created under the manager's data directory.
    pub const DB_FILE_NAME: &'static str = "collection.db";
}
