//! Cinefuse - Headless library for movie collections and AI-assisted merges.
//!
//! This crate manages a small, persisted collection of movies and can
//! "merge" any two of them into a third, lookup-verified title suggested
//! by a text-generation service. It is headless: rendering, navigation,
//! and event wiring belong to the embedding application, which only reads
//! the manager's exposed state and calls its operations.
//!
//! # Example
//!
//! ```rust,ignore
//! use cinefuse_library::MovieManager;
//!
//! #[tokio::main]
//! async fn main() -> cinefuse_library::Result<()> {
//!     let manager = MovieManager::new("./cinefuse-data")?;
//!
//!     manager.add_movie("tt0133093").await?;
//!     manager.decrement_adds()?;
//!
//!     let merged = manager.merge("tt0133093", "tt0234215").await;
//!     println!("Merged into {}", merged);
//!
//!     Ok(())
//! }
//! ```

pub mod collection;
pub mod config;
pub mod error;
pub mod merge;
pub mod models;
pub mod omdb_client;
pub mod openai_client;
pub mod storage;
pub mod traits;

mod manager;

// Re-export commonly used types
pub use collection::CollectionStore;
pub use error::{CinefuseError, Result};
pub use manager::{MovieManager, MovieManagerBuilder};
pub use merge::MergeOrchestrator;
pub use models::{Movie, MovieRecord};
pub use omdb_client::OmdbClient;
pub use openai_client::OpenAiClient;
pub use storage::{SqliteStorage, StorageBackend};
pub use traits::{MovieLookup, TitleSuggester};
