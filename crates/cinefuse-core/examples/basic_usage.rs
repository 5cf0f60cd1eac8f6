//! Basic usage example - add two movies and merge them.
//!
//! Needs `OMDB_API_KEY` and `OPENAI_API_KEY` in the environment.

use cinefuse_library::{MovieManager, Result};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    if std::env::var("OMDB_API_KEY").is_err() || std::env::var("OPENAI_API_KEY").is_err() {
        eprintln!("Set OMDB_API_KEY and OPENAI_API_KEY to run this example.");
        return Ok(());
    }

    // Get path from args or use a local data directory
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "./cinefuse-data".to_string());

    let manager = MovieManager::new(&path)?;

    // The Matrix and Ghost in the Shell
    let first = manager.add_movie("tt0133093").await?;
    manager.decrement_adds()?;
    let second = manager.add_movie("tt0113568").await?;
    manager.decrement_adds()?;

    println!("Collection ({} slots left):", manager.remaining_adds());
    for movie in manager.movies() {
        println!("  - {} ({})", movie.title, movie.id);
    }

    let merged = manager.merge(&first.id, &second.id).await;
    println!("Merged into: {}", merged);

    if let Some(record) = manager.fetch_movie_by_id(&merged).await {
        println!("  {} ({})", record.title, record.year.unwrap_or_default());
    }

    Ok(())
}
