//! Client seams consumed by the merge orchestrator and the manager facade.
//!
//! Both traits absorb their own failures: a lookup that cannot be served
//! returns `None` and a generation that cannot be served returns an empty
//! string. Callers never see transport errors through these seams, and
//! "not found" is indistinguishable from "request failed". Tests supply
//! scripted implementations; the real ones live in [`crate::omdb_client`]
//! and [`crate::openai_client`].

use crate::models::MovieRecord;
use async_trait::async_trait;

/// Resolves movie identifiers and titles against the metadata service.
#[async_trait]
pub trait MovieLookup: Send + Sync {
    /// Fetch the descriptive record for an identifier.
    ///
    /// `None` means "unknown movie, not retryable within this call";
    /// transport failures and unparseable bodies fold into it.
    async fn fetch_by_id(&self, id: &str) -> Option<MovieRecord>;

    /// Resolve a free-text title to a canonical identifier.
    ///
    /// `None` covers both a no-match response from the service and any
    /// transport failure.
    async fn fetch_id_by_title(&self, title: &str) -> Option<String>;
}

/// Produces a movie-title suggestion from two (possibly missing) records.
#[async_trait]
pub trait TitleSuggester: Send + Sync {
    /// Suggest a title for the merge of `movie_a` and `movie_b`.
    ///
    /// Each invocation is an independent request with no memory of prior
    /// calls. An empty string means the suggestion failed.
    async fn suggest_title(
        &self,
        movie_a: Option<&MovieRecord>,
        movie_b: Option<&MovieRecord>,
    ) -> String;
}
