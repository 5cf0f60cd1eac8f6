//! Merge orchestration: two movies in, one lookup-verified movie out.
//!
//! Both input records are fetched concurrently, then a bounded loop asks
//! the generation client for a title and validates it against the lookup
//! client. The loop never errors outward: after [`MergeConfig::MAX_ATTEMPTS`]
//! failed attempts it degrades to returning the first input unchanged.

use crate::config::MergeConfig;
use crate::traits::{MovieLookup, TitleSuggester};
use std::sync::Arc;
use tracing::{info, warn};

/// Coordinates the lookup and generation clients for one merge call.
pub struct MergeOrchestrator {
    lookup: Arc<dyn MovieLookup>,
    suggester: Arc<dyn TitleSuggester>,
    max_attempts: u32,
}

impl MergeOrchestrator {
    pub fn new(lookup: Arc<dyn MovieLookup>, suggester: Arc<dyn TitleSuggester>) -> Self {
        Self {
            lookup,
            suggester,
            max_attempts: MergeConfig::MAX_ATTEMPTS,
        }
    }

    /// Merge two movies into a third, lookup-verified one.
    ///
    /// Returns an identifier the lookup service resolved, or `id_a`
    /// unchanged when every attempt fails. A record fetch that fails still
    /// proceeds to generation with a `null` serialization of that side.
    pub async fn merge(&self, id_a: &str, id_b: &str) -> String {
        let (record_a, record_b) = tokio::join!(
            self.lookup.fetch_by_id(id_a),
            self.lookup.fetch_by_id(id_b)
        );

        for attempt in 1..=self.max_attempts {
            let suggestion = self
                .suggester
                .suggest_title(record_a.as_ref(), record_b.as_ref())
                .await;

            if suggestion.is_empty() {
                warn!(
                    "Generation produced no title (attempt {}/{})",
                    attempt, self.max_attempts
                );
                continue;
            }

            match self.lookup.fetch_id_by_title(&suggestion).await {
                Some(id) => {
                    info!(
                        "Merge resolved '{}' to {} on attempt {}",
                        suggestion, id, attempt
                    );
                    return id;
                }
                None => warn!(
                    "Suggested title '{}' did not resolve (attempt {}/{})",
                    suggestion, attempt, self.max_attempts
                ),
            }
        }

        info!(
            "Merge exhausted {} attempts, falling back to {}",
            self.max_attempts, id_a
        );
        id_a.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovieRecord;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// Lookup fake with a fixed record table and a scripted sequence of
    /// title-resolution outcomes.
    struct ScriptedLookup {
        records: HashMap<String, MovieRecord>,
        title_results: Mutex<VecDeque<Option<String>>>,
        title_calls: AtomicU32,
    }

    impl ScriptedLookup {
        fn new(
            records: HashMap<String, MovieRecord>,
            title_results: Vec<Option<String>>,
        ) -> Self {
            Self {
                records,
                title_results: Mutex::new(title_results.into()),
                title_calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl MovieLookup for ScriptedLookup {
        async fn fetch_by_id(&self, id: &str) -> Option<MovieRecord> {
            self.records.get(id).cloned()
        }

        async fn fetch_id_by_title(&self, _title: &str) -> Option<String> {
            self.title_calls.fetch_add(1, Ordering::SeqCst);
            self.title_results.lock().unwrap().pop_front().flatten()
        }
    }

    /// Suggester fake yielding a scripted sequence of suggestions.
    struct ScriptedSuggester {
        suggestions: Mutex<VecDeque<String>>,
        calls: AtomicU32,
        saw_missing_record: AtomicU32,
    }

    impl ScriptedSuggester {
        fn new(suggestions: Vec<&str>) -> Self {
            Self {
                suggestions: Mutex::new(suggestions.into_iter().map(String::from).collect()),
                calls: AtomicU32::new(0),
                saw_missing_record: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl TitleSuggester for ScriptedSuggester {
        async fn suggest_title(
            &self,
            movie_a: Option<&MovieRecord>,
            movie_b: Option<&MovieRecord>,
        ) -> String {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if movie_a.is_none() || movie_b.is_none() {
                self.saw_missing_record.fetch_add(1, Ordering::SeqCst);
            }
            self.suggestions
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_default()
        }
    }

    fn records() -> HashMap<String, MovieRecord> {
        let mut map = HashMap::new();
        map.insert("tt0113277".to_string(), MovieRecord::with_title("Heat"));
        map.insert("tt0122690".to_string(), MovieRecord::with_title("Ronin"));
        map
    }

    fn orchestrator(
        lookup: Arc<ScriptedLookup>,
        suggester: Arc<ScriptedSuggester>,
    ) -> MergeOrchestrator {
        MergeOrchestrator::new(lookup, suggester)
    }

    #[tokio::test]
    async fn test_merge_returns_resolved_id_on_first_attempt() {
        let lookup = Arc::new(ScriptedLookup::new(
            records(),
            vec![Some("tt0137523".to_string())],
        ));
        let suggester = Arc::new(ScriptedSuggester::new(vec!["Fight Club"]));

        let result = orchestrator(lookup.clone(), suggester.clone())
            .merge("tt0113277", "tt0122690")
            .await;

        assert_eq!(result, "tt0137523");
        assert_eq!(suggester.calls.load(Ordering::SeqCst), 1);
        assert_eq!(lookup.title_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_merge_succeeds_on_second_attempt() {
        let lookup = Arc::new(ScriptedLookup::new(
            records(),
            vec![None, Some("tt0000002".to_string())],
        ));
        let suggester = Arc::new(ScriptedSuggester::new(vec!["Made Up Movie", "Ronin"]));

        let result = orchestrator(lookup.clone(), suggester.clone())
            .merge("tt0113277", "tt0122690")
            .await;

        assert_eq!(result, "tt0000002");
        assert_eq!(suggester.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_merge_falls_back_to_first_input_after_exhaustion() {
        let lookup = Arc::new(ScriptedLookup::new(records(), vec![None, None, None]));
        let suggester = Arc::new(ScriptedSuggester::new(vec!["Nope", "Still Nope", "Nope 3"]));

        let result = orchestrator(lookup.clone(), suggester.clone())
            .merge("tt0113277", "tt0122690")
            .await;

        assert_eq!(result, "tt0113277");
        assert_eq!(suggester.calls.load(Ordering::SeqCst), 3);
        assert_eq!(lookup.title_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_empty_suggestion_consumes_attempt_without_lookup() {
        let lookup = Arc::new(ScriptedLookup::new(
            records(),
            vec![Some("tt0137523".to_string())],
        ));
        let suggester = Arc::new(ScriptedSuggester::new(vec!["", "Fight Club"]));

        let result = orchestrator(lookup.clone(), suggester.clone())
            .merge("tt0113277", "tt0122690")
            .await;

        assert_eq!(result, "tt0137523");
        assert_eq!(suggester.calls.load(Ordering::SeqCst), 2);
        // The empty first suggestion never reached the lookup service.
        assert_eq!(lookup.title_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_record_fetches_still_reach_generation() {
        // No records at all: both sides fetch as None.
        let lookup = Arc::new(ScriptedLookup::new(HashMap::new(), vec![None, None, None]));
        let suggester = Arc::new(ScriptedSuggester::new(vec!["A", "B", "C"]));

        let result = orchestrator(lookup.clone(), suggester.clone())
            .merge("tt0000001", "tt0000009")
            .await;

        assert_eq!(result, "tt0000001");
        assert_eq!(suggester.saw_missing_record.load(Ordering::SeqCst), 3);
    }
}
