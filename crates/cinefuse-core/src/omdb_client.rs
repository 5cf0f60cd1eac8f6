//! HTTP client for the OMDb metadata service.
//!
//! Two query shapes: lookup-by-identifier (`?i=`) returning the full
//! record, and lookup-by-title (`?t=`) returning the canonical `imdbID`.
//! OMDb signals "no match" in-band with `Response: "False"` rather than an
//! HTTP error status.

use crate::config::LookupConfig;
use crate::error::{CinefuseError, Result};
use crate::models::MovieRecord;
use crate::traits::MovieLookup;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

/// Helper to create a network error.
fn net_err(msg: String) -> CinefuseError {
    CinefuseError::Network {
        message: msg,
        cause: None,
    }
}

/// Response from a lookup-by-title query. Only the fields the client acts
/// on; `Response` is OMDb's boolean-encoded-as-string match signal.
#[derive(Debug, Deserialize)]
struct TitleLookupResponse {
    #[serde(rename = "Response")]
    response: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
}

/// Extract the identifier from a title-lookup body, honoring the no-match
/// signal.
fn imdb_id_from(body: TitleLookupResponse) -> Option<String> {
    if body.response.as_deref() == Some("False") {
        return None;
    }
    body.imdb_id
}

/// HTTP client for the OMDb API.
pub struct OmdbClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OmdbClient {
    /// Create a new client against the default OMDb endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(LookupConfig::OMDB_API_BASE, api_key)
    }

    /// Create a new client targeting the given base URL.
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let client = reqwest::Client::builder()
            .timeout(LookupConfig::REQUEST_TIMEOUT)
            .user_agent("cinefuse-library")
            .build()
            .expect("failed to build reqwest client");

        Self {
            base_url,
            api_key: api_key.into(),
            client,
        }
    }

    async fn try_fetch_by_id(&self, id: &str) -> Result<MovieRecord> {
        let url = format!(
            "{}/?apikey={}&i={}",
            self.base_url,
            self.api_key,
            urlencoding::encode(id)
        );
        debug!("Fetching movie record for {}", id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| net_err(format!("Failed to reach OMDb: {}", e)))?;

        if !response.status().is_success() {
            return Err(net_err(format!("OMDb returned {}", response.status())));
        }

        let record: MovieRecord = response
            .json()
            .await
            .map_err(|e| net_err(format!("Failed to parse OMDb record: {}", e)))?;

        Ok(record)
    }

    async fn try_fetch_id_by_title(&self, title: &str) -> Result<Option<String>> {
        let url = format!(
            "{}/?apikey={}&t={}",
            self.base_url,
            self.api_key,
            urlencoding::encode(title)
        );
        debug!("Resolving title '{}'", title);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| net_err(format!("Failed to reach OMDb: {}", e)))?;

        if !response.status().is_success() {
            return Err(net_err(format!("OMDb returned {}", response.status())));
        }

        let body: TitleLookupResponse = response
            .json()
            .await
            .map_err(|e| net_err(format!("Failed to parse OMDb title response: {}", e)))?;

        Ok(imdb_id_from(body))
    }
}

#[async_trait]
impl MovieLookup for OmdbClient {
    async fn fetch_by_id(&self, id: &str) -> Option<MovieRecord> {
        match self.try_fetch_by_id(id).await {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Lookup by id '{}' failed: {}", id, e);
                None
            }
        }
    }

    async fn fetch_id_by_title(&self, title: &str) -> Option<String> {
        match self.try_fetch_id_by_title(title).await {
            Ok(id) => id,
            Err(e) => {
                warn!("Lookup by title '{}' failed: {}", title, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_match_yields_id() {
        let body: TitleLookupResponse =
            serde_json::from_str(r#"{"Title":"The Matrix","imdbID":"tt0133093","Response":"True"}"#)
                .unwrap();
        assert_eq!(imdb_id_from(body).as_deref(), Some("tt0133093"));
    }

    #[test]
    fn test_no_match_signal_yields_none() {
        let body: TitleLookupResponse =
            serde_json::from_str(r#"{"Response":"False","Error":"Movie not found!"}"#).unwrap();
        assert_eq!(imdb_id_from(body), None);
    }

    #[test]
    fn test_missing_id_yields_none() {
        let body: TitleLookupResponse = serde_json::from_str(r#"{"Response":"True"}"#).unwrap();
        assert_eq!(imdb_id_from(body), None);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = OmdbClient::with_base_url("https://example.com/", "k");
        assert_eq!(client.base_url, "https://example.com");
    }
}
