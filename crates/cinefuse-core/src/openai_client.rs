//! Streaming HTTP client for an OpenAI-compatible chat-completions API.
//!
//! Each suggestion is one independent request: a fixed system instruction
//! plus a user message embedding both serialized movie records. The
//! response arrives as server-sent-event lines (`data: {json}`) terminated
//! by `data: [DONE]`; every delivered `delta.content` fragment is appended
//! in delivery order, empty fragments included, to form the suggested
//! title.

use crate::config::GenerationConfig;
use crate::error::{CinefuseError, Result};
use crate::models::MovieRecord;
use crate::traits::TitleSuggester;
use async_trait::async_trait;
use futures::StreamExt;
use serde::Deserialize;
use tracing::{debug, warn};

/// Helper to create a network error.
fn net_err(msg: String) -> CinefuseError {
    CinefuseError::Network {
        message: msg,
        cause: None,
    }
}

/// One parsed chunk of the streamed completion.
#[derive(Debug, Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    delta: ChunkDelta,
}

#[derive(Debug, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Event decoded from one line of the SSE body.
#[derive(Debug, PartialEq)]
enum StreamEvent {
    /// A delivered text fragment (may be empty).
    Fragment(String),
    /// End-of-stream marker.
    Done,
}

/// Decode a single SSE line.
///
/// Returns `None` for lines that carry no fragment: blanks, SSE comments,
/// role-only deltas, and unparseable payloads.
fn parse_stream_line(line: &str) -> Option<StreamEvent> {
    let payload = line.trim().strip_prefix("data:")?.trim();
    if payload == "[DONE]" {
        return Some(StreamEvent::Done);
    }

    let chunk: ChatCompletionChunk = serde_json::from_str(payload).ok()?;
    chunk
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.delta.content)
        .map(StreamEvent::Fragment)
}

/// Build the user message embedding both serialized records.
///
/// A record that failed to fetch serializes as JSON `null` and still goes
/// into the prompt.
fn build_merge_prompt(movie_a: Option<&MovieRecord>, movie_b: Option<&MovieRecord>) -> String {
    let a = serde_json::to_string(&movie_a).unwrap_or_else(|_| "null".to_string());
    let b = serde_json::to_string(&movie_b).unwrap_or_else(|_| "null".to_string());
    format!("Movie A: {}. Movie B: {}", a, b)
}

/// Streaming client for an OpenAI-compatible chat-completions endpoint.
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiClient {
    /// Create a new client against the default OpenAI endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(GenerationConfig::OPENAI_API_BASE, api_key)
    }

    /// Create a new client targeting the given base URL.
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        // Connect timeout only -- the body is streamed and a total timeout
        // would cut off slow generations mid-stream.
        let client = reqwest::Client::builder()
            .connect_timeout(GenerationConfig::CONNECT_TIMEOUT)
            .user_agent("cinefuse-library")
            .build()
            .expect("failed to build reqwest client");

        Self {
            base_url,
            api_key: api_key.into(),
            model: GenerationConfig::DEFAULT_MODEL.to_string(),
            client,
        }
    }

    /// Override the generation model id.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Issue one streamed completion request and concatenate the delivered
    /// fragments.
    async fn try_suggest(&self, content: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": GenerationConfig::SYSTEM_PROMPT },
                { "role": "user", "content": content },
            ],
            "stream": true,
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| net_err(format!("Failed to reach generation service: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body: String = response.text().await.unwrap_or_default();
            return Err(net_err(format!(
                "Generation service returned {}: {}",
                status, body
            )));
        }

        let mut stream = response.bytes_stream();
        let mut buf = String::new();
        let mut title = String::new();

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result
                .map_err(|e| net_err(format!("Generation stream interrupted: {}", e)))?;
            buf.push_str(&String::from_utf8_lossy(&chunk));

            // Lines can straddle chunk boundaries; only consume complete ones.
            while let Some(pos) = buf.find('\n') {
                let line: String = buf.drain(..=pos).collect();
                match parse_stream_line(&line) {
                    Some(StreamEvent::Fragment(fragment)) => title.push_str(&fragment),
                    Some(StreamEvent::Done) => return Ok(title),
                    None => {}
                }
            }
        }

        // A final line may arrive without a trailing newline.
        if let Some(StreamEvent::Fragment(fragment)) = parse_stream_line(&buf) {
            title.push_str(&fragment);
        }

        Ok(title)
    }
}

#[async_trait]
impl TitleSuggester for OpenAiClient {
    async fn suggest_title(
        &self,
        movie_a: Option<&MovieRecord>,
        movie_b: Option<&MovieRecord>,
    ) -> String {
        let content = build_merge_prompt(movie_a, movie_b);

        match self.try_suggest(&content).await {
            Ok(title) => {
                debug!("Generation suggested '{}'", title);
                title
            }
            Err(e) => {
                warn!("Generation request failed: {}", e);
                String::new()
            }
        }
    }
}
