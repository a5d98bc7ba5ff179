//! Client for OpenAI-compatible `/v1/embeddings` endpoints
//!
//! Request: `{"model": "...", "input": ["text", ...]}`.
//! Response: `{"data": [{"index": 0, "embedding": [...]}, ...]}`.
//!
//! There is no retry: a transport error, non-2xx status, or malformed body
//! fails the call, and with it the grading run.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Embedder, Embedding};
use crate::bail_embedding;
use crate::config::EmbeddingConfig;
use crate::error::{Result, SaassError};

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

/// Embedder backed by a remote sentence-embedding model
pub struct HttpEmbedder {
    agent: ureq::Agent,
    url: String,
    model: String,
    api_key: Option<String>,
    batch_size: usize,
    user_agent: String,
}

impl HttpEmbedder {
    /// Create a client; the API key is read from `config.api_key_env` if set
    pub fn new(config: &EmbeddingConfig) -> Self {
        let agent_config = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_seconds)))
            .build();
        let agent: ureq::Agent = agent_config.into();

        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.is_empty());

        Self {
            agent,
            url: config.url.clone(),
            model: config.model.clone(),
            api_key,
            batch_size: config.batch_size.max(1),
            user_agent: format!("saass/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        let payload = serde_json::to_string(&EmbeddingRequest {
            model: &self.model,
            input: texts,
        })?;

        let mut request = self
            .agent
            .post(&self.url)
            .header("Content-Type", "application/json")
            .header("User-Agent", &self.user_agent);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let mut response = match request.send(payload.as_str()) {
            Ok(response) => response,
            Err(ureq::Error::StatusCode(code)) => {
                bail_embedding!("HTTP {} from {}", code, self.url)
            }
            Err(e) => bail_embedding!("request to {} failed: {}", self.url, e),
        };

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| SaassError::embedding(format!("reading {} response: {}", self.url, e)))?;

        debug!(url = %self.url, texts = texts.len(), bytes = body.len(), "embedding batch");
        parse_embedding_response(&body, texts.len())
    }
}

impl Embedder for HttpEmbedder {
    fn name(&self) -> &str {
        &self.model
    }

    fn embed(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.batch_size) {
            vectors.extend(self.embed_batch(chunk)?);
        }
        Ok(vectors)
    }
}

/// Decode a response body into vectors ordered by `index`
fn parse_embedding_response(body: &str, expected: usize) -> Result<Vec<Embedding>> {
    let mut response: EmbeddingResponse = serde_json::from_str(body)
        .map_err(|e| SaassError::embedding(format!("malformed embeddings response: {}", e)))?;

    if response.data.len() != expected {
        bail_embedding!(
            "expected {} embeddings, endpoint returned {}",
            expected,
            response.data.len()
        );
    }

    response.data.sort_by_key(|d| d.index);
    for (position, item) in response.data.iter().enumerate() {
        if item.index != position {
            bail_embedding!("embeddings response is missing index {}", position);
        }
    }

    let dimensions = response.data.first().map(|d| d.embedding.len()).unwrap_or(0);
    if response.data.iter().any(|d| d.embedding.len() != dimensions) {
        bail_embedding!("embeddings response mixes vector dimensions");
    }

    Ok(response.data.into_iter().map(|d| d.embedding).collect())
}
