//! Embedding models: text in, fixed-length vectors out
//!
//! The grader never talks to a model directly. It receives an [`Embedder`]
//! so tests can substitute deterministic fakes and the binary can pick a
//! backend from configuration.

mod cache;
mod hashing;
mod http;

pub use cache::CachedEmbedder;
pub use hashing::HashingEmbedder;
pub use http::HttpEmbedder;

use tracing::info;

use crate::bail_invalid;
use crate::config::{EmbeddingConfig, EmbeddingProvider};
use crate::error::{Result, SaassError};
use crate::text::AnswerTokenizer;

/// A dense embedding vector
pub type Embedding = Vec<f32>;

/// Anything that maps text to embedding vectors
pub trait Embedder {
    /// Short name used in logs and reports
    fn name(&self) -> &str;

    /// Embed every text, returning one vector per input in input order
    fn embed(&self, texts: &[&str]) -> Result<Vec<Embedding>>;

    /// Embed a single text
    fn embed_one(&self, text: &str) -> Result<Embedding> {
        self.embed(&[text])?
            .into_iter()
            .next()
            .ok_or_else(|| SaassError::embedding(format!("{} returned no vector", self.name())))
    }
}

impl<E: Embedder + ?Sized> Embedder for Box<E> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn embed(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        (**self).embed(texts)
    }
}

/// Build the embedder described by `config`, wrapped for caching and metrics
pub fn build_embedder(config: &EmbeddingConfig) -> Result<CachedEmbedder<Box<dyn Embedder>>> {
    config_check(config)?;

    let inner: Box<dyn Embedder> = match config.provider {
        EmbeddingProvider::Hashing => Box::new(HashingEmbedder::new(
            config.dimensions,
            AnswerTokenizer::from_config(config),
        )),
        EmbeddingProvider::Http => Box::new(HttpEmbedder::new(config)),
    };

    info!(
        provider = %config.provider,
        embedder = inner.name(),
        cache = config.cache,
        "embedding model ready"
    );

    Ok(if config.cache {
        CachedEmbedder::new(inner)
    } else {
        CachedEmbedder::passthrough(inner)
    })
}

fn config_check(config: &EmbeddingConfig) -> Result<()> {
    if config.dimensions == 0 {
        bail_invalid!("embedding.dimensions", config.dimensions);
    }
    if config.batch_size == 0 {
        bail_invalid!("embedding.batch_size", config.batch_size);
    }
    Ok(())
}
