use std::cell::RefCell;
use std::collections::HashMap;

use super::{Embedder, Embedding};
use crate::bail_embedding;
use crate::error::{Result, SaassError};
use crate::logging::EmbeddingMetrics;

/// Memoizes vectors per exact text for the lifetime of a run.
///
/// Rubric exemplars are embedded once per student answer; with the cache
/// each distinct exemplar reaches the model once. Results are identical to
/// calling the inner embedder directly. [`CachedEmbedder::passthrough`] keeps
/// the metrics but never stores vectors.
pub struct CachedEmbedder<E> {
    inner: E,
    enabled: bool,
    vectors: RefCell<HashMap<String, Embedding>>,
    metrics: EmbeddingMetrics,
}

impl<E: Embedder> CachedEmbedder<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            enabled: true,
            vectors: RefCell::new(HashMap::new()),
            metrics: EmbeddingMetrics::new(),
        }
    }

    pub fn passthrough(inner: E) -> Self {
        Self {
            enabled: false,
            ..Self::new(inner)
        }
    }

    pub fn metrics(&self) -> &EmbeddingMetrics {
        &self.metrics
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    fn call_inner(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        let vectors = self.inner.embed(texts)?;
        self.metrics.record_model_call(texts.len() as u64);
        if vectors.len() != texts.len() {
            bail_embedding!(
                "{} returned {} vectors for {} texts",
                self.inner.name(),
                vectors.len(),
                texts.len()
            );
        }
        Ok(vectors)
    }
}

impl<E: Embedder> Embedder for CachedEmbedder<E> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn embed(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        if !self.enabled {
            return self.call_inner(texts);
        }

        let mut missing: Vec<&str> = Vec::new();
        {
            let cached = self.vectors.borrow();
            for text in texts {
                if cached.contains_key(*text) {
                    self.metrics.record_cache_hit();
                } else if !missing.contains(text) {
                    self.metrics.record_cache_miss();
                    missing.push(text);
                }
            }
        }

        if !missing.is_empty() {
            let fresh = self.call_inner(&missing)?;
            let mut cached = self.vectors.borrow_mut();
            for (text, vector) in missing.iter().zip(fresh) {
                cached.insert((*text).to_string(), vector);
            }
        }

        let cached = self.vectors.borrow();
        texts
            .iter()
            .map(|text| match cached.get(*text) {
                Some(vector) => Ok(vector.clone()),
                None => Err(SaassError::embedding(format!("no cached vector for {:?}", text))),
            })
            .collect()
    }
}
