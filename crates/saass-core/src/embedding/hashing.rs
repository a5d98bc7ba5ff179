use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

use super::{Embedder, Embedding};
use crate::error::Result;
use crate::text::AnswerTokenizer;

/// Offline bag-of-words embedder.
///
/// Terms are hashed into a fixed number of dimensions with SHA-256, so the
/// same text produces the same vector on every platform and run. Vectors are
/// L2-normalized; text with no content words maps to the zero vector.
#[derive(Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
    tokenizer: AnswerTokenizer,
    name: String,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize, tokenizer: AnswerTokenizer) -> Self {
        Self {
            dimensions: dimensions.max(1),
            tokenizer,
            name: format!("hashing-{}", dimensions.max(1)),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embed_text(&self, text: &str) -> Embedding {
        let mut vector = vec![0.0f32; self.dimensions];

        // Ordered so the float sums are identical between runs
        let mut term_counts: BTreeMap<String, u32> = BTreeMap::new();
        for term in self.tokenizer.terms(text) {
            *term_counts.entry(term).or_insert(0) += 1;
        }

        for (term, count) in &term_counts {
            let slot = (term_hash(term) % self.dimensions as u64) as usize;
            vector[slot] += *count as f32;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }
        vector
    }
}

fn term_hash(term: &str) -> u64 {
    Sha256::digest(term.as_bytes())
        .iter()
        .take(8)
        .fold(0u64, |acc, b| (acc << 8) | u64::from(*b))
}

impl Embedder for HashingEmbedder {
    fn name(&self) -> &str {
        &self.name
    }

    fn embed(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}
