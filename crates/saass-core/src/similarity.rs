//! Vector similarity between embeddings

use crate::bail_embedding;
use crate::error::Result;

/// Maps two embedding vectors to a bounded similarity score
pub trait Similarity {
    fn similarity(&self, a: &[f32], b: &[f32]) -> Result<f32>;
}

/// Cosine similarity, in [-1, 1]
#[derive(Debug, Clone, Copy, Default)]
pub struct CosineSimilarity;

impl Similarity for CosineSimilarity {
    fn similarity(&self, a: &[f32], b: &[f32]) -> Result<f32> {
        cosine_similarity(a, b)
    }
}

/// Cosine of the angle between `a` and `b`.
///
/// A zero vector has no direction and scores 0.0 against anything.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        bail_embedding!(
            "cannot compare embeddings of different dimensions ({} vs {})",
            a.len(),
            b.len()
        );
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot / (norm_a.sqrt() * norm_b.sqrt()))
}
