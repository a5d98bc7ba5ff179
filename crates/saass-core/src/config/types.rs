//! Configuration type definitions

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SaassError;

/// Default model served by remote embedding endpoints
pub const DEFAULT_EMBEDDING_MODEL: &str =
    "sentence-transformers/distiluse-base-multilingual-cased-v1";

/// Default embeddings endpoint (OpenAI-compatible)
pub const DEFAULT_EMBEDDING_URL: &str = "http://localhost:8080/v1/embeddings";

/// Environment variable holding the bearer token for the endpoint
pub const DEFAULT_API_KEY_ENV: &str = "SAASS_API_KEY";

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Upper bound for `timeout_seconds`, from the file or the environment
pub const MAX_TIMEOUT_SECONDS: u64 = 600;

pub const DEFAULT_BATCH_SIZE: usize = 64;

pub const DEFAULT_DIMENSIONS: usize = 512;

/// Grader configuration (`saass.toml`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraderConfig {
    /// Input and output locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Rubric validation
    #[serde(default)]
    pub rubric: RubricConfig,

    /// Embedding model selection
    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

/// Input and output file locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_answers_path")]
    pub answers: PathBuf,

    #[serde(default = "default_rubric_path")]
    pub rubric: PathBuf,

    #[serde(default = "default_output_path")]
    pub output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            answers: default_answers_path(),
            rubric: default_rubric_path(),
            output: default_output_path(),
        }
    }
}

fn default_answers_path() -> PathBuf {
    PathBuf::from("answers.xlsx")
}

fn default_rubric_path() -> PathBuf {
    PathBuf::from("answer_sheet.xlsx")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("output.xlsx")
}

/// Rubric validation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricConfig {
    /// Scores that must have a `SCORE-<n>` column (empty = any band set)
    #[serde(default = "default_required_scores")]
    pub required_scores: Vec<u32>,
}

impl Default for RubricConfig {
    fn default() -> Self {
        Self {
            required_scores: default_required_scores(),
        }
    }
}

fn default_required_scores() -> Vec<u32> {
    vec![1, 2, 3]
}

/// Which embedding model backs the grader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    /// Offline hashed bag-of-words vectors
    #[default]
    Hashing,
    /// Remote OpenAI-compatible embeddings endpoint
    Http,
}

impl FromStr for EmbeddingProvider {
    type Err = SaassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hashing" => Ok(EmbeddingProvider::Hashing),
            "http" => Ok(EmbeddingProvider::Http),
            other => Err(SaassError::unsupported(
                "embedding provider",
                other,
                "hashing, http",
            )),
        }
    }
}

impl fmt::Display for EmbeddingProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbeddingProvider::Hashing => write!(f, "hashing"),
            EmbeddingProvider::Http => write!(f, "http"),
        }
    }
}

/// Embedding model settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub provider: EmbeddingProvider,

    /// Memoize vectors per distinct text for the whole run
    #[serde(default = "default_true")]
    pub cache: bool,

    /// Vector length of the hashing embedder
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,

    /// Apply English stemming in the hashing embedder
    #[serde(default = "default_true")]
    pub stemming: bool,

    /// Stop words for the hashing embedder, replacing the built-in list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_words: Option<Vec<String>>,

    /// Model name sent to the HTTP endpoint
    #[serde(default = "default_model")]
    pub model: String,

    /// Embeddings endpoint URL
    #[serde(default = "default_url")]
    pub url: String,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Texts per HTTP request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProvider::default(),
            cache: true,
            dimensions: DEFAULT_DIMENSIONS,
            stemming: true,
            stop_words: None,
            model: default_model(),
            url: default_url(),
            api_key_env: default_api_key_env(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_dimensions() -> usize {
    DEFAULT_DIMENSIONS
}

fn default_model() -> String {
    DEFAULT_EMBEDDING_MODEL.to_string()
}

fn default_url() -> String {
    DEFAULT_EMBEDDING_URL.to_string()
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}
