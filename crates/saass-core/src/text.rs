//! Turning free-text answers into terms for the offline embedder
//!
//! Answers are short, so a single dropped word can flip the meaning.
//! Negation survives every stage: `no`/`not` are never default stop words
//! and `n't` contractions expand to a separate `not` term.

use std::collections::BTreeSet;
use std::sync::Arc;

use rust_stemmers::{Algorithm, Stemmer};

use crate::config::EmbeddingConfig;

/// Words that carry no content in a typical short answer
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is",
    "it", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these", "they",
    "this", "to", "was", "will", "with",
];

/// Splits an answer into lowercase terms, drops stop words, optionally stems
#[derive(Clone)]
pub struct AnswerTokenizer {
    stop_words: BTreeSet<String>,
    stemmer: Option<Arc<Stemmer>>,
}

impl Default for AnswerTokenizer {
    fn default() -> Self {
        Self::new(DEFAULT_STOP_WORDS.iter().copied(), true)
    }
}

impl AnswerTokenizer {
    pub fn new<'a>(stop_words: impl IntoIterator<Item = &'a str>, stemming: bool) -> Self {
        Self {
            stop_words: stop_words.into_iter().map(str::to_lowercase).collect(),
            stemmer: stemming.then(|| Arc::new(Stemmer::create(Algorithm::English))),
        }
    }

    /// `[embedding] stop_words` replaces the default list; an empty list
    /// keeps every word
    pub fn from_config(config: &EmbeddingConfig) -> Self {
        match &config.stop_words {
            Some(words) => Self::new(words.iter().map(String::as_str), config.stemming),
            None => Self::new(DEFAULT_STOP_WORDS.iter().copied(), config.stemming),
        }
    }

    pub fn terms(&self, answer: &str) -> Vec<String> {
        let lowered = answer.to_lowercase();
        let mut terms = Vec::new();

        for word in lowered.split(|c: char| !(c.is_alphanumeric() || is_apostrophe(c))) {
            let word = word.trim_matches(is_apostrophe);
            if word.is_empty() {
                continue;
            }
            match split_contraction(word) {
                Some(head) => {
                    self.push_term(&mut terms, head);
                    self.push_term(&mut terms, "not");
                }
                None => self.push_term(&mut terms, word),
            }
        }
        terms
    }

    fn push_term(&self, terms: &mut Vec<String>, word: &str) {
        let word = word
            .strip_suffix("'s")
            .or_else(|| word.strip_suffix("\u{2019}s"))
            .unwrap_or(word);
        let word: String = word.chars().filter(|c| !is_apostrophe(*c)).collect();
        if word.is_empty() || self.stop_words.contains(&word) {
            return;
        }
        match &self.stemmer {
            Some(stemmer) => terms.push(stemmer.stem(&word).into_owned()),
            None => terms.push(word),
        }
    }
}

fn is_apostrophe(c: char) -> bool {
    c == '\'' || c == '\u{2019}'
}

/// `isn't` -> `is`, `can't` -> `ca`; `None` for anything else
fn split_contraction(word: &str) -> Option<&str> {
    word.strip_suffix("n't")
        .or_else(|| word.strip_suffix("n\u{2019}t"))
}
