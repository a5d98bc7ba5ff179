use std::cmp::Ordering;
use std::fmt;

use serde::{Serialize, Serializer};

/// Identifier of a rubric question, as written in the rubric's
/// `Question- ID` column.
///
/// The raw text is kept verbatim because it also names the answer and report
/// columns (`<id>-answer`, `<id>-Predicted Score`). Ordering puts purely
/// numeric identifiers first in numeric order (`2` before `10`), then
/// everything else lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuestionId {
    raw: String,
    numeric: Option<u64>,
}

impl QuestionId {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let numeric = if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            raw.parse().ok()
        } else {
            None
        };
        Self { raw, numeric }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Header of this question's column in the answer table
    pub fn answer_column(&self) -> String {
        format!("{}{}", self.raw, ANSWER_SUFFIX)
    }
}

/// Suffix that marks a student-answer column
pub const ANSWER_SUFFIX: &str = "-answer";

impl Ord for QuestionId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric, other.numeric) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.raw.cmp(&other.raw)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.raw.cmp(&other.raw),
        }
    }
}

impl PartialOrd for QuestionId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for QuestionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}
