//! Error types and exit codes for saass
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure (embedding, IO, output)
//! - 2: Usage error (bad flags/args/config values)
//! - 3: Data error (malformed rubric or answer table)

mod macros;

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the saass binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data error - malformed input tables (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur while grading
#[derive(Error, Debug)]
pub enum SaassError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human or json)")]
    UnknownFormat(String),

    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    #[error("unsupported {context}: {value} (supported: {supported})")]
    Unsupported {
        context: String,
        value: String,
        supported: String,
    },

    // Data errors (exit code 3)
    #[error("malformed rubric: {reason}")]
    MalformedRubric { reason: String },

    #[error("malformed answer table: {reason}")]
    MalformedAnswers { reason: String },

    #[error("answer table has no column `{column}` for rubric question {question}")]
    MissingAnswerColumn { question: String, column: String },

    #[error("malformed table {path:?}: {reason}")]
    MalformedTable { path: PathBuf, reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // Generic failures (exit code 1)
    #[error("embedding failed: {0}")]
    Embedding(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to {operation} {target}: {reason}")]
    FailedOperationWithTarget {
        operation: String,
        target: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

impl SaassError {
    /// Create an error for a malformed rubric
    pub fn malformed_rubric(reason: impl std::fmt::Display) -> Self {
        SaassError::MalformedRubric {
            reason: reason.to_string(),
        }
    }

    /// Create an error for a malformed answer table
    pub fn malformed_answers(reason: impl std::fmt::Display) -> Self {
        SaassError::MalformedAnswers {
            reason: reason.to_string(),
        }
    }

    /// Create an error for a failed embedding or similarity call
    pub fn embedding(reason: impl std::fmt::Display) -> Self {
        SaassError::Embedding(reason.to_string())
    }

    /// Create an error for a failed IO operation with context
    pub fn io_operation(
        operation: &str,
        path: impl std::fmt::Display,
        error: impl std::fmt::Display,
    ) -> Self {
        SaassError::FailedOperationWithTarget {
            operation: operation.to_string(),
            target: path.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        SaassError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an unsupported value
    pub fn unsupported(
        context: &str,
        value: impl std::fmt::Display,
        supported: impl std::fmt::Display,
    ) -> Self {
        SaassError::Unsupported {
            context: context.to_string(),
            value: value.to_string(),
            supported: supported.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            // Usage errors
            SaassError::UnknownFormat(_)
            | SaassError::UsageError(_)
            | SaassError::InvalidValue { .. }
            | SaassError::Unsupported { .. } => ExitCode::Usage,

            // Data errors
            SaassError::MalformedRubric { .. }
            | SaassError::MalformedAnswers { .. }
            | SaassError::MissingAnswerColumn { .. }
            | SaassError::MalformedTable { .. }
            | SaassError::Csv(_) => ExitCode::Data,

            // Generic failures
            SaassError::Embedding(_)
            | SaassError::Io(_)
            | SaassError::Json(_)
            | SaassError::Toml(_)
            | SaassError::FailedOperationWithTarget { .. }
            | SaassError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    pub fn error_type(&self) -> &'static str {
        match self {
            SaassError::UnknownFormat(_) => "unknown_format",
            SaassError::UsageError(_) => "usage_error",
            SaassError::InvalidValue { .. } => "invalid_value",
            SaassError::Unsupported { .. } => "unsupported",
            SaassError::MalformedRubric { .. } => "malformed_rubric",
            SaassError::MalformedAnswers { .. } => "malformed_answers",
            SaassError::MissingAnswerColumn { .. } => "missing_answer_column",
            SaassError::MalformedTable { .. } => "malformed_table",
            SaassError::Csv(_) => "csv_error",
            SaassError::Embedding(_) => "embedding_error",
            SaassError::Io(_) => "io_error",
            SaassError::Json(_) => "json_error",
            SaassError::Toml(_) => "toml_error",
            SaassError::FailedOperationWithTarget { .. } => "failed_operation_with_target",
            SaassError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for saass operations
pub type Result<T> = std::result::Result<T, SaassError>;
