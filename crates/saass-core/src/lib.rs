//! SAASS Core Library
//!
//! Short-answer grading: rubric and answer loading, embedding-based
//! matching, and the score report.

pub mod answers;
pub mod config;
pub mod embedding;
pub mod error;
pub mod format;
pub mod logging;
pub mod question;
pub mod report;
pub mod rubric;
pub mod scorer;
pub mod similarity;
pub mod table;
pub mod text;
