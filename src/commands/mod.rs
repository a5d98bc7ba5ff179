//! CLI commands for saass

pub mod dispatch;
pub mod grade;
pub mod rubric;
pub mod validate;
