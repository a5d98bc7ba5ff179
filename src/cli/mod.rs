//! CLI argument parsing for saass
//!
//! Uses clap for argument parsing.
//! Supports global flags: --config, --format, --quiet, --verbose, --log-level, --log-json

pub mod format;
pub mod parse;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use parse::{parse_output_format, parse_provider};
pub use saass_core::config::EmbeddingProvider;
pub use saass_core::format::OutputFormat;

/// SAASS - semantic grading of short student answers against a rubric
#[derive(Parser, Debug)]
#[command(name = "saass")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (default: ./saass.toml, then the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (human, json)
    #[arg(long, global = true, value_parser = parse_output_format, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Debug logging and phase timings on stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log filter level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Grade every student and write the score report (default command)
    Grade(GradeArgs),

    /// Check the rubric and answer tables without grading
    Validate(ValidateArgs),

    /// Show the parsed rubric, optionally exporting it in normalized form
    Rubric(RubricArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct GradeArgs {
    /// Student answers table
    #[arg(long, short = 'a')]
    pub answers: Option<PathBuf>,

    /// Rubric table
    #[arg(long, short = 'r')]
    pub rubric: Option<PathBuf>,

    /// Where to write the score report (.xlsx or .csv, by extension)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Embedding backend (hashing, http)
    #[arg(long, value_parser = parse_provider)]
    pub embedder: Option<EmbeddingProvider>,
}

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Student answers table
    #[arg(long, short = 'a')]
    pub answers: Option<PathBuf>,

    /// Rubric table
    #[arg(long, short = 'r')]
    pub rubric: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct RubricArgs {
    /// Rubric table
    #[arg(long, short = 'r')]
    pub rubric: Option<PathBuf>,

    /// Write the normalized rubric (sorted by question) to this path
    #[arg(long)]
    pub export: Option<PathBuf>,
}
