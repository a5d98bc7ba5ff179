//! SAASS - Semantic Automated Answer Scoring System
//!
//! Grades free-text student answers by embedding them and matching each one
//! against a rubric of scored exemplar answers.

mod cli;
mod commands;

use std::process::ExitCode;
use std::time::Instant;

use clap::error::ErrorKind;
use clap::Parser;

use cli::{Cli, OutputFormat};
use saass_core::error::{ExitCode as SaassExitCode, SaassError};
use saass_core::logging;

fn main() -> ExitCode {
    let start = Instant::now();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return reject_arguments(err),
    };

    if let Err(e) = logging::init_tracing(cli.verbose, cli.log_level.as_deref(), cli.log_json) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }
    tracing::debug!(elapsed = ?start.elapsed(), "parse_args");

    match commands::dispatch::run(&cli, start) {
        Ok(()) => exit_with(SaassExitCode::Success),
        Err(e) => report_failure(&cli, &e),
    }
}

/// Handle a clap parse failure.
///
/// `Cli.format` is unavailable when parsing fails, so JSON intent is read
/// from the raw arguments. Help and version requests always go to clap.
fn reject_arguments(err: clap::Error) -> ExitCode {
    let informational = matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion);
    if informational || !json_requested(std::env::args().skip(1)) {
        err.exit();
    }

    let error = usage_error_from(&err);
    eprintln!("{}", error.to_json());
    exit_with(error.exit_code())
}

fn usage_error_from(err: &clap::Error) -> SaassError {
    match err.kind() {
        ErrorKind::ValueValidation
        | ErrorKind::InvalidValue
        | ErrorKind::InvalidSubcommand
        | ErrorKind::UnknownArgument
        | ErrorKind::MissingRequiredArgument
        | ErrorKind::ArgumentConflict => SaassError::UsageError(err.to_string()),
        _ => SaassError::Other(err.to_string()),
    }
}

/// Whether `--format json` / `--format=json` appears before any `--`
fn json_requested(args: impl IntoIterator<Item = String>) -> bool {
    let mut args = args.into_iter().take_while(|arg| arg != "--");
    while let Some(arg) = args.next() {
        let value = match arg.strip_prefix("--format") {
            Some("") => args.next(),
            Some(inline) => inline.strip_prefix('=').map(str::to_string),
            None => None,
        };
        if value.is_some_and(|v| v.eq_ignore_ascii_case("json")) {
            return true;
        }
    }
    false
}

fn report_failure(cli: &Cli, error: &SaassError) -> ExitCode {
    match cli.format {
        OutputFormat::Json => eprintln!("{}", error.to_json()),
        OutputFormat::Human if !cli.quiet => eprintln!("error: {}", error),
        OutputFormat::Human => {}
    }
    exit_with(error.exit_code())
}

fn exit_with(code: SaassExitCode) -> ExitCode {
    ExitCode::from(code as u8)
}
