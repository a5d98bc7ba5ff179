//! Command dispatch logic for saass

use std::time::Instant;

use crate::cli::Cli;
use saass_core::error::{Result, SaassError};
use tracing::debug;

mod command;
mod commands;

pub use command::CommandContext;
use command::{Command, NoCommand};

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    let cwd = std::env::current_dir()
        .map_err(|e| SaassError::io_operation("read", "current directory", e))?;

    debug!(elapsed = ?start.elapsed(), cwd = %cwd.display(), "resolve_cwd");

    let ctx = CommandContext::new(cli, cwd, start);

    match &cli.command {
        None => NoCommand.execute(&ctx),
        Some(cmd) => cmd.execute(&ctx),
    }
}
