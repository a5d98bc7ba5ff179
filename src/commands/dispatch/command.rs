//! Command trait and context for dispatching commands

use std::path::PathBuf;
use std::time::Instant;

use tracing::debug;

use crate::cli::{Cli, GradeArgs};
use crate::commands;
use saass_core::config::GraderConfig;
use saass_core::error::Result;

/// Shared context for command execution
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub cwd: PathBuf,
    pub start: Instant,
}

impl<'a> CommandContext<'a> {
    pub fn new(cli: &'a Cli, cwd: PathBuf, start: Instant) -> Self {
        Self { cli, cwd, start }
    }

    /// Resolve the config file, then apply environment overrides
    pub fn load_config(&self) -> Result<GraderConfig> {
        let mut config = GraderConfig::discover(self.cli.config.as_deref(), &self.cwd)?;
        config.apply_env_overrides()?;
        debug!(
            elapsed = ?self.start.elapsed(),
            provider = %config.embedding.provider,
            "load_config"
        );
        Ok(config)
    }
}

/// Trait for commands that can be executed
pub trait Command {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// Bare `saass`: grade with configured or default paths
pub struct NoCommand;

impl Command for NoCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        commands::grade::execute(ctx, &GradeArgs::default())
    }
}
