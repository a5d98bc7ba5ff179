//! Command implementations for all saass commands

use crate::cli::Commands;
use crate::commands::dispatch::command::{Command, CommandContext};
use crate::commands::{grade, rubric, validate};
use saass_core::error::Result;

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Commands::Grade(args) => grade::execute(ctx, args),
            Commands::Validate(args) => validate::execute(ctx, args),
            Commands::Rubric(args) => rubric::execute(ctx, args),
        }
    }
}
