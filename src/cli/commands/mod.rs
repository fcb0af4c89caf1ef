//! CLI command implementations.
//!
//! Each subcommand lives in its own module and returns a [`CommandResult`]
//! carrying the process exit code: 0 for a clean run, 1 for findings, 2 for
//! operational failures (the dispatcher maps hard errors to 2).

pub mod completions;
pub mod lint;
pub mod rules;
pub mod schema;

use crate::cli::args::{Cli, Commands};
use crate::error::Result;

/// Outcome of one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandResult {
    pub exit_code: u8,
}

impl CommandResult {
    pub fn success() -> Self {
        Self { exit_code: 0 }
    }

    pub fn failure(exit_code: u8) -> Self {
        Self { exit_code }
    }
}

/// Route a parsed invocation to its command.
pub fn dispatch(cli: &Cli) -> Result<CommandResult> {
    match &cli.command {
        Commands::Lint(args) => lint::LintCommand::new(args.clone()).execute(cli.no_color),
        Commands::Rules(args) => rules::execute(args),
        Commands::Schema => schema::execute(),
        Commands::Completions(args) => completions::execute(args),
    }
}
