//! Command-line interface.
//!
//! - [`args`] - argument definitions using clap derive macros
//! - [`commands`] - command implementations

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, CompletionsArgs, FormatArg, LintArgs, RulesArgs};
pub use commands::{dispatch, CommandResult};
