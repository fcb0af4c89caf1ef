//! CLI argument definitions.
//!
//! All arguments are defined with clap's derive macros; the entry point is
//! the [`Cli`] struct.

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// oaslint - structural linter for API description documents.
#[derive(Debug, Parser)]
#[command(name = "oaslint")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Lint a document
    Lint(LintArgs),

    /// List available rules
    Rules(RulesArgs),

    /// Print the JSON Schema of the configuration file
    Schema,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Output format for lint results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Human,
    Json,
    Sarif,
}

/// Arguments for the `lint` command.
#[derive(Debug, Clone, clap::Args)]
pub struct LintArgs {
    /// Path of the document to lint
    pub document: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub format: FormatArg,

    /// Path to a configuration file (overrides discovery)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Apply available fixes, prompting where input is needed
    #[arg(long)]
    pub fix: bool,

    /// Skip fixes that would require prompting
    #[arg(long, requires = "fix")]
    pub non_interactive: bool,

    /// Treat warnings as failures
    #[arg(long)]
    pub strict: bool,

    /// Do not resolve references into other documents
    #[arg(long)]
    pub no_follow: bool,

    /// Directory for caching fetched remote documents
    #[arg(long, env = "OASLINT_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,
}

/// Arguments for the `rules` command.
#[derive(Debug, Clone, clap::Args)]
pub struct RulesArgs {
    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub format: FormatArg,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
