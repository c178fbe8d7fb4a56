//! Command-line interface.

pub mod check;
pub mod completions;
pub mod output;
pub mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Stackform - config and secret materialization for observability stacks.
#[derive(Parser)]
#[command(
    name = "stackform",
    about = "Materializes config artifacts and secret files from a single .env source of truth",
    version
)]
pub struct Cli {
    /// Deployment manifest
    #[arg(short, long, global = true, default_value = "stackform.toml")]
    pub manifest: PathBuf,

    /// Environment definition file (overrides the manifest's env_file)
    #[arg(short, long, global = true)]
    pub env_file: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Run the full pipeline: validate, materialize secrets, render templates
    Run,

    /// Preflight and validate only, write nothing
    Check,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Execute a command.
pub fn execute(cli: Cli) -> crate::error::Result<()> {
    match cli.command {
        Command::Run => run::execute(&cli.manifest, cli.env_file.as_deref()),
        Command::Check => check::execute(&cli.manifest, cli.env_file.as_deref()),
        Command::Completions { shell } => completions::execute(shell),
    }
}
