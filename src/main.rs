//! Stackform - config and secret materialization for observability stacks.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use stackform::cli::output;
use stackform::cli::{execute, Cli};
use stackform::error::{Error, PreconditionError};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("STACKFORM_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("stackform=debug")
        } else {
            EnvFilter::new("stackform=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).without_time())
        .init();

    if let Err(e) = execute(cli) {
        let suggestion = match &e {
            Error::Precondition(PreconditionError::ManifestNotFound(_)) => {
                Some("create stackform.toml describing the deployment plan")
            }
            Error::Precondition(PreconditionError::EnvFileNotFound(_)) => {
                Some("copy stack.env.example to stack.env and fill in the settings")
            }
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
