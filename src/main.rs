//! Silo - tag-aware secret and parameter store CLI.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use silo::cli::output;
use silo::cli::{execute, Cli};
use silo::error::{Error, StoreError};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("SILO_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("silo=debug")
        } else {
            EnvFilter::new("silo=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).without_time())
        .init();

    match execute(cli.command, cli.timeout) {
        Ok(completion) => std::process::exit(completion.exit_code()),
        Err(e) => {
            // Format error with suggestion if available
            let suggestion = match &e {
                Error::Store(StoreError::NotAuthorized(_)) => {
                    Some("check your AWS credentials and permissions")
                }
                Error::Store(StoreError::TransientUnavailable(_)) => {
                    Some("the operation is idempotent; retry it as-is")
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
}
