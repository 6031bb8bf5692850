//! # shopkeep
//!
//! Command line front end for the store: catalog upkeep, selling and
//! sales reports against one SQLite file.
//!
//! ## Examples
//! ```bash
//! shopkeep item add --name Shirt --price 10 --quantity 5
//! shopkeep item import ./items.json
//! shopkeep sell --line 1:3 --line 2:1 --pay 50
//! shopkeep sales report --year 2024 --json
//! ```
//!
//! Logs go to stderr; set `RUST_LOG` to change the level.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod error;
mod output;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = cli::Cli::parse();
    let json = cli.json();

    match cli.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::report_error(&err, json);
            ExitCode::from(err.exit_code())
        }
    }
}

/// Initializes the tracing subscriber for logging.
///
/// Uses `RUST_LOG` when set, otherwise `info,shopkeep=debug,sqlx=warn`.
/// Output goes to stderr so stdout carries only command results.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,shopkeep=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
