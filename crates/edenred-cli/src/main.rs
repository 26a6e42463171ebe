//! Edenred balance CLI.
//!
//! Signs in to Edenred Finland and prints the lunch and Virike balances as
//! text or JSON.

mod cli;
mod config;
mod output;

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use edenred_core::ApiClient;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;
use config::{Config, UsageError};

/// Exit code for invalid command-line input, matching clap's own
const USAGE_EXIT_CODE: u8 = 2;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug).
    // Logs go to stderr so stdout only carries balances.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            if e.downcast_ref::<UsageError>().is_some() {
                ExitCode::from(USAGE_EXIT_CODE)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_cli(cli)?;
    let deadline = config.deadline()?;

    let client = ApiClient::new(config.base_url.as_deref(), config.timeout)?;
    info!(base_url = client.base_url(), timeout = ?config.timeout, "Fetching balances");

    let balances = client
        .fetch_balances(&config.credentials, deadline)
        .await
        .inspect_err(|e| debug!(stage = ?e.stage(), "Balance lookup failed"))?;

    let rendered = output::render(&balances, config.format)?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
