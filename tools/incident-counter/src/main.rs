//! incident-counter: daily "days without incident" job for CI.
//!
//! Usage:
//!   incident-counter check                      # compute and post the streak
//!   incident-counter report-incident --notify   # record an incident, optionally announce it
//!   incident-counter history                    # per-day / per-month series as JSON
//!
//! Set TEST_MODE=true to print messages instead of posting to SLACK_WEBHOOK_URL.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use streak_engine::metrics::today;
use tracing::error;
use tracing_subscriber::EnvFilter;

use incident_counter::commands::{dispatch, Outcome};
use incident_counter::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    if let Outcome::History(report) = dispatch(cli, today())? {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}
