//! iacsec CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Invalid input document
//! - 4: Configuration error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use iacsec_adapters::AdaptError;
use iacsec_graph::GraphError;

mod commands;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const INVALID_INPUT: u8 = 3;
    pub const CONFIG_ERROR: u8 = 4;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Adapt(args) => commands::adapt::execute(args).await,
        Commands::Families(args) => commands::families::execute(args).await,
        Commands::Check(args) => commands::check::execute(args).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Logs go to stderr so stdout carries only command output.
fn init_logging(verbose: bool, quiet: bool) {
    let default_directive = if verbose {
        "iacsec=debug,warn"
    } else if quiet {
        "warn"
    } else {
        "iacsec=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if let Some(graph) = cause.downcast_ref::<GraphError>() {
            return categorize_graph_error(graph);
        }
        if let Some(adapt) = cause.downcast_ref::<AdaptError>() {
            return match adapt {
                AdaptError::UnknownFamily(_) => ExitCodes::INVALID_ARGS,
                AdaptError::InvalidConfiguration(_) | AdaptError::Io(_) | AdaptError::Yaml(_) => {
                    ExitCodes::CONFIG_ERROR
                }
                AdaptError::Join(_) => ExitCodes::GENERAL_ERROR,
            };
        }
    }
    ExitCodes::GENERAL_ERROR
}

fn categorize_graph_error(e: &GraphError) -> u8 {
    match e {
        GraphError::Io(_) | GraphError::Walk(_) => ExitCodes::INVALID_ARGS,
        _ => ExitCodes::INVALID_INPUT,
    }
}
