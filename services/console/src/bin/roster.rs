//! services/console/src/bin/roster.rs

use clap::Parser;
use console_lib::{
    cli::{execute, Cli},
    config::Config,
    context::AppContext,
    error::ConsoleError,
    render,
};
use roster_core::ports::PortError;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // --- 1. Load Configuration ---
    let config = match Config::from_env_with(cli.api_url.as_deref()) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::from(2);
        }
    };

    // --- 2. Set Up Logging (stderr, so stdout only carries rendered views) ---
    let verbosity = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let level = config.log_level.max(verbosity);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!(api = %config.api_base_url, "Configuration loaded.");

    // --- 3. Build the Shared Context & Run the Command ---
    let ctx = match AppContext::from_config(config) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!(error = %e, "Failed to initialize the HTTP client");
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match execute(cli.command, &ctx).await {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => report(&e),
    }
}

/// Prints the failure and picks the exit code for it.
fn report(err: &ConsoleError) -> ExitCode {
    match err {
        ConsoleError::Port(PortError::Validation(errors)) => {
            eprintln!("Please fix the following fields:");
            eprint!("{}", render::validation_errors(errors));
            ExitCode::from(2)
        }
        ConsoleError::Config(_) | ConsoleError::Input(_) => {
            eprintln!("{}", err);
            ExitCode::from(2)
        }
        _ => {
            error!(error = %err, "Command failed");
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
