// ocli - cluster CLI session management

mod api;
mod cli;
mod config;
mod error;
mod models;
mod session;

use clap::Parser;
use error::Result;

fn main() -> Result<()> {
    // Parse CLI arguments first to get verbose flag
    let args = cli::Cli::parse();

    let log_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    // stdout carries command output, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    cli::execute(args)
}
