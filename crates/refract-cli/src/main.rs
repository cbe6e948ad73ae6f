//! # refract-schema-tests entry point
//!
//! Parses arguments, initializes logging on stderr, and maps the run
//! result onto the process exit status.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use refract_cli::{run, Cli, EXIT_LOAD_ERROR};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.to_config();
    tracing::debug!(?config, "starting run");

    let mut stdout = std::io::stdout().lock();
    match run(&config, &mut stdout) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_LOAD_ERROR)
        }
    }
}
