//! opensearch-mcp binary entry point.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use opensearch_mcp::cli::{Cli, execute};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let env_loaded = match &cli.env_file {
        Some(path) => dotenvy::from_path(path).map(|()| Some(path.clone())),
        None => Ok(dotenvy::dotenv().ok()),
    };

    // stdout carries MCP frames and command output, so logs go to stderr.
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match env_loaded {
        Ok(Some(path)) => tracing::debug!(path = %path.display(), "loaded environment file"),
        Ok(None) => {}
        Err(e) => {
            let _ = writeln!(io::stderr(), "Error: failed to load environment file: {e}");
            return ExitCode::FAILURE;
        }
    }

    match execute(&cli) {
        Ok(output) => {
            let mut stdout = io::stdout().lock();
            let _ = stdout.write_all(output.as_bytes());
            let _ = stdout.flush();
            ExitCode::SUCCESS
        }
        Err(e) => {
            let _ = writeln!(io::stderr(), "Error: {e}");
            ExitCode::FAILURE
        }
    }
}
