//! Citegraph CLI binary.

use std::process::ExitCode;

use citegraph::cli::Cli;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

/// Main entry point for the citegraph CLI.
///
/// Uses tokio's `current_thread` runtime: the only async work is reading the
/// record file and writing exports. The similarity sweep runs on rayon.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // RUST_LOG wins; otherwise -v picks the level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting citegraph CLI");

    match cli.execute().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            for cause in e.chain().skip(1) {
                eprintln!("  {}: {cause}", "caused by".dimmed());
            }
            ExitCode::FAILURE
        }
    }
}
