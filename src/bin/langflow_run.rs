//! langflow-run: run a hosted Langflow flow from the command line
//!
//! Usage:
//!   langflow-run <MESSAGE> [INPUT_TYPE] [OUTPUT_TYPE] [STREAM] [--output <path>] [--config <path>]
//!
//! The result is written to `--output` (default `output.html`). Failures are written to
//! that file as well; the exit status is non-zero only when the file cannot be written.
//! A `.env` file in the working directory is loaded before the environment is read.

use clap::Parser;
use langflow_client::app::{self, Args};
use langflow_client::{Error, FileSink};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let sink = Arc::new(FileSink::new(&args.output));

    match app::run(&args, sink).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Usage(hint)) => {
            eprintln!("{hint}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: cannot write {}: {e}", args.output.display());
            ExitCode::FAILURE
        }
    }
}
