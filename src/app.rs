//! Command-line run logic behind the `langflow-run` binary.
//!
//! Output contract:
//! - non-streaming success: the sink is overwritten with `Final Output: {text}`
//! - streaming: one appended line per stream callback (see [`SinkHandler`])
//! - any failure after the input was accepted: the sink is overwritten with
//!   `Main Error: {error}`
//!
//! Only a missing message or a failing sink are returned as errors.

use crate::client::{FlowClient, FlowRunRequest};
use crate::config::RunConfig;
use crate::sink::{OutputSink, SinkHandler};
use crate::types::request::IoType;
use crate::{Error, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

pub const USAGE_HINT: &str =
    "Please run with the message as an argument: langflow-run \"user_message\"";

pub const DEFAULT_OUTPUT_PATH: &str = "output.html";

#[derive(Debug, Clone, Parser)]
#[command(name = "langflow-run", version, about = "Run a hosted Langflow flow and write the result to a file")]
pub struct Args {
    /// Message sent as the flow's input value; may start with `-`
    #[arg(value_name = "MESSAGE", allow_hyphen_values = true)]
    pub message: Option<String>,

    /// Input type (default: chat)
    #[arg(value_name = "INPUT_TYPE", allow_hyphen_values = true)]
    pub input_type: Option<String>,

    /// Output type (default: chat)
    #[arg(value_name = "OUTPUT_TYPE", allow_hyphen_values = true)]
    pub output_type: Option<String>,

    /// Pass the literal `true` to stream results
    #[arg(value_name = "STREAM", allow_hyphen_values = true)]
    pub stream: Option<String>,

    /// Extra positional arguments; accepted and ignored
    #[arg(value_name = "IGNORED", hide = true)]
    pub ignored: Vec<String>,

    /// File the result is written to
    #[arg(long, short, default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    /// YAML config file (base_url, flow_id, langflow_id, tweaks, timeout_secs)
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

impl Args {
    pub fn stream_enabled(&self) -> bool {
        self.stream.as_deref() == Some("true")
    }

    fn io_type(value: &Option<String>) -> IoType {
        value.as_deref().map(IoType::from).unwrap_or_default()
    }
}

/// Load configuration from `--config` and the environment, then run.
pub async fn run(args: &Args, sink: Arc<dyn OutputSink>) -> Result<()> {
    let message = require_message(args)?;
    match RunConfig::load(args.config.as_deref()) {
        Ok(config) => finish(execute(message, args, &config, sink.clone()).await, sink).await,
        Err(e) => finish(Err(e), sink).await,
    }
}

/// Run with an already-resolved configuration.
pub async fn run_with_config(
    args: &Args,
    config: &RunConfig,
    sink: Arc<dyn OutputSink>,
) -> Result<()> {
    let message = require_message(args)?;
    finish(execute(message, args, config, sink.clone()).await, sink).await
}

fn require_message(args: &Args) -> Result<&str> {
    args.message
        .as_deref()
        .ok_or_else(|| Error::Usage(USAGE_HINT.to_string()))
}

async fn finish(outcome: Result<()>, sink: Arc<dyn OutputSink>) -> Result<()> {
    match outcome {
        Ok(()) => Ok(()),
        Err(e) => sink.write(&format!("Main Error: {}", e)).await,
    }
}

async fn execute(
    message: &str,
    args: &Args,
    config: &RunConfig,
    sink: Arc<dyn OutputSink>,
) -> Result<()> {
    let client = FlowClient::from_config(config)?;
    let stream = args.stream_enabled();

    let request = FlowRunRequest::new(&config.flow_id, &config.langflow_id, message)
        .input_type(Args::io_type(&args.input_type))
        .output_type(Args::io_type(&args.output_type))
        .tweaks(config.tweaks.clone())
        .stream(stream);

    let run = client
        .run_flow(request, SinkHandler::new(sink.clone()))
        .await?;

    if stream {
        if let Some(handle) = run.stream {
            handle.join().await;
        } else {
            debug!("Streaming run finished without a stream to follow");
        }
        return Ok(());
    }

    let text = run.response.message_text()?;
    sink.write(&format!("Final Output: {}", text)).await
}
