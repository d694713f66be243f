//! # langflow-client
//!
//! Async client for running hosted Langflow flows.
//!
//! ## Overview
//!
//! A flow run is a single authenticated `POST` against the flow-execution API. When the
//! caller asks for streaming and the service hands back a stream URL, a
//! [`StreamListener`] subscribes to it and forwards server-sent events to a
//! [`StreamHandler`] until the server closes the stream, an error occurs, or the caller
//! closes the returned [`StreamHandle`].
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`FlowClient`] | Authenticated run client and orchestrator |
//! | [`StreamListener`] | Server-sent-event subscriber with data/close/error callbacks |
//! | [`RunResponse`] | Opaque response envelope with typed accessors for the relied-upon paths |
//! | [`OutputSink`] | Destination for rendered results (file, in-memory) |
//! | [`RunConfig`] | Defaults, YAML file and environment configuration |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use langflow_client::{Error, FlowClient, FlowRunRequest, FnHandler, StreamEvent};
//!
//! #[tokio::main]
//! async fn main() -> langflow_client::Result<()> {
//!     let client = FlowClient::builder()
//!         .base_url("https://api.langflow.astra.datastax.com")
//!         .token("your-application-token")
//!         .build()?;
//!
//!     let request = FlowRunRequest::new("flow-id", "langflow-id", "Hello!").stream(true);
//!     let handler = FnHandler::new(
//!         |event: StreamEvent| println!("{}", event.chunk().unwrap_or_default()),
//!         |message: &str| println!("closed: {message}"),
//!         |error: &Error| eprintln!("error: {error}"),
//!     );
//!
//!     let run = client.run_flow(request, handler).await?;
//!     if let Some(stream) = run.stream {
//!         stream.join().await;
//!     }
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod client;
pub mod config;
pub mod sink;
pub mod stream;
pub mod transport;
pub mod types;

pub use client::{FlowClient, FlowClientBuilder, FlowRun, FlowRunRequest};
pub use config::RunConfig;
pub use sink::{FileSink, InMemorySink, OutputSink, SinkHandler};
pub use stream::{FnHandler, ListenerState, StreamHandle, StreamHandler, StreamListener};
pub use types::{
    events::StreamEvent,
    request::{IoType, RunRequest, Tweaks},
    response::RunResponse,
};

use futures::Stream;
use std::pin::Pin;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// A unified pinned, boxed stream that emits `Result<T>`
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = Result<T>> + Send + 'a>>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
