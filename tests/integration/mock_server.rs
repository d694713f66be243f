//! Mock HTTP server setup for integration tests

use langflow_client::{Error, FlowClient, FnHandler, RunConfig, StreamEvent, StreamHandler};
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

pub const FLOW_ID: &str = "flow-1";
pub const LANGFLOW_ID: &str = "lf-1";
pub const TOKEN: &str = "test-token";
pub const RUN_PATH: &str = "/lf/lf-1/api/v1/run/flow-1";

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self { server, base_url }
    }

    /// Client pointed at the mock server
    pub fn client(&self) -> FlowClient {
        FlowClient::builder()
            .base_url(&self.base_url)
            .token(TOKEN)
            .build()
            .expect("client")
    }

    /// Run configuration pointed at the mock server, with no tweaks
    pub fn config(&self) -> RunConfig {
        RunConfig {
            base_url: self.base_url.clone(),
            flow_id: FLOW_ID.to_string(),
            langflow_id: LANGFLOW_ID.to_string(),
            token: Some(TOKEN.to_string()),
            tweaks: Default::default(),
            ..RunConfig::default()
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Mock the run endpoint for the given `stream` flag
    pub async fn mock_run(&mut self, stream: bool, status: usize, body: &Value) -> Mock {
        self.server
            .mock("POST", RUN_PATH)
            .match_query(Matcher::UrlEncoded(
                "stream".to_string(),
                stream.to_string(),
            ))
            .match_header("authorization", format!("Bearer {}", TOKEN).as_str())
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await
    }

    /// Mock an event stream (SSE); each frame gets its blank-line terminator
    pub async fn mock_event_stream(&mut self, path: &str, frames: &[&str]) -> Mock {
        let body: String = frames.iter().map(|f| format!("{}\n\n", f)).collect();
        self.server
            .mock("GET", path)
            .match_header("accept", "text/event-stream")
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(body)
            .create_async()
            .await
    }
}

/// Non-streaming response whose final message text is `text`
pub fn final_answer(text: &str) -> Value {
    json!({
        "session_id": "session-1",
        "outputs": [{
            "inputs": {"input_value": "question"},
            "outputs": [{
                "results": {"message": {"text": text}},
                "artifacts": {"message": text},
                "outputs": {"message": {"message": {"text": text}, "type": "object"}}
            }]
        }]
    })
}

/// Streaming response pointing at `stream_url`
pub fn streaming_answer(stream_url: &str) -> Value {
    json!({
        "session_id": "session-1",
        "outputs": [{
            "inputs": {"input_value": "question"},
            "outputs": [{
                "artifacts": {"stream_url": stream_url},
                "outputs": {}
            }]
        }]
    })
}

/// Records every callback as `data:{chunk}`, `close:{message}` or `error:{error}`.
#[derive(Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn handler(&self) -> impl StreamHandler {
        let data = self.calls.clone();
        let close = self.calls.clone();
        let error = self.calls.clone();
        FnHandler::new(
            move |event: StreamEvent| {
                data.lock()
                    .unwrap()
                    .push(format!("data:{}", event.chunk().unwrap_or_default()))
            },
            move |message: &str| close.lock().unwrap().push(format!("close:{}", message)),
            move |err: &Error| error.lock().unwrap().push(format!("error:{}", err)),
        )
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}
