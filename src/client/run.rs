//! 流程运行编排：发起运行，并在需要时挂接事件流。
//!
//! Flow run orchestration.

use crate::stream::{StreamHandle, StreamHandler};
use crate::types::request::{IoType, RunRequest, Tweaks};
use crate::types::response::RunResponse;
use crate::Result;
use tracing::{info, warn};

use super::core::FlowClient;

/// Parameters of one flow run.
#[derive(Debug, Clone)]
pub struct FlowRunRequest {
    pub flow_id: String,
    pub langflow_id: String,
    pub request: RunRequest,
    pub stream: bool,
}

impl FlowRunRequest {
    pub fn new(
        flow_id: impl Into<String>,
        langflow_id: impl Into<String>,
        input_value: impl Into<String>,
    ) -> Self {
        Self {
            flow_id: flow_id.into(),
            langflow_id: langflow_id.into(),
            request: RunRequest::new(input_value),
            stream: false,
        }
    }

    pub fn input_type(mut self, input_type: impl Into<IoType>) -> Self {
        self.request.input_type = input_type.into();
        self
    }

    pub fn output_type(mut self, output_type: impl Into<IoType>) -> Self {
        self.request.output_type = output_type.into();
        self
    }

    pub fn tweaks(mut self, tweaks: Tweaks) -> Self {
        self.request.tweaks = tweaks;
        self
    }

    /// Ask the server to stream incremental results.
    pub fn stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }
}

/// Outcome of [`FlowClient::run_flow`].
#[derive(Debug)]
pub struct FlowRun {
    /// The initiating response, returned whether or not a stream was attached.
    pub response: RunResponse,
    /// Listener attached to the response's stream URL, if any.
    pub stream: Option<StreamHandle>,
}

impl FlowRun {
    pub fn is_streaming(&self) -> bool {
        self.stream.is_some()
    }
}

impl FlowClient {
    /// Initiate a run and, for streaming runs, attach `handler` to the issued stream URL.
    ///
    /// Initiation failures propagate unchanged and never reach `handler`. When streaming
    /// was requested but the response carries no stream URL, no listener is attached and
    /// no error is raised; the initiating response is still returned.
    pub async fn run_flow<H: StreamHandler>(
        &self,
        run: FlowRunRequest,
        handler: H,
    ) -> Result<FlowRun> {
        let response = self
            .initiate_session(&run.flow_id, &run.langflow_id, &run.request, run.stream)
            .await?;

        if !run.stream {
            return Ok(FlowRun {
                response,
                stream: None,
            });
        }

        let stream = match response.stream_url() {
            Some(url) => {
                info!("Attaching stream listener: {}", url);
                Some(self.attach_stream(url, handler))
            }
            None => {
                warn!(
                    "Streaming requested for flow {} but the response has no stream URL",
                    run.flow_id
                );
                None
            }
        };

        Ok(FlowRun { response, stream })
    }
}
