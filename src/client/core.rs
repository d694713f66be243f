use crate::config::RunConfig;
use crate::stream::{StreamHandle, StreamHandler, StreamListener};
use crate::transport::HttpTransport;
use crate::types::{request::RunRequest, response::RunResponse};
use crate::Result;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::builder::FlowClientBuilder;

/// Correlation id header attached to every run request.
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Authenticated client for the flow-execution API.
#[derive(Clone)]
pub struct FlowClient {
    pub(crate) transport: Arc<HttpTransport>,
    pub(crate) listener: StreamListener,
}

/// Path of the run endpoint, relative to the base URL.
pub fn run_endpoint(flow_id: &str, langflow_id: &str, stream: bool) -> String {
    format!(
        "/lf/{}/api/v1/run/{}?stream={}",
        langflow_id, flow_id, stream
    )
}

impl FlowClient {
    pub fn builder() -> FlowClientBuilder {
        FlowClientBuilder::new()
    }

    pub fn from_config(config: &RunConfig) -> Result<Self> {
        FlowClientBuilder::from_config(config).build()
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// POST `body` to `{base_url}{endpoint}`; see [`HttpTransport::post`].
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
        headers: HeaderMap,
    ) -> Result<serde_json::Value> {
        self.transport.post(endpoint, body, headers).await
    }

    /// Start a run of `flow_id` and decode the typed response envelope.
    pub async fn initiate_session(
        &self,
        flow_id: &str,
        langflow_id: &str,
        request: &RunRequest,
        stream: bool,
    ) -> Result<RunResponse> {
        let endpoint = run_endpoint(flow_id, langflow_id, stream);
        let request_id = Uuid::new_v4().to_string();

        let mut headers = HeaderMap::new();
        if let Ok(v) = HeaderValue::from_str(&request_id) {
            headers.insert(REQUEST_ID_HEADER, v);
        }

        info!(
            request_id = %request_id,
            flow_id = %flow_id,
            stream = stream,
            "Initiating flow run"
        );
        let value = self.post(&endpoint, request, headers).await?;
        RunResponse::from_value(value)
    }

    /// Resolve a server-issued stream URL; relative URLs are joined onto the base URL.
    pub fn resolve_stream_url(&self, stream_url: &str) -> String {
        if url::Url::parse(stream_url).is_ok() {
            return stream_url.to_string();
        }
        url::Url::parse(self.base_url())
            .and_then(|base| base.join(stream_url))
            .map(|u| u.to_string())
            .unwrap_or_else(|_| stream_url.to_string())
    }

    /// Attach a listener to a server-issued stream URL.
    pub fn attach_stream<H: StreamHandler>(&self, stream_url: &str, handler: H) -> StreamHandle {
        self.listener
            .attach(&self.resolve_stream_url(stream_url), handler)
    }
}
