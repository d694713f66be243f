use crate::client::core::FlowClient;
use crate::config::{RunConfig, DEFAULT_BASE_URL};
use crate::stream::StreamListener;
use crate::transport::HttpTransport;
use crate::{Error, ErrorContext, Result};
use std::sync::Arc;
use std::time::Duration;

/// Builder for creating clients with custom configuration.
///
/// Keep this surface area small and predictable.
pub struct FlowClientBuilder {
    base_url: String,
    token: Option<String>,
    timeout: Option<Duration>,
    http_client: Option<reqwest::Client>,
}

impl FlowClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout: None,
            http_client: None,
        }
    }

    /// Seed the builder from a loaded [`RunConfig`].
    pub fn from_config(config: &RunConfig) -> Self {
        let mut builder = Self::new()
            .base_url(config.base_url.clone())
            .timeout(Duration::from_secs(config.timeout_secs.max(1)));
        builder.token = config.token.clone();
        builder
    }

    /// Base URL of the flow-execution API (a mock server URL in tests).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Application token sent as `Authorization: Bearer {token}`.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Whole-request timeout for run requests. Event streams are not subject to it.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Reuse an existing `reqwest::Client` for both run requests and event streams.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn build(self) -> Result<FlowClient> {
        let token = self.token.ok_or_else(|| {
            Error::configuration_with_context(
                "Missing application token",
                ErrorContext::new()
                    .with_field_path("token")
                    .with_source("client_builder"),
            )
        })?;

        let transport = match self.http_client {
            Some(client) => HttpTransport::with_client(client, &self.base_url, &token, self.timeout)?,
            None => HttpTransport::new(&self.base_url, &token, self.timeout)?,
        };
        let listener = StreamListener::new(transport.client().clone());

        Ok(FlowClient {
            transport: Arc::new(transport),
            listener,
        })
    }
}

impl Default for FlowClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
