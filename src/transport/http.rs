use crate::config::DEFAULT_TIMEOUT_SECS;
use crate::{Error, ErrorContext, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use std::time::Duration;
use tracing::error;

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Authenticated JSON-over-HTTP transport bound to one base URL.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    authorization: HeaderValue,
    request_timeout: Duration,
}

impl HttpTransport {
    /// Build a transport with its own pooled client.
    ///
    /// The client carries only a connect timeout; the whole-request timeout is applied per
    /// `post`, so long-lived event streams sharing the client are not cut off.
    pub fn new(base_url: &str, token: &str, request_timeout: Option<Duration>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;
        Self::with_client(client, base_url, token, request_timeout)
    }

    /// Build a transport around an existing client (shared pools, custom TLS, mock servers).
    pub fn with_client(
        client: reqwest::Client,
        base_url: &str,
        token: &str,
        request_timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut authorization =
            HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                Error::configuration_with_context(
                    "Bearer token is not a valid header value",
                    ErrorContext::new()
                        .with_field_path("token")
                        .with_details(e.to_string())
                        .with_source("http_transport"),
                )
            })?;
        authorization.set_sensitive(true);

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            authorization,
            request_timeout: request_timeout
                .unwrap_or_else(|| Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// POST `body` as JSON to `{base_url}{endpoint}` and return the parsed JSON reply.
    ///
    /// `headers` always ends up with the bearer `Authorization` header and
    /// `Content-Type: application/json`, replacing any caller-supplied values. The reply body
    /// is parsed as JSON whatever the status; a non-success status yields [`Error::Http`].
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
        mut headers: HeaderMap,
    ) -> Result<serde_json::Value> {
        let url = format!("{}{}", self.base_url, endpoint);
        headers.insert(AUTHORIZATION, self.authorization.clone());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let payload = serde_json::to_vec(body)?;

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .timeout(self.request_timeout)
            .body(payload)
            .send()
            .await
            .map_err(|e| {
                error!("Request error: POST {} failed: {}", url, e);
                Error::Transport(TransportError::Http(e))
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            error!("Request error: reading response from {} failed: {}", url, e);
            Error::Transport(TransportError::Http(e))
        })?;
        let parsed = serde_json::from_str::<serde_json::Value>(&text);

        if !status.is_success() {
            let err = Error::Http {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body: parsed.unwrap_or(serde_json::Value::String(text)),
            };
            error!("Request error: POST {}: {}", url, err);
            return Err(err);
        }

        parsed.map_err(|e| {
            error!("Request error: POST {} returned a non-JSON body: {}", url, e);
            Error::Serialization(e)
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
