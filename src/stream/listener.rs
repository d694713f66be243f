//! 流监听器：订阅运行的事件流，并串行分发 data/close/error 回调。
//!
//! Event-stream listener.

use crate::stream::decode::SseDecoder;
use crate::transport::TransportError;
use crate::types::events::StreamEvent;
use crate::Error;
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use reqwest::header::ACCEPT;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Message passed to [`StreamHandler::on_close`] when the server sends a `close` event.
pub const CLOSE_MESSAGE: &str = "Stream closed";

const EVENT_MESSAGE: &str = "message";
const EVENT_CLOSE: &str = "close";

/// Callbacks for one stream. Invoked serially on the listener task.
#[async_trait]
pub trait StreamHandler: Send + 'static {
    async fn on_data(&mut self, event: StreamEvent);
    async fn on_close(&mut self, message: &str);
    async fn on_error(&mut self, error: &Error);
}

/// [`StreamHandler`] built from three closures.
pub struct FnHandler<D, C, E> {
    on_data: D,
    on_close: C,
    on_error: E,
}

impl<D, C, E> FnHandler<D, C, E>
where
    D: FnMut(StreamEvent) + Send + 'static,
    C: FnMut(&str) + Send + 'static,
    E: FnMut(&Error) + Send + 'static,
{
    pub fn new(on_data: D, on_close: C, on_error: E) -> Self {
        Self {
            on_data,
            on_close,
            on_error,
        }
    }
}

#[async_trait]
impl<D, C, E> StreamHandler for FnHandler<D, C, E>
where
    D: FnMut(StreamEvent) + Send + 'static,
    C: FnMut(&str) + Send + 'static,
    E: FnMut(&Error) + Send + 'static,
{
    async fn on_data(&mut self, event: StreamEvent) {
        (self.on_data)(event)
    }

    async fn on_close(&mut self, message: &str) {
        (self.on_close)(message)
    }

    async fn on_error(&mut self, error: &Error) {
        (self.on_error)(error)
    }
}

/// Connection state of a listener. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ListenerState {
    Connecting = 0,
    Open = 1,
    Closed = 2,
}

impl ListenerState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => ListenerState::Connecting,
            1 => ListenerState::Open,
            _ => ListenerState::Closed,
        }
    }
}

#[derive(Debug)]
struct SharedState(AtomicU8);

impl SharedState {
    fn new() -> Self {
        Self(AtomicU8::new(ListenerState::Connecting as u8))
    }

    fn get(&self) -> ListenerState {
        ListenerState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Connecting -> Open only; a closed listener never reopens.
    fn open(&self) -> bool {
        self.0
            .compare_exchange(
                ListenerState::Connecting as u8,
                ListenerState::Open as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    fn close(&self) {
        self.0.store(ListenerState::Closed as u8, Ordering::Release);
    }
}

/// Handle to an attached listener.
///
/// Dropping the handle leaves the listener running; call [`StreamHandle::close`] to stop it.
#[derive(Debug)]
pub struct StreamHandle {
    url: String,
    state: Arc<SharedState>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl StreamHandle {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> ListenerState {
        self.state.get()
    }

    pub fn is_closed(&self) -> bool {
        self.state() == ListenerState::Closed
    }

    /// Close the connection early. Idempotent; no further callbacks are started.
    pub fn close(&self) {
        self.cancel.cancel();
        self.state.close();
    }

    /// Wait until the listener has finished (close event, error, or [`close`](Self::close)).
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            error!("Stream listener task for {} failed: {}", self.url, e);
        }
    }
}

/// Subscribes to server-sent-event streams.
#[derive(Clone)]
pub struct StreamListener {
    client: reqwest::Client,
}

impl StreamListener {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Open `stream_url` on a background task and feed its events to `handler`.
    ///
    /// Returns immediately. Must be called from within a tokio runtime.
    pub fn attach<H: StreamHandler>(&self, stream_url: &str, handler: H) -> StreamHandle {
        let state = Arc::new(SharedState::new());
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_listener(
            self.client.clone(),
            stream_url.to_string(),
            handler,
            state.clone(),
            cancel.clone(),
        ));

        StreamHandle {
            url: stream_url.to_string(),
            state,
            cancel,
            task,
        }
    }
}

async fn run_listener<H: StreamHandler>(
    client: reqwest::Client,
    url: String,
    mut handler: H,
    state: Arc<SharedState>,
    cancel: CancellationToken,
) {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!("Stream listener for {} cancelled", url);
        }
        _ = drive(&client, &url, &mut handler, &state, &cancel) => {}
    }
    state.close();
}

async fn drive<H: StreamHandler>(
    client: &reqwest::Client,
    url: &str,
    handler: &mut H,
    state: &SharedState,
    cancel: &CancellationToken,
) {
    let response = match client
        .get(url)
        .header(ACCEPT, "text/event-stream")
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            return fail(handler, state, cancel, Error::Transport(TransportError::Http(e))).await
        }
    };

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let err = Error::Http {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body: serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text)),
        };
        return fail(handler, state, cancel, err).await;
    }

    if !state.open() {
        return;
    }
    info!("Stream opened: {}", url);

    let bytes = response
        .bytes_stream()
        .map_err(|e| Error::Transport(TransportError::Http(e)));
    let mut frames = SseDecoder::decode_stream(Box::pin(bytes));

    while let Some(frame) = frames.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => return fail(handler, state, cancel, e).await,
        };
        if cancel.is_cancelled() {
            return;
        }

        match frame.event.as_str() {
            EVENT_MESSAGE => match StreamEvent::from_data(&frame.data) {
                Ok(event) => handler.on_data(event).await,
                Err(e) => warn!("Skipping stream event: {}", e),
            },
            EVENT_CLOSE => {
                info!("Stream closed by server: {}", url);
                state.close();
                if !cancel.is_cancelled() {
                    handler.on_close(CLOSE_MESSAGE).await;
                }
                return;
            }
            other => debug!("Ignoring `{}` event on {}", other, url),
        }
    }

    fail(
        handler,
        state,
        cancel,
        Error::Transport(TransportError::Other(
            "stream ended without a close event".to_string(),
        )),
    )
    .await
}

async fn fail<H: StreamHandler>(
    handler: &mut H,
    state: &SharedState,
    cancel: &CancellationToken,
    err: Error,
) {
    state.close();
    if cancel.is_cancelled() {
        debug!("Suppressing stream error after close: {}", err);
        return;
    }
    error!("Stream error: {}", err);
    handler.on_error(&err).await;
}
