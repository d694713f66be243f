//! 输出汇：将运行结果与流回调渲染为文本行。
//!
//! Output sinks.
//!
//! A run's observable result is a sequence of text lines written to an [`OutputSink`].
//! The CLI uses a [`FileSink`]; tests use an [`InMemorySink`].

use crate::stream::StreamHandler;
use crate::types::events::StreamEvent;
use crate::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::io::AsyncWriteExt;
use tracing::error;

/// Destination for rendered output lines.
#[async_trait]
pub trait OutputSink: Send + Sync {
    /// Replace the whole output with `line`.
    async fn write(&self, line: &str) -> Result<()>;
    /// Append `line` to the output.
    async fn append(&self, line: &str) -> Result<()>;
}

/// Writes lines to a local file, newline-terminated. The file is created on first use.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl OutputSink for FileSink {
    async fn write(&self, line: &str) -> Result<()> {
        tokio::fs::write(&self.path, format!("{}\n", line)).await?;
        Ok(())
    }

    async fn append(&self, line: &str) -> Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(format!("{}\n", line).as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

/// In-memory sink for testing.
#[derive(Debug, Default)]
pub struct InMemorySink {
    lines: Mutex<Vec<String>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.lines().is_empty()
    }
}

#[async_trait]
impl OutputSink for InMemorySink {
    async fn write(&self, line: &str) -> Result<()> {
        let mut lines = self
            .lines
            .lock()
            .map_err(|_| Error::Io(std::io::Error::other("sink lock poisoned")))?;
        lines.clear();
        lines.push(line.to_string());
        Ok(())
    }

    async fn append(&self, line: &str) -> Result<()> {
        self.lines
            .lock()
            .map_err(|_| Error::Io(std::io::Error::other("sink lock poisoned")))?
            .push(line.to_string());
        Ok(())
    }
}

/// Stream handler that appends one line per callback to a sink:
/// `Received: {chunk}`, `Stream Closed: {message}`, `Stream Error: {error}`.
pub struct SinkHandler {
    sink: Arc<dyn OutputSink>,
}

impl SinkHandler {
    pub fn new(sink: Arc<dyn OutputSink>) -> Self {
        Self { sink }
    }

    async fn append(&self, line: String) {
        if let Err(e) = self.sink.append(&line).await {
            error!("Failed to write stream output: {}", e);
        }
    }
}

#[async_trait]
impl StreamHandler for SinkHandler {
    async fn on_data(&mut self, event: StreamEvent) {
        self.append(format!("Received: {}", event.chunk().unwrap_or_default()))
            .await
    }

    async fn on_close(&mut self, message: &str) {
        self.append(format!("Stream Closed: {}", message)).await
    }

    async fn on_error(&mut self, error: &Error) {
        self.append(format!("Stream Error: {}", error)).await
    }
}
