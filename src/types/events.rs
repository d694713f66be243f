//! Stream event payloads.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload of one `message` event on a run's event stream.
///
/// The payload is opaque JSON; only `chunk` has a dedicated accessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamEvent(Value);

impl StreamEvent {
    pub fn new(payload: Value) -> Self {
        Self(payload)
    }

    /// Parse the `data` field of an SSE message.
    pub fn from_data(data: &str) -> Result<Self> {
        serde_json::from_str(data)
            .map(Self)
            .map_err(|source| Error::Parse {
                payload: data.to_string(),
                source,
            })
    }

    /// Incremental text fragment, when the payload carries one.
    pub fn chunk(&self) -> Option<&str> {
        self.0.get("chunk").and_then(Value::as_str)
    }

    pub fn payload(&self) -> &Value {
        &self.0
    }

    pub fn into_payload(self) -> Value {
        self.0
    }
}
