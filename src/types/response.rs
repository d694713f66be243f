//! Run response envelope.
//!
//! Only two paths are relied upon:
//! - `outputs[0].outputs[0].artifacts.stream_url` (streaming runs)
//! - `outputs[0].outputs[0].outputs.message.message.text` (final answer)
//!
//! The body is kept as opaque JSON and those paths are walked on access, so `null`
//! entries or unexpected shapes elsewhere in the body never fail decoding. A missing or
//! malformed relied-upon segment surfaces as [`Error::Schema`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level reply to a run request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunResponse(Value);

/// Typed view of `outputs[0].outputs[0]`; see [`RunResponse::first_component`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<Artifacts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<ComponentOutputs>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Artifacts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentOutputs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<MessageOutput>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<MessageBody>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The innermost message. Older servers send a bare string here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageBody {
    Text(String),
    Object {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
}

impl MessageBody {
    pub fn text(&self) -> Option<&str> {
        match self {
            MessageBody::Text(s) => Some(s.as_str()),
            MessageBody::Object { text, .. } => text.as_deref(),
        }
    }
}

const PATH_FLOW: &str = "outputs[0]";
const PATH_COMPONENT: &str = "outputs[0].outputs[0]";
const PATH_OUTPUTS: &str = "outputs[0].outputs[0].outputs";
const PATH_MESSAGE: &str = "outputs[0].outputs[0].outputs.message";
const PATH_MESSAGE_BODY: &str = "outputs[0].outputs[0].outputs.message.message";
const PATH_TEXT: &str = "outputs[0].outputs[0].outputs.message.message.text";

/// `null` counts as absent.
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn segment<'a>(value: Option<&'a Value>, path: &str) -> Result<&'a Value> {
    present(value).ok_or_else(|| Error::schema(path))
}

impl RunResponse {
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(Self(value))
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(self.0.clone())
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn session_id(&self) -> Option<&str> {
        self.0.get("session_id").and_then(Value::as_str)
    }

    fn component_value(&self) -> Result<&Value> {
        let flow = segment(self.0.get("outputs").and_then(|o| o.get(0)), PATH_FLOW)?;
        segment(flow.get("outputs").and_then(|o| o.get(0)), PATH_COMPONENT)
    }

    /// Decode `outputs[0].outputs[0]` into its typed view.
    pub fn first_component(&self) -> Result<ComponentOutput> {
        let component = self.component_value()?;
        serde_json::from_value(component.clone()).map_err(|_| Error::schema(PATH_COMPONENT))
    }

    /// Server-issued stream URL; present only for streaming runs.
    pub fn stream_url(&self) -> Option<&str> {
        let component = self.component_value().ok()?;
        present(component.get("artifacts"))?
            .get("stream_url")
            .and_then(Value::as_str)
    }

    /// Final answer text of a non-streaming run.
    ///
    /// Fails with [`Error::Schema`] naming the first missing path segment.
    pub fn message_text(&self) -> Result<&str> {
        let component = self.component_value()?;
        let outputs = segment(component.get("outputs"), PATH_OUTPUTS)?;
        let message = segment(outputs.get("message"), PATH_MESSAGE)?;
        let body = segment(message.get("message"), PATH_MESSAGE_BODY)?;
        body.as_str()
            .or_else(|| body.get("text").and_then(Value::as_str))
            .ok_or_else(|| Error::schema(PATH_TEXT))
    }
}
