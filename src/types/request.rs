//! Run request body.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Per-component overrides keyed by component name (e.g. `"ChatInput-uUi6s"`).
///
/// Keys and values are never inspected; the server decides what they mean.
pub type Tweaks = serde_json::Map<String, serde_json::Value>;

/// Input/output type of a flow run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IoType {
    #[default]
    Chat,
    /// Any other type the server understands (`text`, `any`, ...).
    Other(String),
}

impl IoType {
    pub fn as_str(&self) -> &str {
        match self {
            IoType::Chat => "chat",
            IoType::Other(s) => s.as_str(),
        }
    }
}

impl From<String> for IoType {
    fn from(s: String) -> Self {
        if s == "chat" {
            IoType::Chat
        } else {
            IoType::Other(s)
        }
    }
}

impl From<&str> for IoType {
    fn from(s: &str) -> Self {
        IoType::from(s.to_string())
    }
}

impl From<IoType> for String {
    fn from(t: IoType) -> Self {
        match t {
            IoType::Chat => "chat".to_string(),
            IoType::Other(s) => s,
        }
    }
}

impl FromStr for IoType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(IoType::from(s))
    }
}

impl fmt::Display for IoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON body sent to `/lf/{langflow_id}/api/v1/run/{flow_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRequest {
    pub input_value: String,
    pub input_type: IoType,
    pub output_type: IoType,
    #[serde(default)]
    pub tweaks: Tweaks,
}

impl RunRequest {
    pub fn new(input_value: impl Into<String>) -> Self {
        Self {
            input_value: input_value.into(),
            input_type: IoType::Chat,
            output_type: IoType::Chat,
            tweaks: Tweaks::new(),
        }
    }

    pub fn input_type(mut self, input_type: impl Into<IoType>) -> Self {
        self.input_type = input_type.into();
        self
    }

    pub fn output_type(mut self, output_type: impl Into<IoType>) -> Self {
        self.output_type = output_type.into();
        self
    }

    pub fn tweaks(mut self, tweaks: Tweaks) -> Self {
        self.tweaks = tweaks;
        self
    }

    pub fn tweak(mut self, component: impl Into<String>, value: serde_json::Value) -> Self {
        self.tweaks.insert(component.into(), value);
        self
    }
}
