//! 运行配置：默认值、YAML 文件与环境变量。
//!
//! Run configuration.
//!
//! Values are resolved in order: built-in defaults, then an optional YAML file, then
//! environment variables (the binary loads a `.env` file into the environment first):
//! - `LANGFLOW_BASE_URL`
//! - `LANGFLOW_FLOW_ID`
//! - `LANGFLOW_ID`
//! - `LANGFLOW_TOKEN` (falls back to `token`)
//! - `LANGFLOW_HTTP_TIMEOUT_SECS`

use crate::types::request::Tweaks;
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "https://api.langflow.astra.datastax.com";
pub const DEFAULT_FLOW_ID: &str = "3befb806-b6f3-4e74-8430-f618ef654cc4";
pub const DEFAULT_LANGFLOW_ID: &str = "4b2adee2-0c34-4f29-8b9a-ff1d573c8a03";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Components of the default flow; each gets an empty tweak object.
const DEFAULT_TWEAK_COMPONENTS: &[&str] = &[
    "ChatInput-uUi6s",
    "Prompt-9yPN9",
    "GroqModel-n91pv",
    "AstraDB-BJgM8",
    "ParseData-N1BXf",
    "ChatOutput-y4A36",
    "HuggingFaceInferenceAPIEmbeddings-tH0XX",
    "File-MpR3h",
    "SplitText-Iyful",
    "AstraDB-lXeCy",
    "HuggingFaceInferenceAPIEmbeddings-MQaOg",
];

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub base_url: String,
    pub flow_id: String,
    pub langflow_id: String,
    #[serde(skip_serializing)]
    pub token: Option<String>,
    pub tweaks: Tweaks,
    pub timeout_secs: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            flow_id: DEFAULT_FLOW_ID.to_string(),
            langflow_id: DEFAULT_LANGFLOW_ID.to_string(),
            token: None,
            tweaks: default_tweaks(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("base_url", &self.base_url)
            .field("flow_id", &self.flow_id)
            .field("langflow_id", &self.langflow_id)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("tweaks", &self.tweaks)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_tweaks() -> Tweaks {
    DEFAULT_TWEAK_COMPONENTS
        .iter()
        .map(|name| (name.to_string(), serde_json::json!({})))
        .collect()
}

impl RunConfig {
    /// Defaults, then `path` (if any), then the process environment; validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration_with_context(
                format!("Cannot read config file: {}", e),
                ErrorContext::new()
                    .with_details(path.display().to_string())
                    .with_source("config_loader"),
            )
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid config YAML: {}", e),
                ErrorContext::new().with_source("config_loader"),
            )
        })
    }

    /// Override fields from environment-style lookups. Unset or empty keys are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("LANGFLOW_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = get("LANGFLOW_FLOW_ID") {
            self.flow_id = v;
        }
        if let Some(v) = get("LANGFLOW_ID") {
            self.langflow_id = v;
        }
        if let Some(v) = get("LANGFLOW_TOKEN").or_else(|| get("token")) {
            self.token = Some(v);
        }
        if let Some(secs) = get("LANGFLOW_HTTP_TIMEOUT_SECS").and_then(|s| s.parse::<u64>().ok())
        {
            self.timeout_secs = secs;
        }
    }

    /// Check the base URL and required identifiers; normalizes a trailing `/` away.
    pub fn validate(&mut self) -> Result<()> {
        url::Url::parse(&self.base_url).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid base URL '{}'", self.base_url),
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(e.to_string())
                    .with_source("config_validator"),
            )
        })?;
        self.base_url = self.base_url.trim_end_matches('/').to_string();

        for (field, value) in [("flow_id", &self.flow_id), ("langflow_id", &self.langflow_id)] {
            if value.trim().is_empty() {
                return Err(Error::configuration_with_context(
                    format!("{} must not be empty", field),
                    ErrorContext::new()
                        .with_field_path(field)
                        .with_source("config_validator"),
                ));
            }
        }

        self.token()?;
        Ok(())
    }

    pub fn token(&self) -> Result<&str> {
        self.token.as_deref().ok_or_else(|| {
            Error::configuration_with_context(
                "Missing application token; set LANGFLOW_TOKEN or token",
                ErrorContext::new()
                    .with_field_path("token")
                    .with_source("config_validator"),
            )
        })
    }
}
