//! 类型系统模块：流程运行请求、响应信封与流事件。
//!
//! # Types Module
//!
//! Wire types for the flow-execution API.
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`RunRequest`] | Body of the run-initiating `POST` |
//! | [`IoType`] | Input/output type tag (`chat` or any other server-known value) |
//! | [`Tweaks`] | Opaque per-component overrides, passed through verbatim |
//! | [`RunResponse`] | Opaque response body; `stream_url()` and `message_text()` walk the relied-upon paths |
//! | [`StreamEvent`] | One `message` payload received over the event stream |
//!
//! ## Example
//!
//! ```rust
//! use langflow_client::types::{IoType, RunRequest};
//! use serde_json::json;
//!
//! let request = RunRequest::new("What is a flow?")
//!     .output_type(IoType::Chat)
//!     .tweak("ChatInput-uUi6s", json!({}));
//! assert_eq!(request.tweaks.len(), 1);
//! ```

pub mod events;
pub mod request;
pub mod response;

pub use events::StreamEvent;
pub use request::{IoType, RunRequest, Tweaks};
pub use response::{Artifacts, ComponentOutput, ComponentOutputs, MessageBody, MessageOutput, RunResponse};
