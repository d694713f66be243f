//! Flow run client.
//!
//! Keep the public surface small: build a [`FlowClient`], then either call
//! [`FlowClient::run_flow`] or the lower-level [`FlowClient::initiate_session`] /
//! [`FlowClient::post`]. Implementation details are split into submodules under
//! `src/client/`.

pub mod builder;
pub mod core;
pub mod run;

pub use self::builder::FlowClientBuilder;
pub use self::core::{run_endpoint, FlowClient};
pub use self::run::{FlowRun, FlowRunRequest};
