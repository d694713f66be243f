//! HTTP transport for the flow-execution API.

mod http;

pub use http::{HttpTransport, TransportError};
