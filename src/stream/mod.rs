//! Server-sent-event streaming: framing and the run stream listener.

pub mod decode;
mod listener;

pub use decode::{parse_frame, SseDecoder, SseFrame};
pub use listener::{
    FnHandler, ListenerState, StreamHandle, StreamHandler, StreamListener, CLOSE_MESSAGE,
};
