//! Server-sent-event framing (Bytes -> SseFrame).

use crate::BoxStream;
use bytes::Bytes;
use futures::{stream, StreamExt};

const FRAME_DELIMITER: &[u8] = b"\n\n";
const DEFAULT_EVENT: &str = "message";

/// One dispatched server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    /// Event type; `message` when the frame has no `event:` field.
    pub event: String,
    /// `data:` lines joined with `\n`.
    pub data: String,
}

/// Parse one blank-line-delimited block into a frame.
///
/// Comment lines (`:`) and the `id`/`retry` fields are ignored. Returns `None` for blocks
/// carrying neither an event type nor data.
pub fn parse_frame(block: &str) -> Option<SseFrame> {
    let mut event: Option<&str> = None;
    let mut data: Vec<&str> = Vec::new();

    for line in block.lines() {
        if line.is_empty() || line.starts_with(':') {
            continue;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => event = Some(value),
            "data" => data.push(value),
            _ => {}
        }
    }

    if event.is_none() && data.is_empty() {
        return None;
    }

    Some(SseFrame {
        event: event
            .filter(|e| !e.is_empty())
            .unwrap_or(DEFAULT_EVENT)
            .to_string(),
        data: data.join("\n"),
    })
}

/// Incremental SSE decoder over a byte stream.
///
/// Bytes are buffered until a full frame is available, so frames and multi-byte
/// characters may be split arbitrarily across chunks. `\r` is dropped, which turns CRLF
/// line endings into LF.
pub struct SseDecoder;

impl SseDecoder {
    pub fn decode_stream(input: BoxStream<'static, Bytes>) -> BoxStream<'static, SseFrame> {
        let stream = stream::unfold(
            (input, Vec::<u8>::new(), false),
            |(mut input, mut buf, mut eof)| async move {
                loop {
                    if let Some(idx) = find_delimiter(&buf) {
                        let block = String::from_utf8_lossy(&buf[..idx]).into_owned();
                        buf.drain(..idx + FRAME_DELIMITER.len());
                        match parse_frame(&block) {
                            Some(frame) => return Some((Ok(frame), (input, buf, eof))),
                            None => continue,
                        }
                    }

                    if eof {
                        // EOF: try the trailing, undelimited block once.
                        let rest = std::mem::take(&mut buf);
                        let block = String::from_utf8_lossy(&rest);
                        return parse_frame(&block).map(|frame| (Ok(frame), (input, buf, eof)));
                    }

                    match input.next().await {
                        Some(Ok(bytes)) => {
                            buf.extend(bytes.iter().copied().filter(|b| *b != b'\r'));
                        }
                        Some(Err(e)) => return Some((Err(e), (input, buf, eof))),
                        None => eof = true,
                    }
                }
            },
        );

        Box::pin(stream)
    }
}

fn find_delimiter(buf: &[u8]) -> Option<usize> {
    buf.windows(FRAME_DELIMITER.len())
        .position(|w| w == FRAME_DELIMITER)
}
