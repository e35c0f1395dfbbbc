// Chat completion SSE stream parsing
// Author: kelexine (https://github.com/kelexine)

use crate::error::AppError;
use crate::generation::TokenStream;
use futures::stream::Stream;
use serde::Deserialize;
use tracing::{debug, warn};

/// One parsed SSE event from the chat completion stream.
enum SseEvent {
    /// A content delta to append to the output.
    Delta(String),
    /// The `[DONE]` marker: the stream is finished.
    Done,
    /// Nothing usable (empty delta, comment, unparseable chunk).
    Skip,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Parse the provider's SSE byte stream into content deltas.
///
/// Events are separated by a blank line; a final event without the trailing
/// separator is still processed when the connection closes.
pub fn parse_sse_stream<S>(byte_stream: S) -> TokenStream
where
    S: Stream<Item = reqwest::Result<bytes::Bytes>> + Send + 'static,
{
    use futures::StreamExt;

    Box::pin(async_stream::stream! {
        let mut buffer = String::new();

        futures::pin_mut!(byte_stream);

        while let Some(chunk_result) = byte_stream.next().await {
            match chunk_result {
                Ok(chunk) => {
                    buffer.push_str(&String::from_utf8_lossy(&chunk));

                    // Process complete events (ends with \n\n)
                    while let Some(event_end) = buffer.find("\n\n") {
                        let event_data = buffer[..event_end].to_string();
                        buffer = buffer[event_end + 2..].to_string();

                        match parse_sse_event(&event_data) {
                            SseEvent::Delta(text) => yield Ok(text),
                            SseEvent::Done => {
                                debug!("chat completion stream finished");
                                return;
                            }
                            SseEvent::Skip => {}
                        }
                    }
                }
                Err(e) => {
                    warn!("stream error: {}", e);
                    yield Err(AppError::Http(e));
                    return;
                }
            }
        }

        // This handles cases where the final event doesn't have a trailing \n\n
        if !buffer.trim().is_empty() {
            if let SseEvent::Delta(text) = parse_sse_event(&buffer) {
                yield Ok(text);
            }
        }
    })
}

/// Parse a single SSE event into a content delta.
fn parse_sse_event(event_data: &str) -> SseEvent {
    // SSE format: "event: <name>\ndata: <json>" or just "data: <json>"
    let Some(data) = event_data
        .lines()
        .find_map(|line| line.strip_prefix("data:"))
        .map(str::trim)
    else {
        return SseEvent::Skip;
    };

    if data.is_empty() {
        return SseEvent::Skip;
    }
    if data == "[DONE]" {
        return SseEvent::Done;
    }

    let chunk: ChatCompletionChunk = match serde_json::from_str(data) {
        Ok(chunk) => chunk,
        Err(e) => {
            warn!("failed to parse SSE JSON: {}", e);
            debug!("raw data: {}", data.chars().take(200).collect::<String>());
            return SseEvent::Skip;
        }
    };

    match chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
    {
        Some(content) if !content.is_empty() => SseEvent::Delta(content),
        _ => SseEvent::Skip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sse_event_delta() {
        let event = r#"data: {"choices":[{"delta":{"content":"Hello"}}]}"#;
        match parse_sse_event(event) {
            SseEvent::Delta(text) => assert_eq!(text, "Hello"),
            _ => panic!("expected a delta"),
        }
    }

    #[test]
    fn test_parse_sse_event_done_marker() {
        assert!(matches!(parse_sse_event("data: [DONE]"), SseEvent::Done));
    }

    #[test]
    fn test_parse_sse_event_no_data_line() {
        assert!(matches!(parse_sse_event("event: ping"), SseEvent::Skip));
    }

    #[test]
    fn test_parse_sse_event_empty_delta() {
        // The first chunk usually carries only the role, no content.
        let event = r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#;
        assert!(matches!(parse_sse_event(event), SseEvent::Skip));
    }
}
