//! SSE stream parsing for OpenAI-compatible streaming chat responses.
//!
//! Provider bytes arrive in arbitrary chunk boundaries, so lines are
//! reassembled through a carry-over buffer before parsing. A malformed
//! data line is skipped rather than aborting the stream; the stream ends
//! at the `[DONE]` marker or when the connection closes.

use futures::{future, Stream, StreamExt};
use std::pin::Pin;
use tracing::warn;

use studium_core::{Error, Result};

use super::types::ChatCompletionChunk;

/// Stream of chat content deltas.
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

#[derive(Default)]
struct SseState {
    buf: String,
    done: bool,
}

/// Parse an SSE byte stream into an ordered stream of content deltas.
pub fn parse_sse_stream(
    stream: impl Stream<Item = std::result::Result<bytes::Bytes, reqwest::Error>> + Send + 'static,
) -> TokenStream {
    let token_stream = stream
        .scan(SseState::default(), |state, chunk_result| {
            if state.done {
                return future::ready(None);
            }

            let mut out: Vec<Result<String>> = Vec::new();
            match chunk_result {
                Ok(bytes) => {
                    state.buf.push_str(&String::from_utf8_lossy(&bytes));
                    while let Some(pos) = state.buf.find('\n') {
                        let line: String = state.buf.drain(..=pos).collect();
                        match parse_sse_line(line.trim()) {
                            SseEvent::Content(delta) => out.push(Ok(delta)),
                            SseEvent::Done => {
                                state.done = true;
                                break;
                            }
                            SseEvent::Nothing => {}
                        }
                    }
                }
                Err(e) => {
                    out.push(Err(Error::Inference(format!("Stream error: {}", e))));
                    state.done = true;
                }
            }
            future::ready(Some(out))
        })
        .flat_map(futures::stream::iter);

    Box::pin(token_stream)
}

enum SseEvent {
    Content(String),
    Done,
    Nothing,
}

/// Parse a single complete SSE line.
fn parse_sse_line(line: &str) -> SseEvent {
    // Skip blank separators and comments
    if line.is_empty() || line.starts_with(':') {
        return SseEvent::Nothing;
    }

    let Some(data) = line.strip_prefix("data: ") else {
        return SseEvent::Nothing;
    };

    if data == "[DONE]" {
        return SseEvent::Done;
    }

    match serde_json::from_str::<ChatCompletionChunk>(data) {
        Ok(chunk) => {
            let content: String = chunk
                .choices
                .into_iter()
                .filter_map(|c| c.delta.content)
                .collect();
            if content.is_empty() {
                SseEvent::Nothing
            } else {
                SseEvent::Content(content)
            }
        }
        Err(e) => {
            // Malformed provider chunk: drop it, keep the stream alive.
            warn!(
                subsystem = "inference",
                component = "openrouter",
                op = "chat_stream",
                error = %e,
                "Skipping malformed SSE chunk"
            );
            SseEvent::Nothing
        }
    }
}

/// Streaming chat trait implemented by backends that support SSE.
#[async_trait::async_trait]
pub trait ChatStreaming: Send + Sync {
    /// Run a chat completion, returning deltas as they arrive.
    async fn chat_stream(&self, messages: &[studium_core::ChatMessage]) -> Result<TokenStream>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn bytes_stream(
        chunks: Vec<String>,
    ) -> impl Stream<Item = std::result::Result<bytes::Bytes, reqwest::Error>> {
        stream::iter(chunks.into_iter().map(|c| Ok(bytes::Bytes::from(c))))
    }

    fn delta(content: &str) -> String {
        format!(
            "data: {{\"choices\":[{{\"delta\":{{\"content\":\"{}\"}},\"finish_reason\":null}}]}}\n\n",
            content
        )
    }

    fn done() -> String {
        "data: [DONE]\n\n".to_string()
    }

    async fn collect_texts(
        stream: impl Stream<Item = std::result::Result<bytes::Bytes, reqwest::Error>>
            + Send
            + 'static,
    ) -> Vec<String> {
        parse_sse_stream(stream)
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .map(|t| t.unwrap())
            .collect()
    }

    #[tokio::test]
    async fn three_chunks_then_done_yield_three_ordered_deltas() {
        let stream = bytes_stream(vec![delta("Hel"), delta("lo "), delta("world"), done()]);
        assert_eq!(collect_texts(stream).await, vec!["Hel", "lo ", "world"]);
    }

    #[tokio::test]
    async fn nothing_is_emitted_after_done() {
        let stream = bytes_stream(vec![delta("before"), done(), delta("after")]);
        assert_eq!(collect_texts(stream).await, vec!["before"]);
    }

    #[tokio::test]
    async fn malformed_chunk_is_skipped_not_fatal() {
        let stream = bytes_stream(vec![
            delta("ok1"),
            "data: {not valid json}\n\n".to_string(),
            delta("ok2"),
            done(),
        ]);
        assert_eq!(collect_texts(stream).await, vec!["ok1", "ok2"]);
    }

    #[tokio::test]
    async fn line_split_across_chunk_boundaries_is_reassembled() {
        let full = delta("split");
        let (a, b) = full.split_at(20);
        let stream = bytes_stream(vec![a.to_string(), b.to_string(), done()]);
        assert_eq!(collect_texts(stream).await, vec!["split"]);
    }

    #[tokio::test]
    async fn comment_and_blank_lines_are_ignored() {
        let stream = bytes_stream(vec![": keep-alive\n\n".to_string(), delta("only"), done()]);
        assert_eq!(collect_texts(stream).await, vec!["only"]);
    }

    #[tokio::test]
    async fn empty_delta_produces_no_token() {
        let stream = bytes_stream(vec![
            "data: {\"choices\":[{\"delta\":{},\"finish_reason\":null}]}\n\n".to_string(),
            done(),
        ]);
        assert!(collect_texts(stream).await.is_empty());
    }
}
