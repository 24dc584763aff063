//! OpenRouter (OpenAI-compatible) chat backend.
//!
//! Supports blocking and SSE-streaming chat completions, with the
//! attribution headers OpenRouter uses for app rankings.

mod backend;
mod streaming;
mod types;

pub use backend::{OpenRouterBackend, OpenRouterConfig};
pub use streaming::{parse_sse_stream, ChatStreaming, TokenStream};
pub use types::{ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse};
