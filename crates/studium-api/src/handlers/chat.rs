//! Chat handler: blocking and SSE-streaming completions, optionally
//! grounded in one of the caller's documents.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::debug;

use studium_core::{ChatMessage, ContextDocument, ResponseStyle};
use studium_inference::prompts;

use crate::auth::UserId;
use crate::error::ApiError;
use crate::services::assemble_context;
use crate::state::AppState;

fn default_stream() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    #[serde(default = "default_stream")]
    pub stream: bool,
    #[serde(rename = "responseType", default)]
    pub response_type: ResponseStyle,
    #[serde(rename = "contextDocument", default)]
    pub context_document: Option<ContextDocument>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub content: String,
}

/// Build the full message list: system prompt, history, then the user
/// message (wrapped in document context when one is referenced).
async fn build_messages(
    state: &AppState,
    user: &UserId,
    request: &ChatRequest,
) -> Result<Vec<ChatMessage>, ApiError> {
    let mut messages = vec![ChatMessage::system(prompts::chat_system_prompt(
        request.response_type,
    ))];
    messages.extend(request.history.iter().cloned());

    let user_message = match &request.context_document {
        Some(document) => {
            let context = assemble_context(
                &state.db.notes,
                &state.db.quizzes,
                &state.db.flashcards,
                user.as_str(),
                document,
            )
            .await?;
            prompts::chat_context_prompt(&context, &request.message)
        }
        None => request.message.clone(),
    };
    messages.push(ChatMessage::user(user_message));

    Ok(messages)
}

/// Wrap a content delta in the wire shape streamed back to the client.
fn delta_event(content: &str) -> Event {
    Event::default().data(
        serde_json::json!({
            "choices": [{"delta": {"content": content}, "index": 0}]
        })
        .to_string(),
    )
}

/// POST /api/chatbot
pub async fn chat(
    State(state): State<AppState>,
    user: UserId,
    Json(request): Json<ChatRequest>,
) -> Result<Response, ApiError> {
    if request.message.trim().is_empty() {
        return Err(ApiError::BadRequest("Message is required".to_string()));
    }

    let messages = build_messages(&state, &user, &request).await?;

    debug!(
        subsystem = "api",
        op = "chat",
        user_id = user.as_str(),
        stream = request.stream,
        with_context = request.context_document.is_some(),
        "Dispatching chat completion"
    );

    if request.stream {
        let tokens = state
            .openrouter
            .chat_stream_with_style(&messages, request.response_type)
            .await?;

        // Re-emit provider deltas one-to-one, then an explicit end marker.
        // Dropping the response body (client disconnect) drops the upstream
        // stream with it.
        let events = tokens
            .map(|delta| match delta {
                Ok(content) => Ok::<_, std::convert::Infallible>(delta_event(&content)),
                Err(e) => Ok(Event::default()
                    .data(serde_json::json!({"error": e.to_string()}).to_string())),
            })
            .chain(futures::stream::once(async {
                Ok(Event::default().data("[DONE]"))
            }));

        Ok(Sse::new(events).keep_alive(KeepAlive::default()).into_response())
    } else {
        let content = state
            .openrouter
            .chat_with_style(&messages, request.response_type)
            .await?;
        Ok(Json(ChatResponse { content }).into_response())
    }
}
