//! Shared application state.
//!
//! Every service handle is constructed once in `main` and passed by
//! reference into request handlers; no module-level singletons.

use std::sync::Arc;

use studium_db::Database;
use studium_inference::{GeminiBackend, OpenRouterBackend};

/// Application state shared across request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Persistence gateway.
    pub db: Arc<Database>,
    /// Generation provider (document conversion, flashcards, quizzes, titles).
    pub gemini: Arc<GeminiBackend>,
    /// Chat provider (blocking and streaming completions).
    pub openrouter: Arc<OpenRouterBackend>,
}

impl AppState {
    pub fn new(db: Database, gemini: GeminiBackend, openrouter: OpenRouterBackend) -> Self {
        Self {
            db: Arc::new(db),
            gemini: Arc::new(gemini),
            openrouter: Arc::new(openrouter),
        }
    }
}
