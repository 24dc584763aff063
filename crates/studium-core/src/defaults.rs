//! Centralized default constants for the studium system.
//!
//! **This module is the single source of truth** for all shared default
//! values. Crates reference these constants instead of defining their own
//! magic numbers.

// =============================================================================
// GENERATION
// =============================================================================

/// Default number of flashcards generated from a note.
pub const FLASHCARD_COUNT: u32 = 10;

/// Default number of quiz questions generated from a note.
pub const QUIZ_QUESTION_COUNT: u32 = 5;

/// Title a note falls back to when title generation fails and no
/// context hint is available.
pub const FALLBACK_NOTE_TITLE: &str = "Untitled Note";

/// Maximum characters of the source note title carried into a derived
/// set title before truncation.
pub const SET_TITLE_SOURCE_LEN: usize = 50;

// =============================================================================
// UPLOAD
// =============================================================================

/// Maximum number of files accepted in one upload batch.
pub const MAX_UPLOAD_FILES: usize = 5;

/// Maximum multipart request body size in bytes (32 MiB).
pub const MAX_UPLOAD_BODY_BYTES: usize = 32 * 1024 * 1024;

/// MIME type assumed when a part carries none and magic-byte detection fails.
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

// =============================================================================
// PROVIDERS
// =============================================================================

/// Default Gemini-style generation API base URL.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model for document/image-to-markdown conversion and
/// structured generation.
pub const GEMINI_GEN_MODEL: &str = "gemini-1.5-pro";

/// Default model for short title generation.
pub const GEMINI_TITLE_MODEL: &str = "gemini-1.5-flash";

/// Default OpenRouter API base URL.
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default chat model for detailed answers.
pub const CHAT_DETAILED_MODEL: &str = "openai/gpt-4o";

/// Default chat model for concise answers.
pub const CHAT_CONCISE_MODEL: &str = "anthropic/claude-3-haiku";

/// Default timeout for provider calls in seconds.
pub const PROVIDER_TIMEOUT_SECS: u64 = 180;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 8000;

/// Header carrying the caller identity asserted by the upstream gateway.
pub const USER_ID_HEADER: &str = "x-user-id";
