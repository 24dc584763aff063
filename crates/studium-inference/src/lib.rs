//! # studium-inference
//!
//! AI provider backends and the response extraction pipeline for studium.
//!
//! This crate provides:
//! - The response normalizer (fence stripping, escape repair) and the
//!   strict structured extractor for flashcards and quiz questions
//! - The prompt builder for every generation task
//! - A Gemini-style generation backend with file attachment support
//! - An OpenRouter (OpenAI-compatible) chat backend with SSE streaming

pub mod extract;
pub mod gemini;
pub mod normalize;
pub mod openrouter;
pub mod prompts;

// Re-export core types
pub use studium_core::*;

pub use extract::{extract_flashcards, extract_quiz_questions};
pub use gemini::{GeminiBackend, GeminiConfig};
pub use normalize::normalize;
pub use openrouter::{ChatStreaming, OpenRouterBackend, OpenRouterConfig, TokenStream};
