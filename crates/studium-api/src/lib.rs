//! # studium-api
//!
//! HTTP API server for studium: note CRUD, AI-backed flashcard and quiz
//! generation, document upload ingestion, and contextual chat.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod router;
pub mod services;
pub mod state;

pub use auth::UserId;
pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
