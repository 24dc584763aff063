//! Core traits for studium abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// PERSISTENCE GATEWAY TRAITS
// =============================================================================

/// Store for note CRUD operations. Every operation is scoped to an owner.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Insert a new note and return the stored row.
    async fn insert(&self, user_id: &str, req: CreateNoteRequest) -> Result<Note>;

    /// Fetch a note by id, failing with `NoteNotFound` if absent or foreign.
    async fn fetch(&self, user_id: &str, id: Uuid) -> Result<Note>;

    /// List all notes for an owner, newest first.
    async fn list(&self, user_id: &str) -> Result<Vec<Note>>;

    /// Update title and/or content; returns the updated row.
    async fn update(&self, user_id: &str, id: Uuid, req: UpdateNoteRequest) -> Result<Note>;

    /// Delete the note row itself. Dependent sets are handled by the caller
    /// so their failures stay non-fatal.
    async fn delete(&self, user_id: &str, id: Uuid) -> Result<()>;

    /// Check whether a note exists and belongs to the owner.
    async fn exists(&self, user_id: &str, id: Uuid) -> Result<bool>;
}

/// Store for flashcard sets and their cards.
#[async_trait]
pub trait FlashcardStore: Send + Sync {
    /// Insert a set and all of its cards in a single transaction,
    /// returning the new set id.
    async fn insert_set_with_cards(
        &self,
        user_id: &str,
        note_id: Option<Uuid>,
        title: &str,
        cards: &[Flashcard],
    ) -> Result<Uuid>;

    /// Fetch a set with its cards, failing with `NotFound` if absent or foreign.
    async fn fetch_set(&self, user_id: &str, id: Uuid) -> Result<FlashcardSet>;

    /// List all sets (with cards) for an owner, newest first.
    async fn list_sets(&self, user_id: &str) -> Result<Vec<FlashcardSet>>;

    /// Delete a set; its cards go with it.
    async fn delete_set(&self, user_id: &str, id: Uuid) -> Result<()>;

    /// Delete every set derived from a note. Returns the number of sets removed.
    async fn delete_for_note(&self, user_id: &str, note_id: Uuid) -> Result<u64>;
}

/// Store for quiz sets and their questions.
#[async_trait]
pub trait QuizStore: Send + Sync {
    /// Insert a set and all of its questions in a single transaction,
    /// returning the new set id.
    async fn insert_set_with_questions(
        &self,
        user_id: &str,
        note_id: Option<Uuid>,
        title: &str,
        questions: &[QuizQuestion],
    ) -> Result<Uuid>;

    /// Fetch a set with its questions, failing with `NotFound` if absent or foreign.
    async fn fetch_set(&self, user_id: &str, id: Uuid) -> Result<QuizSet>;

    /// List all sets (with questions) for an owner, newest first.
    async fn list_sets(&self, user_id: &str) -> Result<Vec<QuizSet>>;

    /// Delete a set; its questions go with it.
    async fn delete_set(&self, user_id: &str, id: Uuid) -> Result<()>;

    /// Delete every set derived from a note. Returns the number of sets removed.
    async fn delete_for_note(&self, user_id: &str, note_id: Uuid) -> Result<u64>;
}

// =============================================================================
// PROVIDER TRAITS
// =============================================================================

/// Reference to a file registered with the generation provider.
///
/// Returned by [`AttachmentGeneration::upload`] and consumed by
/// [`AttachmentGeneration::generate_with_attachments`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderAttachment {
    /// Provider-assigned URI for the uploaded file.
    pub uri: String,
    /// MIME type the file was registered with.
    pub mime_type: String,
}

/// Text generation backend (blocking completion).
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text given a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

/// Generation backend that accepts file attachments alongside text prompts.
#[async_trait]
pub trait AttachmentGeneration: Send + Sync {
    /// Register raw file bytes with the provider, returning a reference
    /// usable in a subsequent generate call.
    async fn upload(
        &self,
        data: Vec<u8>,
        mime_type: &str,
        display_name: &str,
    ) -> Result<ProviderAttachment>;

    /// Generate text from an ordered list of text prompts and attachments.
    async fn generate_with_attachments(
        &self,
        prompts: &[String],
        attachments: &[ProviderAttachment],
    ) -> Result<String>;
}

/// Chat completion backend (blocking mode; streaming lives in the
/// inference crate where the SSE machinery is).
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Run a chat completion over role-tagged messages.
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}
