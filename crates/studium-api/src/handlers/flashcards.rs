//! Flashcard set handlers, including AI-backed generation from a note.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use studium_core::{FlashcardSet, FlashcardStore, GenerationBackend, GenerationPreferences, NoteStore};
use studium_inference::{extract_flashcards, normalize, prompts};

use crate::auth::UserId;
use crate::error::ApiError;
use crate::handlers::derived_set_title;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct FlashcardSetsResponse {
    pub success: bool,
    #[serde(rename = "flashcardSets")]
    pub flashcard_sets: Vec<FlashcardSet>,
}

#[derive(Debug, Serialize)]
pub struct FlashcardSetResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "flashcardSet", skip_serializing_if = "Option::is_none")]
    pub flashcard_set: Option<FlashcardSet>,
}

#[derive(Debug, Deserialize)]
pub struct CreateFlashcardsBody {
    #[serde(rename = "noteId")]
    pub note_id: Uuid,
    /// Caller identity echoed by the frontend; must match the trusted header.
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub preferences: Option<GenerationPreferences>,
}

/// GET /api/flashcards/list
pub async fn list_flashcard_sets(
    State(state): State<AppState>,
    user: UserId,
) -> Result<Json<FlashcardSetsResponse>, ApiError> {
    let sets = state.db.flashcards.list_sets(user.as_str()).await?;
    Ok(Json(FlashcardSetsResponse {
        success: true,
        flashcard_sets: sets,
    }))
}

/// GET /api/flashcards/:id
pub async fn get_flashcard_set(
    State(state): State<AppState>,
    user: UserId,
    Path(set_id): Path<Uuid>,
) -> Result<Json<FlashcardSetResponse>, ApiError> {
    let set = state.db.flashcards.fetch_set(user.as_str(), set_id).await?;
    Ok(Json(FlashcardSetResponse {
        success: true,
        message: None,
        flashcard_set: Some(set),
    }))
}

/// DELETE /api/flashcards/:id
pub async fn delete_flashcard_set(
    State(state): State<AppState>,
    user: UserId,
    Path(set_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.flashcards.delete_set(user.as_str(), set_id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Flashcard set and associated cards deleted successfully",
    })))
}

/// POST /api/flashcards/create
///
/// Generates flashcards from a note via the provider, runs the response
/// through the normalize/extract pipeline, and persists the whole set in
/// one transaction.
pub async fn create_flashcards(
    State(state): State<AppState>,
    user: UserId,
    Json(body): Json<CreateFlashcardsBody>,
) -> Result<Json<FlashcardSetResponse>, ApiError> {
    if let Some(claimed) = &body.user_id {
        if claimed != user.as_str() {
            return Err(ApiError::Forbidden("User ID mismatch".to_string()));
        }
    }

    let note = state.db.notes.fetch(user.as_str(), body.note_id).await?;

    let preferences = body.preferences.unwrap_or_default();
    let prompt = prompts::flashcard_prompt(&note.content, &preferences);
    let response = state.gemini.generate(&prompt).await?;
    let cards = extract_flashcards(&normalize(&response))?;

    if cards.is_empty() {
        return Ok(Json(FlashcardSetResponse {
            success: true,
            message: Some("No flashcards generated from the content".to_string()),
            flashcard_set: None,
        }));
    }

    let title = derived_set_title("Flashcards for", &note.title);
    let set_id = state
        .db
        .flashcards
        .insert_set_with_cards(user.as_str(), Some(note.id), &title, &cards)
        .await?;

    info!(
        subsystem = "api",
        op = "create_flashcards",
        note_id = %note.id,
        set_id = %set_id,
        item_count = cards.len(),
        "Created flashcard set"
    );

    let set = state.db.flashcards.fetch_set(user.as_str(), set_id).await?;
    Ok(Json(FlashcardSetResponse {
        success: true,
        message: Some("Flashcards created successfully".to_string()),
        flashcard_set: Some(set),
    }))
}
