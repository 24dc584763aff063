//! Note CRUD handlers.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use studium_core::{CreateNoteRequest, Note, NoteStore, UpdateNoteRequest};

use crate::auth::UserId;
use crate::error::ApiError;
use crate::services::delete_note_cascade;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct NoteListResponse {
    pub success: bool,
    pub notes: Vec<Note>,
}

#[derive(Debug, Serialize)]
pub struct NoteResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub note: Note,
}

#[derive(Debug, Deserialize)]
pub struct CreateNoteBody {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// GET /api/notes
pub async fn list_notes(
    State(state): State<AppState>,
    user: UserId,
) -> Result<Json<NoteListResponse>, ApiError> {
    let notes = state.db.notes.list(user.as_str()).await?;
    Ok(Json(NoteListResponse {
        success: true,
        notes,
    }))
}

/// GET /api/notes/:id
pub async fn get_note(
    State(state): State<AppState>,
    user: UserId,
    Path(note_id): Path<Uuid>,
) -> Result<Json<NoteResponse>, ApiError> {
    let note = state.db.notes.fetch(user.as_str(), note_id).await?;
    Ok(Json(NoteResponse {
        success: true,
        message: None,
        note,
    }))
}

/// POST /api/notes
pub async fn create_note(
    State(state): State<AppState>,
    user: UserId,
    Json(body): Json<CreateNoteBody>,
) -> Result<Json<NoteResponse>, ApiError> {
    let title = body
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Title is required".to_string()))?;

    let note = state
        .db
        .notes
        .insert(
            user.as_str(),
            CreateNoteRequest {
                title,
                content: body.content.unwrap_or_default(),
            },
        )
        .await?;

    Ok(Json(NoteResponse {
        success: true,
        message: Some("Note created successfully".to_string()),
        note,
    }))
}

/// PUT /api/notes/:id
pub async fn update_note(
    State(state): State<AppState>,
    user: UserId,
    Path(note_id): Path<Uuid>,
    Json(body): Json<UpdateNoteRequest>,
) -> Result<Json<NoteResponse>, ApiError> {
    if body.title.is_none() && body.content.is_none() {
        return Err(ApiError::BadRequest(
            "Title or content is required for update".to_string(),
        ));
    }

    let note = state.db.notes.update(user.as_str(), note_id, body).await?;
    Ok(Json(NoteResponse {
        success: true,
        message: Some("Note updated successfully".to_string()),
        note,
    }))
}

/// DELETE /api/notes/:id
///
/// Cascades over derived quiz and flashcard sets; child failures are
/// reported in the body rather than failing the request.
pub async fn delete_note(
    State(state): State<AppState>,
    user: UserId,
    Path(note_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let report = delete_note_cascade(
        &state.db.notes,
        &state.db.quizzes,
        &state.db.flashcards,
        user.as_str(),
        note_id,
    )
    .await?;

    if report.is_clean() {
        Ok(Json(serde_json::json!({
            "success": true,
            "message": "Note and associated quizzes/flashcards deleted successfully",
        })))
    } else {
        Ok(Json(serde_json::json!({
            "success": true,
            "message": "Note deleted, but encountered errors deleting some associated items",
            "errors": report,
        })))
    }
}
