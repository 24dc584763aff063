//! Quiz set handlers, including AI-backed generation from a note.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use studium_core::{GenerationBackend, GenerationPreferences, NoteStore, QuizSet, QuizStore};
use studium_inference::{extract_quiz_questions, normalize, prompts};

use crate::auth::UserId;
use crate::error::ApiError;
use crate::handlers::derived_set_title;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct QuizSetsResponse {
    pub success: bool,
    #[serde(rename = "quizSets")]
    pub quiz_sets: Vec<QuizSet>,
}

#[derive(Debug, Serialize)]
pub struct QuizSetResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz: Option<QuizSet>,
}

#[derive(Debug, Deserialize)]
pub struct CreateQuizBody {
    #[serde(rename = "noteId")]
    pub note_id: Uuid,
    /// Caller identity echoed by the frontend; must match the trusted header.
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub preferences: Option<GenerationPreferences>,
}

/// GET /api/quizzes/list
pub async fn list_quiz_sets(
    State(state): State<AppState>,
    user: UserId,
) -> Result<Json<QuizSetsResponse>, ApiError> {
    let sets = state.db.quizzes.list_sets(user.as_str()).await?;
    Ok(Json(QuizSetsResponse {
        success: true,
        quiz_sets: sets,
    }))
}

/// GET /api/quizzes/:id
pub async fn get_quiz_set(
    State(state): State<AppState>,
    user: UserId,
    Path(set_id): Path<Uuid>,
) -> Result<Json<QuizSetResponse>, ApiError> {
    let set = state.db.quizzes.fetch_set(user.as_str(), set_id).await?;
    Ok(Json(QuizSetResponse {
        success: true,
        message: None,
        quiz: Some(set),
    }))
}

/// DELETE /api/quizzes/:id
pub async fn delete_quiz_set(
    State(state): State<AppState>,
    user: UserId,
    Path(set_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.quizzes.delete_set(user.as_str(), set_id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Quiz set and associated questions deleted successfully",
    })))
}

/// POST /api/quizzes/create
pub async fn create_quiz(
    State(state): State<AppState>,
    user: UserId,
    Json(body): Json<CreateQuizBody>,
) -> Result<Json<QuizSetResponse>, ApiError> {
    if let Some(claimed) = &body.user_id {
        if claimed != user.as_str() {
            return Err(ApiError::Forbidden("User ID mismatch".to_string()));
        }
    }

    let note = state.db.notes.fetch(user.as_str(), body.note_id).await?;

    let preferences = body.preferences.unwrap_or_default();
    let prompt = prompts::quiz_prompt(&note.content, &preferences);
    let response = state.gemini.generate(&prompt).await?;
    let questions = extract_quiz_questions(&normalize(&response))?;

    if questions.is_empty() {
        return Ok(Json(QuizSetResponse {
            success: true,
            message: Some("No quiz questions generated from the content".to_string()),
            quiz: None,
        }));
    }

    let title = derived_set_title("Quiz for", &note.title);
    let set_id = state
        .db
        .quizzes
        .insert_set_with_questions(user.as_str(), Some(note.id), &title, &questions)
        .await?;

    info!(
        subsystem = "api",
        op = "create_quiz",
        note_id = %note.id,
        set_id = %set_id,
        item_count = questions.len(),
        "Created quiz set"
    );

    let set = state.db.quizzes.fetch_set(user.as_str(), set_id).await?;
    Ok(Json(QuizSetResponse {
        success: true,
        message: Some("Quiz created successfully".to_string()),
        quiz: Some(set),
    }))
}
