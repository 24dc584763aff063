//! Dashboard aggregate handler.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use studium_core::{FlashcardSetSummary, Note, QuizSetSummary};

use crate::auth::UserId;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    #[serde(rename = "totalNotes")]
    pub total_notes: usize,
    #[serde(rename = "totalQuizzes")]
    pub total_quizzes: usize,
    #[serde(rename = "totalFlashcards")]
    pub total_flashcards: usize,
    #[serde(rename = "allFiles")]
    pub all_files: Vec<Note>,
    pub quizzes: Vec<QuizSetSummary>,
    pub flashcards: Vec<FlashcardSetSummary>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: DashboardStats,
}

/// GET /api/dashboard/stats
pub async fn dashboard_stats(
    State(state): State<AppState>,
    user: UserId,
) -> Result<Json<StatsResponse>, ApiError> {
    let notes = state.db.dashboard.notes(user.as_str()).await?;
    let quizzes = state.db.dashboard.quiz_summaries(user.as_str()).await?;
    let flashcards = state.db.dashboard.flashcard_summaries(user.as_str()).await?;

    Ok(Json(StatsResponse {
        success: true,
        stats: DashboardStats {
            total_notes: notes.len(),
            total_quizzes: quizzes.len(),
            total_flashcards: flashcards.len(),
            all_files: notes,
            quizzes,
            flashcards,
        },
    }))
}
