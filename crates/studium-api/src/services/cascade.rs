//! Cascading note deletion.
//!
//! Deleting a note also deletes the quiz sets and flashcard sets derived
//! from it. Child deletion failures are collected as warnings and never
//! block the parent delete; only the note delete itself can fail the
//! operation.

use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use studium_core::{Error, FlashcardStore, NoteStore, QuizStore, Result};

/// Non-fatal child deletion errors from a cascading note delete.
#[derive(Debug, Default, Serialize)]
pub struct CascadeDeleteReport {
    #[serde(rename = "quizDeleteError")]
    pub quiz_delete_error: Option<String>,
    #[serde(rename = "flashcardDeleteError")]
    pub flashcard_delete_error: Option<String>,
}

impl CascadeDeleteReport {
    pub fn is_clean(&self) -> bool {
        self.quiz_delete_error.is_none() && self.flashcard_delete_error.is_none()
    }
}

/// Delete a note together with its derived quiz and flashcard sets.
pub async fn delete_note_cascade(
    notes: &dyn NoteStore,
    quizzes: &dyn QuizStore,
    flashcards: &dyn FlashcardStore,
    user_id: &str,
    note_id: Uuid,
) -> Result<CascadeDeleteReport> {
    if !notes.exists(user_id, note_id).await? {
        return Err(Error::NoteNotFound(note_id));
    }

    let mut report = CascadeDeleteReport::default();

    if let Err(e) = quizzes.delete_for_note(user_id, note_id).await {
        warn!(
            subsystem = "api",
            op = "delete_note_cascade",
            note_id = %note_id,
            error = %e,
            "Failed to delete associated quiz sets"
        );
        report.quiz_delete_error = Some(e.to_string());
    }

    if let Err(e) = flashcards.delete_for_note(user_id, note_id).await {
        warn!(
            subsystem = "api",
            op = "delete_note_cascade",
            note_id = %note_id,
            error = %e,
            "Failed to delete associated flashcard sets"
        );
        report.flashcard_delete_error = Some(e.to_string());
    }

    // The parent delete is the only fatal step.
    notes.delete(user_id, note_id).await?;

    Ok(report)
}
