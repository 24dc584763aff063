//! Owner document listing for chat context pickers.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use studium_core::{ContextDocument, DocumentKind, NoteStore};

use crate::auth::UserId;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DocumentsResponse {
    pub success: bool,
    pub documents: Vec<ContextDocument>,
}

fn fallback(title: String, default_name: &str) -> String {
    if title.trim().is_empty() {
        default_name.to_string()
    } else {
        title
    }
}

/// GET /api/me/documents
///
/// Every note, quiz set, and flashcard set the caller owns, flattened
/// into one list of referenceable documents.
pub async fn list_documents(
    State(state): State<AppState>,
    user: UserId,
) -> Result<Json<DocumentsResponse>, ApiError> {
    let mut documents = Vec::new();

    for note in state.db.notes.list(user.as_str()).await? {
        documents.push(ContextDocument {
            id: note.id,
            kind: DocumentKind::Note,
            name: fallback(note.title, "Untitled Note"),
        });
    }

    for quiz in state.db.dashboard.quiz_summaries(user.as_str()).await? {
        documents.push(ContextDocument {
            id: quiz.id,
            kind: DocumentKind::Quiz,
            name: fallback(quiz.title, "Untitled Quiz"),
        });
    }

    for set in state.db.dashboard.flashcard_summaries(user.as_str()).await? {
        documents.push(ContextDocument {
            id: set.id,
            kind: DocumentKind::FlashcardSet,
            name: fallback(set.title, "Untitled Flashcard Set"),
        });
    }

    Ok(Json(DocumentsResponse {
        success: true,
        documents,
    }))
}
