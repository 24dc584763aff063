//! Chat context assembly.
//!
//! Resolves a referenced document (note, quiz, or flashcard set) into one
//! flattened text blob for injection into a conversational prompt. The
//! owner check rides on the stores: a foreign or missing document surfaces
//! as `NotFound`.

use studium_core::{
    ContextDocument, DocumentKind, FlashcardStore, NoteStore, QuizStore, Result,
};

/// Flatten the referenced document into context text.
pub async fn assemble_context(
    notes: &dyn NoteStore,
    quizzes: &dyn QuizStore,
    flashcards: &dyn FlashcardStore,
    user_id: &str,
    document: &ContextDocument,
) -> Result<String> {
    match document.kind {
        DocumentKind::Note => {
            let note = notes.fetch(user_id, document.id).await?;
            Ok(format!("Note: {}\n\n{}", note.title, note.content))
        }
        DocumentKind::Quiz => {
            let quiz = quizzes.fetch_set(user_id, document.id).await?;
            let questions = quiz
                .questions
                .iter()
                .map(|q| {
                    format!(
                        "Question: {}\nOption A: {}\nOption B: {}\nOption C: {}\nOption D: {}\n\
Correct Option: {}\nExplanation: {}",
                        q.question_text,
                        q.option_a,
                        q.option_b,
                        q.option_c,
                        q.option_d,
                        q.correct_option,
                        q.explanation.as_deref().unwrap_or("-"),
                    )
                })
                .collect::<Vec<_>>()
                .join("\n\n");
            Ok(format!("Quiz: {}\n\n{}", quiz.title, questions))
        }
        DocumentKind::FlashcardSet => {
            let set = flashcards.fetch_set(user_id, document.id).await?;
            let cards = set
                .cards
                .iter()
                .map(|c| format!("Front: {}\nBack: {}", c.front, c.back))
                .collect::<Vec<_>>()
                .join("\n\n");
            Ok(format!("Flashcard Set: {}\n\n{}", set.title, cards))
        }
    }
}
