//! Aggregate dashboard queries.
//!
//! Counts come from the same queries that produce the summaries, so the
//! numbers on the dashboard always match the lists beneath them.

use sqlx::{Pool, Postgres};

use studium_core::{FlashcardSetSummary, Note, QuizSetSummary, Result};

/// PostgreSQL dashboard aggregation queries.
pub struct PgDashboard {
    pool: Pool<Postgres>,
}

impl PgDashboard {
    /// Create a new PgDashboard with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// All notes for an owner, newest first.
    pub async fn notes(&self, user_id: &str) -> Result<Vec<Note>> {
        let notes = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, user_id, title, content, created_at, updated_at
            FROM notes
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(notes)
    }

    /// Quiz set summaries with question counts, newest first.
    pub async fn quiz_summaries(&self, user_id: &str) -> Result<Vec<QuizSetSummary>> {
        let summaries = sqlx::query_as::<_, QuizSetSummary>(
            r#"
            SELECT qs.id, qs.title, qs.note_id, qs.created_at,
                   COUNT(qq.id) AS question_count
            FROM quiz_sets qs
            LEFT JOIN quiz_questions qq ON qq.quiz_set_id = qs.id
            WHERE qs.user_id = $1
            GROUP BY qs.id
            ORDER BY qs.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(summaries)
    }

    /// Flashcard set summaries with card counts, newest first.
    pub async fn flashcard_summaries(&self, user_id: &str) -> Result<Vec<FlashcardSetSummary>> {
        let summaries = sqlx::query_as::<_, FlashcardSetSummary>(
            r#"
            SELECT fs.id, fs.title, fs.note_id, fs.created_at,
                   COUNT(fc.id) AS card_count
            FROM flashcard_sets fs
            LEFT JOIN individual_flashcards fc ON fc.flashcard_set_id = fs.id
            WHERE fs.user_id = $1
            GROUP BY fs.id
            ORDER BY fs.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(summaries)
    }
}
