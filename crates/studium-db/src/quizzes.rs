//! Quiz set store implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use tracing::debug;
use uuid::Uuid;

use studium_core::{
    Error, QuizQuestion, QuizQuestionRow, QuizSet, QuizStore, Result,
};

/// PostgreSQL implementation of [`QuizStore`].
pub struct PgQuizStore {
    pool: Pool<Postgres>,
}

#[derive(sqlx::FromRow)]
struct SetRow {
    id: Uuid,
    user_id: String,
    note_id: Option<Uuid>,
    title: String,
    created_at: DateTime<Utc>,
}

impl SetRow {
    fn into_set(self, questions: Vec<QuizQuestionRow>) -> QuizSet {
        QuizSet {
            id: self.id,
            user_id: self.user_id,
            note_id: self.note_id,
            title: self.title,
            created_at: self.created_at,
            questions,
        }
    }
}

#[derive(sqlx::FromRow)]
struct QuestionRow {
    quiz_set_id: Uuid,
    id: Uuid,
    question_text: String,
    option_a: String,
    option_b: String,
    option_c: String,
    option_d: String,
    correct_option: String,
    explanation: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<QuestionRow> for QuizQuestionRow {
    fn from(row: QuestionRow) -> Self {
        Self {
            id: row.id,
            question_text: row.question_text,
            option_a: row.option_a,
            option_b: row.option_b,
            option_c: row.option_c,
            option_d: row.option_d,
            correct_option: row.correct_option,
            explanation: row.explanation,
            created_at: row.created_at,
        }
    }
}

impl PgQuizStore {
    /// Create a new PgQuizStore with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn questions_for_sets(
        &self,
        set_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<QuizQuestionRow>>> {
        if set_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT quiz_set_id, id, question_text, option_a, option_b, option_c, option_d,
                   correct_option, explanation, created_at
            FROM quiz_questions
            WHERE quiz_set_id = ANY($1)
            ORDER BY created_at ASC
            "#,
        )
        .bind(set_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_set: HashMap<Uuid, Vec<QuizQuestionRow>> = HashMap::new();
        for row in rows {
            by_set.entry(row.quiz_set_id).or_default().push(row.into());
        }
        Ok(by_set)
    }
}

#[async_trait]
impl QuizStore for PgQuizStore {
    async fn insert_set_with_questions(
        &self,
        user_id: &str,
        note_id: Option<Uuid>,
        title: &str,
        questions: &[QuizQuestion],
    ) -> Result<Uuid> {
        let mut tx = self.pool.begin().await?;

        let (set_id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO quiz_sets (user_id, note_id, title)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(note_id)
        .bind(title)
        .fetch_one(&mut *tx)
        .await?;

        for question in questions {
            sqlx::query(
                r#"
                INSERT INTO quiz_questions
                    (quiz_set_id, question_text, option_a, option_b, option_c, option_d,
                     correct_option, explanation)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(set_id)
            .bind(&question.question_text)
            .bind(&question.option_a)
            .bind(&question.option_b)
            .bind(&question.option_c)
            .bind(&question.option_d)
            .bind(question.correct_option.as_str())
            .bind(&question.explanation)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        debug!(
            subsystem = "db",
            component = "quizzes",
            op = "insert_set_with_questions",
            set_id = %set_id,
            item_count = questions.len(),
            "Stored quiz set"
        );
        Ok(set_id)
    }

    async fn fetch_set(&self, user_id: &str, id: Uuid) -> Result<QuizSet> {
        let set = sqlx::query_as::<_, SetRow>(
            r#"
            SELECT id, user_id, note_id, title, created_at
            FROM quiz_sets
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("quiz set {}", id)))?;

        let mut questions = self.questions_for_sets(&[id]).await?;
        Ok(set.into_set(questions.remove(&id).unwrap_or_default()))
    }

    async fn list_sets(&self, user_id: &str) -> Result<Vec<QuizSet>> {
        let sets = sqlx::query_as::<_, SetRow>(
            r#"
            SELECT id, user_id, note_id, title, created_at
            FROM quiz_sets
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let set_ids: Vec<Uuid> = sets.iter().map(|s| s.id).collect();
        let mut questions = self.questions_for_sets(&set_ids).await?;

        Ok(sets
            .into_iter()
            .map(|set| {
                let set_questions = questions.remove(&set.id).unwrap_or_default();
                set.into_set(set_questions)
            })
            .collect())
    }

    async fn delete_set(&self, user_id: &str, id: Uuid) -> Result<()> {
        // Questions go with the set via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM quiz_sets WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("quiz set {}", id)));
        }
        Ok(())
    }

    async fn delete_for_note(&self, user_id: &str, note_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM quiz_sets WHERE note_id = $1 AND user_id = $2")
            .bind(note_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
