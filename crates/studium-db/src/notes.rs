//! Note store implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use studium_core::{
    CreateNoteRequest, Error, Note, NoteStore, Result, UpdateNoteRequest,
};

/// PostgreSQL implementation of [`NoteStore`].
pub struct PgNoteStore {
    pool: Pool<Postgres>,
}

impl PgNoteStore {
    /// Create a new PgNoteStore with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteStore for PgNoteStore {
    async fn insert(&self, user_id: &str, req: CreateNoteRequest) -> Result<Note> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (user_id, title, content)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, title, content, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(&req.title)
        .bind(&req.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(note)
    }

    async fn fetch(&self, user_id: &str, id: Uuid) -> Result<Note> {
        sqlx::query_as::<_, Note>(
            r#"
            SELECT id, user_id, title, content, created_at, updated_at
            FROM notes
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(Error::NoteNotFound(id))
    }

    async fn list(&self, user_id: &str) -> Result<Vec<Note>> {
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

    async fn update(&self, user_id: &str, id: Uuid, req: UpdateNoteRequest) -> Result<Note> {
        if req.title.is_none() && req.content.is_none() {
            return Err(Error::InvalidInput(
                "title or content is required for update".to_string(),
            ));
        }

        sqlx::query_as::<_, Note>(
            r#"
            UPDATE notes
            SET title = COALESCE($3, title),
                content = COALESCE($4, content),
                updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, content, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(req.title)
        .bind(req.content)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(Error::NoteNotFound(id))
    }

    async fn delete(&self, user_id: &str, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NoteNotFound(id));
        }
        Ok(())
    }

    async fn exists(&self, user_id: &str, id: Uuid) -> Result<bool> {
        let found: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM notes WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(found.is_some())
    }
}
