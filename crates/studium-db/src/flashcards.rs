//! Flashcard set store implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use tracing::debug;
use uuid::Uuid;

use studium_core::{
    Error, Flashcard, FlashcardRow, FlashcardSet, FlashcardStore, Result,
};

/// PostgreSQL implementation of [`FlashcardStore`].
pub struct PgFlashcardStore {
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
    fn into_set(self, cards: Vec<FlashcardRow>) -> FlashcardSet {
        FlashcardSet {
            id: self.id,
            user_id: self.user_id,
            note_id: self.note_id,
            title: self.title,
            created_at: self.created_at,
            cards,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CardRow {
    flashcard_set_id: Uuid,
    id: Uuid,
    front: String,
    back: String,
    created_at: DateTime<Utc>,
}

impl PgFlashcardStore {
    /// Create a new PgFlashcardStore with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn cards_for_sets(&self, set_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<FlashcardRow>>> {
        if set_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, CardRow>(
            r#"
            SELECT flashcard_set_id, id, front, back, created_at
            FROM individual_flashcards
            WHERE flashcard_set_id = ANY($1)
            ORDER BY created_at ASC
            "#,
        )
        .bind(set_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_set: HashMap<Uuid, Vec<FlashcardRow>> = HashMap::new();
        for row in rows {
            by_set.entry(row.flashcard_set_id).or_default().push(FlashcardRow {
                id: row.id,
                front: row.front,
                back: row.back,
                created_at: row.created_at,
            });
        }
        Ok(by_set)
    }
}

#[async_trait]
impl FlashcardStore for PgFlashcardStore {
    async fn insert_set_with_cards(
        &self,
        user_id: &str,
        note_id: Option<Uuid>,
        title: &str,
        cards: &[Flashcard],
    ) -> Result<Uuid> {
        let mut tx = self.pool.begin().await?;

        let (set_id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO flashcard_sets (user_id, note_id, title)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(note_id)
        .bind(title)
        .fetch_one(&mut *tx)
        .await?;

        for card in cards {
            sqlx::query(
                r#"
                INSERT INTO individual_flashcards (flashcard_set_id, front, back)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(set_id)
            .bind(&card.front)
            .bind(&card.back)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        debug!(
            subsystem = "db",
            component = "flashcards",
            op = "insert_set_with_cards",
            set_id = %set_id,
            item_count = cards.len(),
            "Stored flashcard set"
        );
        Ok(set_id)
    }

    async fn fetch_set(&self, user_id: &str, id: Uuid) -> Result<FlashcardSet> {
        let set = sqlx::query_as::<_, SetRow>(
            r#"
            SELECT id, user_id, note_id, title, created_at
            FROM flashcard_sets
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("flashcard set {}", id)))?;

        let mut cards = self.cards_for_sets(&[id]).await?;
        Ok(set.into_set(cards.remove(&id).unwrap_or_default()))
    }

    async fn list_sets(&self, user_id: &str) -> Result<Vec<FlashcardSet>> {
        let sets = sqlx::query_as::<_, SetRow>(
            r#"
            SELECT id, user_id, note_id, title, created_at
            FROM flashcard_sets
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let set_ids: Vec<Uuid> = sets.iter().map(|s| s.id).collect();
        let mut cards = self.cards_for_sets(&set_ids).await?;

        Ok(sets
            .into_iter()
            .map(|set| {
                let set_cards = cards.remove(&set.id).unwrap_or_default();
                set.into_set(set_cards)
            })
            .collect())
    }

    async fn delete_set(&self, user_id: &str, id: Uuid) -> Result<()> {
        // Cards go with the set via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM flashcard_sets WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("flashcard set {}", id)));
        }
        Ok(())
    }

    async fn delete_for_note(&self, user_id: &str, note_id: Uuid) -> Result<u64> {
        let result =
            sqlx::query("DELETE FROM flashcard_sets WHERE note_id = $1 AND user_id = $2")
                .bind(note_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }
}
