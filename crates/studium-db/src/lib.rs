//! # studium-db
//!
//! PostgreSQL persistence gateway for studium.
//!
//! This crate provides:
//! - Connection pool management
//! - Store implementations for notes, flashcard sets, and quiz sets
//! - Transactional "insert set + children" operations
//! - Aggregate dashboard queries
//!
//! ## Example
//!
//! ```rust,ignore
//! use studium_db::Database;
//! use studium_core::{CreateNoteRequest, NoteStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/studium").await?;
//!
//!     let note = db.notes.insert("user-1", CreateNoteRequest {
//!         title: "Thermodynamics".to_string(),
//!         content: "# First law\n...".to_string(),
//!     }).await?;
//!
//!     println!("Created note: {}", note.id);
//!     Ok(())
//! }
//! ```

pub mod dashboard;
pub mod flashcards;
pub mod notes;
pub mod pool;
pub mod quizzes;

// Re-export core types
pub use studium_core::*;

pub use dashboard::PgDashboard;
pub use flashcards::PgFlashcardStore;
pub use notes::PgNoteStore;
pub use pool::{create_pool, create_pool_with_config, PoolConfig};
pub use quizzes::PgQuizStore;

/// Aggregated handle over every store, sharing one connection pool.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Note store for CRUD operations.
    pub notes: PgNoteStore,
    /// Flashcard set store.
    pub flashcards: PgFlashcardStore,
    /// Quiz set store.
    pub quizzes: PgQuizStore,
    /// Aggregate dashboard queries.
    pub dashboard: PgDashboard,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            notes: PgNoteStore::new(pool.clone()),
            flashcards: PgFlashcardStore::new(pool.clone()),
            quizzes: PgQuizStore::new(pool.clone()),
            dashboard: PgDashboard::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create a new Database instance with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations (requires the `migrations` feature).
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Internal(format!("Migration failed: {}", e)))
    }

    /// Verify the database connection is alive.
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
