//! Core data models for studium.
//!
//! These types are shared across all studium crates and represent the
//! persisted entities plus the structured shapes extracted from model
//! responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// NOTE TYPES
// =============================================================================

/// A persisted study note.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Note {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request for creating a new note.
#[derive(Debug, Clone)]
pub struct CreateNoteRequest {
    pub title: String,
    pub content: String,
}

/// Request for updating a note. At least one field must be present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

// =============================================================================
// FLASHCARD TYPES
// =============================================================================

/// A single flashcard as extracted from a model response.
///
/// Both sides are required and non-empty after trimming; the extractor
/// enforces this before anything is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

/// A persisted flashcard row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FlashcardRow {
    pub id: Uuid,
    pub front: String,
    pub back: String,
    pub created_at: DateTime<Utc>,
}

/// A flashcard set with its cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashcardSet {
    pub id: Uuid,
    pub user_id: String,
    pub note_id: Option<Uuid>,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub cards: Vec<FlashcardRow>,
}

// =============================================================================
// QUIZ TYPES
// =============================================================================

/// The correct answer position of a multiple-choice question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrectOption {
    A,
    B,
    C,
    D,
}

impl CorrectOption {
    /// Parse the single-letter form used in model responses and rows.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

impl std::fmt::Display for CorrectOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single quiz question as extracted from a model response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_option: CorrectOption,
    pub explanation: Option<String>,
}

/// A persisted quiz question row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct QuizQuestionRow {
    pub id: Uuid,
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_option: String,
    pub explanation: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A quiz set with its questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSet {
    pub id: Uuid,
    pub user_id: String,
    pub note_id: Option<Uuid>,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub questions: Vec<QuizQuestionRow>,
}

// =============================================================================
// DASHBOARD SUMMARIES
// =============================================================================

/// Quiz set summary with its question count, for dashboard listings.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct QuizSetSummary {
    pub id: Uuid,
    pub title: String,
    pub note_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "questionCount")]
    pub question_count: i64,
}

/// Flashcard set summary with its card count, for dashboard listings.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FlashcardSetSummary {
    pub id: Uuid,
    pub title: String,
    pub note_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "cardCount")]
    pub card_count: i64,
}

// =============================================================================
// GENERATION PREFERENCES
// =============================================================================

/// Requested difficulty for generated study material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

/// Caller preferences for flashcard/quiz generation.
///
/// All fields optional; the prompt builder fills in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerationPreferences {
    /// Number of items to generate (cards or questions).
    pub count: Option<u32>,
    pub difficulty: Option<Difficulty>,
    /// Topic to focus on, appended to the prompt as a constraint.
    pub focus_topic: Option<String>,
}

// =============================================================================
// CHAT CONTEXT TYPES
// =============================================================================

/// Kind of document a chat request can reference as context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Note,
    Quiz,
    FlashcardSet,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Note => write!(f, "note"),
            Self::Quiz => write!(f, "quiz"),
            Self::FlashcardSet => write!(f, "flashcard_set"),
        }
    }
}

/// Reference to an owner document usable as chat context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextDocument {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub name: String,
}

/// Requested depth of a chat answer; selects both the system prompt
/// and the provider model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStyle {
    #[default]
    Detailed,
    Concise,
}

/// A chat message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single role-tagged chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}
