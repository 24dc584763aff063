//! Structured logging field name constants for studium.
//!
//! All crates use these constants for consistent structured logging fields
//! so log aggregation tools can query by standardized names across every
//! subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-item iteration, high-volume data |

/// Subsystem originating the log event.
/// Values: "api", "db", "inference", "ingest"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "gemini", "openrouter", "pool", "normalizer"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "generate", "upload", "extract_flashcards", "chat_stream"
pub const OPERATION: &str = "op";

/// Owner identity scoping the operation.
pub const USER_ID: &str = "user_id";

/// Note UUID being operated on.
pub const NOTE_ID: &str = "note_id";

/// Quiz or flashcard set UUID being operated on.
pub const SET_ID: &str = "set_id";

/// Original filename of an uploaded file.
pub const FILE_NAME: &str = "file_name";

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Byte length of a prompt sent to a provider.
pub const PROMPT_LEN: &str = "prompt_len";

/// Byte length of a model response.
pub const RESPONSE_LEN: &str = "response_len";

/// Number of items extracted from a model response.
pub const ITEM_COUNT: &str = "item_count";
