//! Request-scoped orchestration over the stores and provider backends.

pub mod cascade;
pub mod context;
pub mod ingest;

pub use cascade::{delete_note_cascade, CascadeDeleteReport};
pub use context::assemble_context;
pub use ingest::{process_batch, GroupingPlan, IngestOutcome, UploadedFile};
