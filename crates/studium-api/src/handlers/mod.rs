//! HTTP request handlers.

pub mod chat;
pub mod dashboard;
pub mod documents;
pub mod flashcards;
pub mod notes;
pub mod quizzes;
pub mod upload;

use studium_core::defaults;

/// Title for a derived set, carrying a truncated slice of the source note
/// title: `"Flashcards for: Organic Chemistry Week 3..."`.
pub(crate) fn derived_set_title(prefix: &str, note_title: &str) -> String {
    let mut source: String = note_title
        .chars()
        .take(defaults::SET_TITLE_SOURCE_LEN)
        .collect();
    if note_title.chars().count() > defaults::SET_TITLE_SOURCE_LEN {
        source.push_str("...");
    }
    format!("{}: {}", prefix, source)
}
