//! Upload ingestion orchestrator behavior: partial failure collection,
//! grouping, title fallback, and ordering.

mod common;

use common::{InMemoryNoteStore, ScriptedBackend};
use studium_api::services::{process_batch, GroupingPlan, UploadedFile};
use studium_core::{Error, NoteStore};

fn file(name: &str, mime: &str) -> UploadedFile {
    UploadedFile {
        file_name: name.to_string(),
        mime_type: mime.to_string(),
        data: vec![0u8; 16],
    }
}

fn pdf(name: &str) -> UploadedFile {
    file(name, "application/pdf")
}

const USER: &str = "user-1";

#[tokio::test]
async fn one_failing_file_does_not_abort_siblings() {
    let backend = ScriptedBackend::failing_for(&["b.pdf"]);
    let notes = InMemoryNoteStore::default();
    let files = vec![pdf("a.pdf"), pdf("b.pdf"), pdf("c.pdf")];

    let outcome = process_batch(
        &backend,
        &backend,
        &notes,
        USER,
        &files,
        &GroupingPlan::Individual,
    )
    .await
    .unwrap();

    assert_eq!(outcome.notes.len(), 2);
    assert_eq!(outcome.errors.len(), 1);
    assert!(
        outcome.errors[0].contains("b.pdf"),
        "error must name the failed file: {}",
        outcome.errors[0]
    );

    // Ordering preserved: the surviving notes came from a.pdf then c.pdf.
    assert!(outcome.notes[0].content.contains("a.pdf"));
    assert!(outcome.notes[1].content.contains("c.pdf"));

    // Only the surviving notes were persisted.
    assert_eq!(notes.list(USER).await.unwrap().len(), 2);
}

#[tokio::test]
async fn all_failures_produce_empty_outcome_with_all_errors() {
    let backend = ScriptedBackend::failing_for(&["a.pdf", "b.pdf"]);
    let notes = InMemoryNoteStore::default();
    let files = vec![pdf("a.pdf"), pdf("b.pdf")];

    let outcome = process_batch(
        &backend,
        &backend,
        &notes,
        USER,
        &files,
        &GroupingPlan::Individual,
    )
    .await
    .unwrap();

    assert!(outcome.notes.is_empty());
    assert_eq!(outcome.errors.len(), 2);
}

#[tokio::test]
async fn grouped_batch_makes_one_call_and_one_note() {
    let backend = ScriptedBackend::default();
    let notes = InMemoryNoteStore::default();
    let files = vec![pdf("a.pdf"), file("b.png", "image/png"), pdf("c.pdf")];

    let outcome = process_batch(
        &backend,
        &backend,
        &notes,
        USER,
        &files,
        &GroupingPlan::AllGrouped,
    )
    .await
    .unwrap();

    assert_eq!(outcome.notes.len(), 1);
    assert!(outcome.errors.is_empty());

    let calls = backend.generate_calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0], vec!["a.pdf", "b.png", "c.pdf"]);
}

#[tokio::test]
async fn group_failure_fails_whole_group_only() {
    let backend = ScriptedBackend::failing_for(&["bad.pdf"]);
    let notes = InMemoryNoteStore::default();
    let files = vec![pdf("good.pdf"), pdf("bad.pdf"), pdf("solo.pdf")];
    let json = r#"[{"file": "good.pdf", "group": "g"}, {"file": "bad.pdf", "group": "g"}]"#;
    let plan = GroupingPlan::from_request(false, Some(json)).unwrap();

    let outcome = process_batch(&backend, &backend, &notes, USER, &files, &plan)
        .await
        .unwrap();

    // The grouped pair fails together; the unmentioned file still succeeds.
    assert_eq!(outcome.notes.len(), 1);
    assert!(outcome.notes[0].content.contains("solo.pdf"));
    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.errors[0].contains("good.pdf"));
    assert!(outcome.errors[0].contains("bad.pdf"));
}

#[tokio::test]
async fn titles_come_from_the_title_model() {
    let backend = ScriptedBackend::default();
    let notes = InMemoryNoteStore::default();
    let files = vec![pdf("a.pdf")];

    let outcome = process_batch(
        &backend,
        &backend,
        &notes,
        USER,
        &files,
        &GroupingPlan::Individual,
    )
    .await
    .unwrap();

    assert_eq!(outcome.notes[0].title, "Generated Title");
}

#[tokio::test]
async fn title_failure_falls_back_to_file_name() {
    let backend = ScriptedBackend {
        fail_titles: true,
        ..Default::default()
    };
    let notes = InMemoryNoteStore::default();
    let files = vec![pdf("lecture3.pdf")];

    let outcome = process_batch(
        &backend,
        &backend,
        &notes,
        USER,
        &files,
        &GroupingPlan::Individual,
    )
    .await
    .unwrap();

    // Title failure is never fatal; the hint stands in.
    assert_eq!(outcome.notes.len(), 1);
    assert!(outcome.errors.is_empty());
    assert_eq!(outcome.notes[0].title, "lecture3.pdf");
}

#[tokio::test]
async fn empty_batch_is_invalid_input() {
    let backend = ScriptedBackend::default();
    let notes = InMemoryNoteStore::default();

    let err = process_batch(
        &backend,
        &backend,
        &notes,
        USER,
        &[],
        &GroupingPlan::Individual,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[tokio::test]
async fn oversized_batch_is_invalid_input() {
    let backend = ScriptedBackend::default();
    let notes = InMemoryNoteStore::default();
    let files: Vec<UploadedFile> = (0..6).map(|i| pdf(&format!("f{}.pdf", i))).collect();

    let err = process_batch(
        &backend,
        &backend,
        &notes,
        USER,
        &files,
        &GroupingPlan::Individual,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}
