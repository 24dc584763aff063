//! Document ingestion orchestration.
//!
//! Drives an upload batch from validation through per-file or grouped
//! provider calls, title generation, and persistence. Item-level failures
//! are collected and never abort sibling items; the caller decides total
//! failure when zero notes were produced.

use serde::Deserialize;
use tracing::{info, warn};

use studium_core::defaults;
use studium_core::{
    AttachmentGeneration, CreateNoteRequest, Error, GenerationBackend, Note, NoteStore,
    ProviderAttachment, Result,
};
use studium_inference::prompts;

/// One uploaded file, decoded out of the multipart request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// One entry of the explicit grouping descriptor: a filename and the
/// group label it belongs to (`null`/absent label means individual).
#[derive(Debug, Clone, Deserialize)]
pub struct GroupingEntry {
    pub file: String,
    #[serde(default)]
    pub group: Option<String>,
}

/// How the batch should be partitioned into generation calls.
#[derive(Debug, Clone)]
pub enum GroupingPlan {
    /// One provider call and one note per file.
    Individual,
    /// One provider call and one note for the whole batch.
    AllGrouped,
    /// Per-item descriptor; equal group labels process together.
    Explicit(Vec<GroupingEntry>),
}

impl GroupingPlan {
    /// Parse the optional form fields of the upload request.
    ///
    /// A malformed `grouping` descriptor is a batch-level validation
    /// failure, not an item error.
    pub fn from_request(group_files: bool, grouping_json: Option<&str>) -> Result<Self> {
        match grouping_json.map(str::trim).filter(|s| !s.is_empty()) {
            Some(json) => {
                let entries: Vec<GroupingEntry> = serde_json::from_str(json).map_err(|e| {
                    Error::InvalidInput(format!("Malformed grouping descriptor: {}", e))
                })?;
                Ok(GroupingPlan::Explicit(entries))
            }
            None if group_files => Ok(GroupingPlan::AllGrouped),
            None => Ok(GroupingPlan::Individual),
        }
    }
}

/// Outcome of an ingestion batch: the notes that made it, plus collected
/// item-level errors and non-fatal warnings.
#[derive(Debug, Default)]
pub struct IngestOutcome {
    pub notes: Vec<Note>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Groups of file indices, in input order.
fn resolve_groups(
    files: &[UploadedFile],
    plan: &GroupingPlan,
    warnings: &mut Vec<String>,
) -> Vec<Vec<usize>> {
    match plan {
        GroupingPlan::Individual => (0..files.len()).map(|i| vec![i]).collect(),
        GroupingPlan::AllGrouped => vec![(0..files.len()).collect()],
        GroupingPlan::Explicit(entries) => {
            let mut assigned = vec![false; files.len()];
            // Group label -> position in `groups`, in order of first appearance.
            let mut groups: Vec<(Option<String>, Vec<usize>)> = Vec::new();

            for entry in entries {
                let duplicates = files.iter().filter(|f| f.file_name == entry.file).count();
                if duplicates > 1 {
                    warnings.push(format!(
                        "Duplicate filename \"{}\" in batch; using first unassigned match",
                        entry.file
                    ));
                }

                let Some(index) = files
                    .iter()
                    .enumerate()
                    .position(|(i, f)| f.file_name == entry.file && !assigned[i])
                else {
                    warnings.push(format!(
                        "Grouping entry references unknown or already-grouped file \"{}\"",
                        entry.file
                    ));
                    continue;
                };
                assigned[index] = true;

                match &entry.group {
                    Some(label) => {
                        if let Some((_, members)) = groups
                            .iter_mut()
                            .find(|(key, _)| key.as_deref() == Some(label.as_str()))
                        {
                            members.push(index);
                        } else {
                            groups.push((Some(label.clone()), vec![index]));
                        }
                    }
                    None => groups.push((None, vec![index])),
                }
            }

            // Files the descriptor never mentioned are processed individually.
            for (index, was_assigned) in assigned.iter().enumerate() {
                if !was_assigned {
                    groups.push((None, vec![index]));
                }
            }

            groups.into_iter().map(|(_, members)| members).collect()
        }
    }
}

fn prompt_for(file: &UploadedFile) -> &'static str {
    if file.mime_type == "application/pdf" {
        prompts::DOCUMENT_NOTE_PROMPT
    } else {
        prompts::IMAGE_NOTE_PROMPT
    }
}

/// Process one group: upload each member, run the generation call, derive
/// a title, persist the note.
async fn process_group(
    gen: &dyn AttachmentGeneration,
    titler: &dyn GenerationBackend,
    notes: &dyn NoteStore,
    user_id: &str,
    files: &[UploadedFile],
    members: &[usize],
) -> Result<Note> {
    let group: Vec<&UploadedFile> = members.iter().map(|&i| &files[i]).collect();

    let mut attachments: Vec<ProviderAttachment> = Vec::with_capacity(group.len());
    for file in &group {
        let attachment = gen
            .upload(file.data.clone(), &file.mime_type, &file.file_name)
            .await?;
        attachments.push(attachment);
    }

    let prompts_for_call: Vec<String> = if group.len() == 1 {
        vec![prompt_for(group[0]).to_string()]
    } else {
        vec![
            prompts::IMAGE_NOTE_PROMPT.to_string(),
            prompts::DOCUMENT_NOTE_PROMPT.to_string(),
            prompts::GROUP_NOTE_PROMPT.to_string(),
        ]
    };

    let markdown = gen
        .generate_with_attachments(&prompts_for_call, &attachments)
        .await?;
    if markdown.trim().is_empty() {
        return Err(Error::Inference("Provider returned empty content".to_string()));
    }

    let hint = if group.len() == 1 {
        group[0].file_name.clone()
    } else {
        format!(
            "Group: {}",
            group
                .iter()
                .map(|f| f.file_name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    };
    let title = generate_title(titler, &markdown, &hint).await;

    notes
        .insert(
            user_id,
            CreateNoteRequest {
                title,
                content: markdown,
            },
        )
        .await
}

/// Derive a short title for generated content, falling back to the context
/// hint (and ultimately a literal) when the secondary call fails. Title
/// failure is never fatal to the batch.
async fn generate_title(titler: &dyn GenerationBackend, content: &str, hint: &str) -> String {
    match titler.generate(&prompts::title_prompt(content, Some(hint))).await {
        Ok(raw) => {
            let title = raw.trim().trim_matches('"').trim();
            if title.is_empty() {
                fallback_title(hint)
            } else {
                title.to_string()
            }
        }
        Err(e) => {
            warn!(
                subsystem = "ingest",
                op = "title",
                error = %e,
                "Title generation failed, using fallback"
            );
            fallback_title(hint)
        }
    }
}

fn fallback_title(hint: &str) -> String {
    if hint.trim().is_empty() {
        defaults::FALLBACK_NOTE_TITLE.to_string()
    } else {
        hint.to_string()
    }
}

/// Human-readable label for a group, used in item error messages.
fn group_label(files: &[UploadedFile], members: &[usize]) -> String {
    members
        .iter()
        .map(|&i| files[i].file_name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Run an upload batch to completion.
///
/// Items are processed sequentially in input order; one item's failure is
/// recorded and never cancels its siblings. Returns the surviving notes in
/// group order together with the collected errors and warnings.
pub async fn process_batch(
    gen: &dyn AttachmentGeneration,
    titler: &dyn GenerationBackend,
    notes: &dyn NoteStore,
    user_id: &str,
    files: &[UploadedFile],
    plan: &GroupingPlan,
) -> Result<IngestOutcome> {
    if files.is_empty() {
        return Err(Error::InvalidInput("No files provided".to_string()));
    }
    if files.len() > defaults::MAX_UPLOAD_FILES {
        return Err(Error::InvalidInput(format!(
            "You can upload a maximum of {} files",
            defaults::MAX_UPLOAD_FILES
        )));
    }

    let mut outcome = IngestOutcome::default();
    let groups = resolve_groups(files, plan, &mut outcome.warnings);

    for members in &groups {
        match process_group(gen, titler, notes, user_id, files, members).await {
            Ok(note) => outcome.notes.push(note),
            Err(e) => {
                let label = group_label(files, members);
                warn!(
                    subsystem = "ingest",
                    op = "process_group",
                    file_name = %label,
                    error = %e,
                    "Upload item failed"
                );
                outcome
                    .errors
                    .push(format!("Failed to process {}: {}", label, e));
            }
        }
    }

    info!(
        subsystem = "ingest",
        op = "process_batch",
        user_id = user_id,
        item_count = outcome.notes.len(),
        error_count = outcome.errors.len(),
        "Upload batch finished"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            mime_type: "application/pdf".to_string(),
            data: vec![1, 2, 3],
        }
    }

    #[test]
    fn plan_defaults_to_individual() {
        let plan = GroupingPlan::from_request(false, None).unwrap();
        assert!(matches!(plan, GroupingPlan::Individual));
    }

    #[test]
    fn plan_honors_group_files_flag() {
        let plan = GroupingPlan::from_request(true, None).unwrap();
        assert!(matches!(plan, GroupingPlan::AllGrouped));
    }

    #[test]
    fn plan_parses_explicit_descriptor() {
        let json = r#"[{"file": "a.pdf", "group": "g1"}, {"file": "b.pdf"}]"#;
        let plan = GroupingPlan::from_request(false, Some(json)).unwrap();
        match plan {
            GroupingPlan::Explicit(entries) => {
                assert_eq!(entries.len(), 2);
                assert_eq!(entries[0].group.as_deref(), Some("g1"));
                assert_eq!(entries[1].group, None);
            }
            other => panic!("expected explicit plan, got {other:?}"),
        }
    }

    #[test]
    fn malformed_descriptor_is_invalid_input() {
        let err = GroupingPlan::from_request(false, Some("{not json")).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn blank_descriptor_falls_back_to_flag() {
        let plan = GroupingPlan::from_request(true, Some("   ")).unwrap();
        assert!(matches!(plan, GroupingPlan::AllGrouped));
    }

    #[test]
    fn individual_plan_gives_one_group_per_file() {
        let files = vec![file("a.pdf"), file("b.pdf")];
        let mut warnings = Vec::new();
        let groups = resolve_groups(&files, &GroupingPlan::Individual, &mut warnings);
        assert_eq!(groups, vec![vec![0], vec![1]]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn all_grouped_plan_gives_single_group() {
        let files = vec![file("a.pdf"), file("b.pdf"), file("c.pdf")];
        let mut warnings = Vec::new();
        let groups = resolve_groups(&files, &GroupingPlan::AllGrouped, &mut warnings);
        assert_eq!(groups, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn explicit_plan_clusters_equal_labels() {
        let files = vec![file("a.pdf"), file("b.pdf"), file("c.pdf")];
        let entries = vec![
            GroupingEntry { file: "a.pdf".to_string(), group: Some("g".to_string()) },
            GroupingEntry { file: "c.pdf".to_string(), group: Some("g".to_string()) },
            GroupingEntry { file: "b.pdf".to_string(), group: None },
        ];
        let mut warnings = Vec::new();
        let groups = resolve_groups(&files, &GroupingPlan::Explicit(entries), &mut warnings);
        assert_eq!(groups, vec![vec![0, 2], vec![1]]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn unmentioned_files_fall_back_to_individual() {
        let files = vec![file("a.pdf"), file("b.pdf")];
        let entries = vec![GroupingEntry {
            file: "a.pdf".to_string(),
            group: Some("g".to_string()),
        }];
        let mut warnings = Vec::new();
        let groups = resolve_groups(&files, &GroupingPlan::Explicit(entries), &mut warnings);
        assert_eq!(groups, vec![vec![0], vec![1]]);
    }

    #[test]
    fn duplicate_filenames_resolve_first_match_and_warn() {
        let files = vec![file("a.pdf"), file("a.pdf")];
        let entries = vec![
            GroupingEntry { file: "a.pdf".to_string(), group: Some("g".to_string()) },
            GroupingEntry { file: "a.pdf".to_string(), group: Some("g".to_string()) },
        ];
        let mut warnings = Vec::new();
        let groups = resolve_groups(&files, &GroupingPlan::Explicit(entries), &mut warnings);
        assert_eq!(groups, vec![vec![0, 1]]);
        assert!(warnings.iter().any(|w| w.contains("Duplicate filename")));
    }

    #[test]
    fn unknown_name_in_descriptor_warns_and_continues() {
        let files = vec![file("a.pdf")];
        let entries = vec![GroupingEntry {
            file: "missing.pdf".to_string(),
            group: None,
        }];
        let mut warnings = Vec::new();
        let groups = resolve_groups(&files, &GroupingPlan::Explicit(entries), &mut warnings);
        assert_eq!(groups, vec![vec![0]]);
        assert!(warnings.iter().any(|w| w.contains("missing.pdf")));
    }

    #[test]
    fn fallback_title_prefers_hint() {
        assert_eq!(fallback_title("lecture.pdf"), "lecture.pdf");
        assert_eq!(fallback_title("  "), defaults::FALLBACK_NOTE_TITLE);
    }
}
