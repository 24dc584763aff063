//! In-memory fakes shared by the orchestration tests.

// Not every test binary exercises every fake.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use studium_core::*;

// ---------------------------------------------------------------------------
// Note store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryNoteStore {
    pub notes: Mutex<Vec<Note>>,
    /// When true, `delete` fails with an internal error.
    pub fail_delete: bool,
}

impl InMemoryNoteStore {
    pub fn with_note(self, user_id: &str, title: &str, content: &str) -> (Self, Uuid) {
        let id = Uuid::new_v4();
        self.notes.lock().unwrap().push(Note {
            id,
            user_id: user_id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
            updated_at: None,
        });
        (self, id)
    }
}

#[async_trait]
impl NoteStore for InMemoryNoteStore {
    async fn insert(&self, user_id: &str, req: CreateNoteRequest) -> Result<Note> {
        let note = Note {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            title: req.title,
            content: req.content,
            created_at: Utc::now(),
            updated_at: None,
        };
        self.notes.lock().unwrap().push(note.clone());
        Ok(note)
    }

    async fn fetch(&self, user_id: &str, id: Uuid) -> Result<Note> {
        self.notes
            .lock()
            .unwrap()
            .iter()
            .find(|n| n.id == id && n.user_id == user_id)
            .cloned()
            .ok_or(Error::NoteNotFound(id))
    }

    async fn list(&self, user_id: &str) -> Result<Vec<Note>> {
        Ok(self
            .notes
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update(&self, user_id: &str, id: Uuid, req: UpdateNoteRequest) -> Result<Note> {
        let mut notes = self.notes.lock().unwrap();
        let note = notes
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
            .ok_or(Error::NoteNotFound(id))?;
        if let Some(title) = req.title {
            note.title = title;
        }
        if let Some(content) = req.content {
            note.content = content;
        }
        note.updated_at = Some(Utc::now());
        Ok(note.clone())
    }

    async fn delete(&self, user_id: &str, id: Uuid) -> Result<()> {
        if self.fail_delete {
            return Err(Error::Internal("note delete failed".to_string()));
        }
        let mut notes = self.notes.lock().unwrap();
        let before = notes.len();
        notes.retain(|n| !(n.id == id && n.user_id == user_id));
        if notes.len() == before {
            return Err(Error::NoteNotFound(id));
        }
        Ok(())
    }

    async fn exists(&self, user_id: &str, id: Uuid) -> Result<bool> {
        Ok(self
            .notes
            .lock()
            .unwrap()
            .iter()
            .any(|n| n.id == id && n.user_id == user_id))
    }
}

// ---------------------------------------------------------------------------
// Quiz store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryQuizStore {
    pub sets: Mutex<Vec<QuizSet>>,
    /// When true, `delete_for_note` fails with an internal error.
    pub fail_delete_for_note: bool,
}

impl InMemoryQuizStore {
    pub fn with_set(self, user_id: &str, note_id: Uuid, title: &str) -> (Self, Uuid) {
        let id = Uuid::new_v4();
        self.sets.lock().unwrap().push(QuizSet {
            id,
            user_id: user_id.to_string(),
            note_id: Some(note_id),
            title: title.to_string(),
            created_at: Utc::now(),
            questions: vec![],
        });
        (self, id)
    }
}

#[async_trait]
impl QuizStore for InMemoryQuizStore {
    async fn insert_set_with_questions(
        &self,
        user_id: &str,
        note_id: Option<Uuid>,
        title: &str,
        questions: &[QuizQuestion],
    ) -> Result<Uuid> {
        let id = Uuid::new_v4();
        let rows = questions
            .iter()
            .map(|q| QuizQuestionRow {
                id: Uuid::new_v4(),
                question_text: q.question_text.clone(),
                option_a: q.option_a.clone(),
                option_b: q.option_b.clone(),
                option_c: q.option_c.clone(),
                option_d: q.option_d.clone(),
                correct_option: q.correct_option.as_str().to_string(),
                explanation: q.explanation.clone(),
                created_at: Utc::now(),
            })
            .collect();
        self.sets.lock().unwrap().push(QuizSet {
            id,
            user_id: user_id.to_string(),
            note_id,
            title: title.to_string(),
            created_at: Utc::now(),
            questions: rows,
        });
        Ok(id)
    }

    async fn fetch_set(&self, user_id: &str, id: Uuid) -> Result<QuizSet> {
        self.sets
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id && s.user_id == user_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("quiz set {}", id)))
    }

    async fn list_sets(&self, user_id: &str) -> Result<Vec<QuizSet>> {
        Ok(self
            .sets
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete_set(&self, user_id: &str, id: Uuid) -> Result<()> {
        let mut sets = self.sets.lock().unwrap();
        let before = sets.len();
        sets.retain(|s| !(s.id == id && s.user_id == user_id));
        if sets.len() == before {
            return Err(Error::NotFound(format!("quiz set {}", id)));
        }
        Ok(())
    }

    async fn delete_for_note(&self, user_id: &str, note_id: Uuid) -> Result<u64> {
        if self.fail_delete_for_note {
            return Err(Error::Internal("quiz delete failed".to_string()));
        }
        let mut sets = self.sets.lock().unwrap();
        let before = sets.len();
        sets.retain(|s| !(s.note_id == Some(note_id) && s.user_id == user_id));
        Ok((before - sets.len()) as u64)
    }
}

// ---------------------------------------------------------------------------
// Flashcard store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryFlashcardStore {
    pub sets: Mutex<Vec<FlashcardSet>>,
}

impl InMemoryFlashcardStore {
    pub fn with_set(self, user_id: &str, note_id: Uuid, title: &str) -> (Self, Uuid) {
        let id = Uuid::new_v4();
        self.sets.lock().unwrap().push(FlashcardSet {
            id,
            user_id: user_id.to_string(),
            note_id: Some(note_id),
            title: title.to_string(),
            created_at: Utc::now(),
            cards: vec![],
        });
        (self, id)
    }
}

#[async_trait]
impl FlashcardStore for InMemoryFlashcardStore {
    async fn insert_set_with_cards(
        &self,
        user_id: &str,
        note_id: Option<Uuid>,
        title: &str,
        cards: &[Flashcard],
    ) -> Result<Uuid> {
        let id = Uuid::new_v4();
        let rows = cards
            .iter()
            .map(|c| FlashcardRow {
                id: Uuid::new_v4(),
                front: c.front.clone(),
                back: c.back.clone(),
                created_at: Utc::now(),
            })
            .collect();
        self.sets.lock().unwrap().push(FlashcardSet {
            id,
            user_id: user_id.to_string(),
            note_id,
            title: title.to_string(),
            created_at: Utc::now(),
            cards: rows,
        });
        Ok(id)
    }

    async fn fetch_set(&self, user_id: &str, id: Uuid) -> Result<FlashcardSet> {
        self.sets
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id && s.user_id == user_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("flashcard set {}", id)))
    }

    async fn list_sets(&self, user_id: &str) -> Result<Vec<FlashcardSet>> {
        Ok(self
            .sets
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete_set(&self, user_id: &str, id: Uuid) -> Result<()> {
        let mut sets = self.sets.lock().unwrap();
        let before = sets.len();
        sets.retain(|s| !(s.id == id && s.user_id == user_id));
        if sets.len() == before {
            return Err(Error::NotFound(format!("flashcard set {}", id)));
        }
        Ok(())
    }

    async fn delete_for_note(&self, user_id: &str, note_id: Uuid) -> Result<u64> {
        let mut sets = self.sets.lock().unwrap();
        let before = sets.len();
        sets.retain(|s| !(s.note_id == Some(note_id) && s.user_id == user_id));
        Ok((before - sets.len()) as u64)
    }
}

// ---------------------------------------------------------------------------
// Scripted provider backend
// ---------------------------------------------------------------------------

/// Records calls and fails generation for configured file names.
#[derive(Default)]
pub struct ScriptedBackend {
    /// File names whose generation call should fail.
    pub fail_for: HashSet<String>,
    /// When true, title generation fails.
    pub fail_titles: bool,
    /// Attachment lists passed to each generate call, by display name.
    pub generate_calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedBackend {
    pub fn failing_for(names: &[&str]) -> Self {
        Self {
            fail_for: names.iter().map(|n| n.to_string()).collect(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl AttachmentGeneration for ScriptedBackend {
    async fn upload(
        &self,
        _data: Vec<u8>,
        mime_type: &str,
        display_name: &str,
    ) -> Result<ProviderAttachment> {
        Ok(ProviderAttachment {
            uri: display_name.to_string(),
            mime_type: mime_type.to_string(),
        })
    }

    async fn generate_with_attachments(
        &self,
        _prompts: &[String],
        attachments: &[ProviderAttachment],
    ) -> Result<String> {
        let names: Vec<String> = attachments.iter().map(|a| a.uri.clone()).collect();
        self.generate_calls.lock().unwrap().push(names.clone());

        if let Some(bad) = names.iter().find(|n| self.fail_for.contains(*n)) {
            return Err(Error::Inference(format!("provider rejected {}", bad)));
        }
        Ok(format!("# Notes from {}", names.join(" + ")))
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        if self.fail_titles {
            return Err(Error::Inference("title model unavailable".to_string()));
        }
        Ok("Generated Title".to_string())
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}
