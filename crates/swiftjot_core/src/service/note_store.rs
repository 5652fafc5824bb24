//! In-memory note collection with debounced persistence.
//!
//! # Responsibility
//! - Load the collection once and keep it as the session source of truth.
//! - Apply user edits and schedule a snapshot save after each one.
//!
//! # Invariants
//! - The collection is never empty; the last note cannot be deleted.
//! - `selected` always indexes an existing note.
//! - Every mutation hands the scheduler an owned copy of the collection.

use crate::model::note::Note;
use crate::persist::{PersistenceScheduler, SnapshotWriter, SAVE_DEBOUNCE};
use crate::storage::{export_text, NoteRepository, StoreResult};
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Title of the note seeded into an empty store.
pub const FIRST_NOTE_TITLE: &str = "My First Jot";

struct RepositoryWriter(Arc<dyn NoteRepository>);

impl SnapshotWriter<Vec<Note>> for RepositoryWriter {
    fn write_snapshot(&self, snapshot: &Vec<Note>) -> StoreResult<()> {
        self.0.save_notes(snapshot)
    }
}

/// Owner of the note collection and its selection.
pub struct NoteStore {
    notes: Vec<Note>,
    selected: usize,
    scheduler: PersistenceScheduler<Vec<Note>>,
}

impl NoteStore {
    /// Loads notes from `repo` and selects the first one.
    ///
    /// Missing or unreadable storage yields a single "My First Jot" note.
    pub fn load(repo: Arc<dyn NoteRepository>) -> Self {
        Self::load_with_delay(repo, SAVE_DEBOUNCE)
    }

    /// Same as [`load`](Self::load) with a custom debounce window.
    pub fn load_with_delay(repo: Arc<dyn NoteRepository>, delay: Duration) -> Self {
        let mut notes = match repo.load_notes() {
            Ok(notes) => notes,
            Err(err) => {
                warn!(
                    "event=notes_load module=service status=fallback error={}",
                    err
                );
                Vec::new()
            }
        };
        if notes.is_empty() {
            notes.push(Note::new(FIRST_NOTE_TITLE));
        }
        info!(
            "event=notes_load module=service status=ok count={}",
            notes.len()
        );

        let writer: Arc<dyn SnapshotWriter<Vec<Note>>> = Arc::new(RepositoryWriter(repo));
        Self {
            notes,
            selected: 0,
            scheduler: PersistenceScheduler::with_delay(writer, delay),
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Never true for a loaded store.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn selected(&self) -> &Note {
        &self.notes[self.selected]
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Selects the note with `id`. Returns false when no such note exists.
    pub fn select(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(index) => {
                self.selected = index;
                true
            }
            None => false,
        }
    }

    /// Selects by position. Returns false when out of range.
    pub fn select_index(&mut self, index: usize) -> bool {
        if index >= self.notes.len() {
            return false;
        }
        self.selected = index;
        true
    }

    /// Appends a `Jot N` note, selects it and schedules a save.
    pub fn add_note(&mut self) -> &Note {
        let note = Note::new(format!("Jot {}", self.notes.len() + 1));
        self.notes.push(note);
        self.selected = self.notes.len() - 1;
        self.schedule_save();
        &self.notes[self.selected]
    }

    /// Deletes the selected note unless it is the last one.
    pub fn delete_selected(&mut self) -> bool {
        let id = self.selected().id.clone();
        self.delete_note(&id)
    }

    /// Deletes one note by id unless it is the last one.
    ///
    /// Deleting the selected note selects its predecessor.
    pub fn delete_note(&mut self, id: &str) -> bool {
        if self.notes.len() <= 1 {
            return false;
        }
        let Some(index) = self.position(id) else {
            return false;
        };

        self.notes.remove(index);
        if index == self.selected {
            self.selected = index.saturating_sub(1);
        } else if index < self.selected {
            self.selected -= 1;
        }
        self.schedule_save();
        true
    }

    /// Replaces the selected note's content and schedules a save.
    pub fn set_selected_content(&mut self, content: impl Into<String>) {
        self.notes[self.selected].set_content(content);
        self.schedule_save();
    }

    /// Sets a manual title on the selected note and schedules a save.
    pub fn set_selected_title(&mut self, title: impl Into<String>) {
        self.notes[self.selected].set_manual_title(title);
        self.schedule_save();
    }

    /// Writes the selected note's content verbatim to `path`.
    pub fn export_selected(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let path = path.as_ref();
        export_text(path, &self.selected().content)?;
        info!(
            "event=note_export module=service status=ok bytes={}",
            self.selected().content.len()
        );
        Ok(())
    }

    /// Persists any pending snapshot immediately.
    pub fn flush(&self) -> bool {
        self.scheduler.flush()
    }

    pub fn has_pending_save(&self) -> bool {
        self.scheduler.is_pending()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.notes.iter().position(|note| note.id == id)
    }

    fn schedule_save(&self) {
        self.scheduler.schedule_save(self.notes.clone())
    }
}
