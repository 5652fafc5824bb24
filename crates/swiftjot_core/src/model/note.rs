//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record persisted in `notes.json`.
//! - Provide title helpers for manual vs. derived titles.
//!
//! # Invariants
//! - `id` is generated once and never reassigned.
//! - Once `has_manual_title` is set, content edits never touch `title`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque stable identifier of one note.
pub type NoteId = String;

/// Title given to notes created without explicit input.
pub const DEFAULT_NOTE_TITLE: &str = "New Jot";

const DERIVED_TITLE_MAX_CHARS: usize = 40;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// One user note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Stable identity, UUID v4 text for notes created by this process.
    #[serde(default = "new_note_id", alias = "Id")]
    pub id: NoteId,
    #[serde(default = "default_title", alias = "Title")]
    pub title: String,
    #[serde(default, alias = "Content")]
    pub content: String,
    /// Set when the user edits the title directly; disables derivation.
    #[serde(default, alias = "HasManualTitle")]
    pub has_manual_title: bool,
}

impl Note {
    /// Creates an empty note with a generated id.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(new_note_id(), title, "")
    }

    /// Creates a note with a caller-provided id.
    ///
    /// Used by load paths where identity already exists on disk.
    pub fn with_id(
        id: impl Into<NoteId>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            has_manual_title: false,
        }
    }

    /// Replaces content, re-deriving the title unless it was set manually.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        if self.has_manual_title {
            return;
        }
        if let Some(title) = derive_title(&self.content) {
            self.title = title;
        }
    }

    /// Sets a user-chosen title and pins it against derivation.
    pub fn set_manual_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.has_manual_title = true;
    }
}

/// Derives a display title from the first non-blank content line.
///
/// Whitespace runs collapse to one space and the result is capped at
/// 40 characters. Returns `None` for blank content.
pub fn derive_title(content: &str) -> Option<String> {
    let line = content.lines().find(|line| !line.trim().is_empty())?;
    let normalized = WHITESPACE_RE.replace_all(line.trim(), " ");
    Some(normalized.chars().take(DERIVED_TITLE_MAX_CHARS).collect())
}

fn new_note_id() -> NoteId {
    Uuid::new_v4().to_string()
}

fn default_title() -> String {
    DEFAULT_NOTE_TITLE.to_string()
}
