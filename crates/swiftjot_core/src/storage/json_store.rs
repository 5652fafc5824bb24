//! JSON file repositories for notes and settings.
//!
//! # Responsibility
//! - Own the on-disk shape of `notes.json` and `config.json`.
//! - Offer strict (`try_*`) and best-effort load paths.
//!
//! # Invariants
//! - A missing file is not an error; it reads as empty/default.
//! - Best-effort loads log a warning and return defaults on any failure.

use super::{write_atomic, StoreResult};
use crate::model::note::Note;
use crate::model::settings::AppSettings;
use log::{info, warn};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Persistence contract for the ordered note collection.
pub trait NoteRepository: Send + Sync {
    /// Reads all notes in stored order. Missing storage yields an empty list.
    fn load_notes(&self) -> StoreResult<Vec<Note>>;
    /// Replaces the stored collection with `notes`.
    fn save_notes(&self, notes: &[Note]) -> StoreResult<()>;
}

/// Note repository over a single JSON array file.
#[derive(Debug, Clone)]
pub struct JsonNoteRepository {
    path: PathBuf,
}

impl JsonNoteRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl NoteRepository for JsonNoteRepository {
    fn load_notes(&self) -> StoreResult<Vec<Note>> {
        let Some(raw) = read_optional(&self.path)? else {
            return Ok(Vec::new());
        };
        let notes: Option<Vec<Note>> = serde_json::from_slice(&raw)?;
        Ok(notes.unwrap_or_default())
    }

    fn save_notes(&self, notes: &[Note]) -> StoreResult<()> {
        let json = serde_json::to_vec_pretty(notes)?;
        write_atomic(&self.path, &json)?;
        info!(
            "event=notes_save module=storage status=ok count={} bytes={}",
            notes.len(),
            json.len()
        );
        Ok(())
    }
}

/// Settings file accessor.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads settings, surfacing io and parse errors.
    pub fn try_load(&self) -> StoreResult<AppSettings> {
        let Some(raw) = read_optional(&self.path)? else {
            return Ok(AppSettings::default());
        };
        let settings: Option<AppSettings> = serde_json::from_slice(&raw)?;
        Ok(settings.unwrap_or_default())
    }

    /// Reads settings, falling back to defaults on any failure.
    pub fn load(&self) -> AppSettings {
        match self.try_load() {
            Ok(settings) => settings,
            Err(err) => {
                warn!(
                    "event=settings_load module=storage status=fallback error={}",
                    err
                );
                AppSettings::default()
            }
        }
    }

    /// Replaces the settings file.
    pub fn save(&self, settings: &AppSettings) -> StoreResult<()> {
        let json = serde_json::to_vec_pretty(settings)?;
        write_atomic(&self.path, &json)
    }
}

fn read_optional(path: &Path) -> StoreResult<Option<Vec<u8>>> {
    match std::fs::read(path) {
        Ok(raw) => Ok(Some(raw)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}
