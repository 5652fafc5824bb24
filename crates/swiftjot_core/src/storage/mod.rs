//! Durable JSON storage for notes and settings.
//!
//! # Responsibility
//! - Resolve per-user application data locations.
//! - Read and replace whole JSON documents on disk.
//!
//! # Invariants
//! - Loads never fail outward: missing or corrupt files yield defaults.
//! - Saves replace the target file atomically; a crash mid-write leaves the
//!   previous document intact.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::path::Path;

mod json_store;
mod paths;

pub use json_store::{JsonNoteRepository, NoteRepository, SettingsStore};
pub use paths::{AppPaths, APP_DIR_NAME, DATA_DIR_ENV};

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence failure for one load or save.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Serde(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "storage io error: {err}"),
            Self::Serde(err) => write!(f, "storage serialization error: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serde(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

/// Replaces `path` with `bytes` via a sibling temp file and rename.
///
/// Creates the parent directory when missing.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut staged = tempfile::NamedTempFile::new_in(parent)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|err| StoreError::Io(err.error))?;
    Ok(())
}

/// Writes exported note text verbatim, replacing any existing file.
///
/// No extension-based formatting is applied.
pub fn export_text(path: impl AsRef<Path>, content: &str) -> std::io::Result<()> {
    std::fs::write(path, content.as_bytes())
}
