//! Domain model for notes and persisted user settings.
//!
//! # Responsibility
//! - Define the records that cross the persistence boundary.
//! - Keep serialized field names stable across releases.
//!
//! # Invariants
//! - Every note is identified by an immutable opaque `NoteId`.
//! - Missing fields in persisted records fall back to model defaults.

pub mod note;
pub mod settings;
