//! Use-case services owned by the interactive thread.
//!
//! # Responsibility
//! - Hold the in-memory note collection and settings record.
//! - Route every mutation to its persistence path.

pub mod note_store;
pub mod settings_service;
