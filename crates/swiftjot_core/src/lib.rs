//! Core of the SwiftJot background note utility.
//!
//! Owns the OS coordination that makes the app a single background
//! utility: single-instance gating, the global show/hide hotkey and
//! debounced persistence of the note collection.

pub mod dispatch;
pub mod hotkey;
pub mod instance;
pub mod logging;
pub mod model;
pub mod persist;
pub mod service;
pub mod startup;
pub mod storage;

pub use dispatch::{ui_channel, UiAction, UiDispatcher, UiQueue};
pub use hotkey::{
    parse_accelerator, BindError, HotkeyBinder, HotkeyManager, HotkeyParseError, ModifierMask,
    RegistrationOutcome, WindowHandle,
};
pub use instance::{
    Acquired, CoordinationBackend, InstanceCoordinator, InstanceError, InstanceGuard,
    InstanceNames, WakeSignal,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{Note, NoteId};
pub use model::settings::{AppSettings, HotkeyConfig};
pub use persist::{PersistenceScheduler, SnapshotWriter, SAVE_DEBOUNCE};
pub use service::note_store::{NoteStore, FIRST_NOTE_TITLE};
pub use service::settings_service::SettingsService;
pub use startup::StartupRegistration;
pub use storage::{
    export_text, AppPaths, JsonNoteRepository, NoteRepository, SettingsStore, StoreError,
    StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
