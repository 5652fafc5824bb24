//! Settings record owner with save-on-change semantics.

use crate::model::settings::{AppSettings, HotkeyConfig};
use crate::storage::SettingsStore;
use log::warn;

/// Holds the loaded settings and re-saves them after each change.
///
/// Settings change rarely, so there is no debounce here. Save failures are
/// logged and dropped; the in-memory record stays authoritative.
pub struct SettingsService {
    store: SettingsStore,
    settings: AppSettings,
}

impl SettingsService {
    /// Loads settings once; missing or corrupt files yield defaults.
    pub fn load(store: SettingsStore) -> Self {
        let settings = store.load();
        Self { store, settings }
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn hotkey(&self) -> &HotkeyConfig {
        &self.settings.hotkey
    }

    pub fn set_close_to_tray(&mut self, close_to_tray: bool) {
        self.settings.close_to_tray = close_to_tray;
        self.save();
    }

    pub fn update_hotkey(&mut self, config: HotkeyConfig) {
        self.settings.hotkey = config;
        self.save();
    }

    fn save(&self) {
        if let Err(err) = self.store.save(&self.settings) {
            warn!(
                "event=settings_save module=service status=error error={}",
                err
            );
        }
    }
}
