//! Persisted application settings.
//!
//! # Responsibility
//! - Define the single settings record stored in `config.json`.
//! - Describe the configured global hotkey combination.
//!
//! # Invariants
//! - Absent fields deserialize to the defaults below, so older files load.
//! - PascalCase keys written by earlier desktop builds are accepted on read.

use serde::{Deserialize, Serialize};

/// Virtual key code of the space bar.
pub const VK_SPACE: u32 = 0x20;

/// Global hotkey combination as configured by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HotkeyConfig {
    #[serde(alias = "UseCtrl")]
    pub use_ctrl: bool,
    #[serde(alias = "UseAlt")]
    pub use_alt: bool,
    #[serde(alias = "UseShift")]
    pub use_shift: bool,
    #[serde(alias = "UseWin")]
    pub use_win: bool,
    /// Platform virtual key code, independent of modifiers.
    #[serde(alias = "KeyCode")]
    pub key_code: u32,
    /// Human-readable key label, independent of modifiers.
    #[serde(alias = "KeyDisplayName")]
    pub key_display_name: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            use_ctrl: true,
            use_alt: true,
            use_shift: false,
            use_win: false,
            key_code: VK_SPACE,
            key_display_name: "Space".to_string(),
        }
    }
}

impl HotkeyConfig {
    /// Returns whether at least one modifier flag is set.
    pub fn has_modifiers(&self) -> bool {
        self.use_ctrl || self.use_alt || self.use_shift || self.use_win
    }

    /// Returns whether this config names a key the OS can bind.
    ///
    /// A config with neither modifiers nor a display name, or with key code
    /// `0`, carries no usable key identity.
    pub fn has_key_identity(&self) -> bool {
        if self.key_code == 0 {
            return false;
        }
        self.has_modifiers() || !self.key_display_name.trim().is_empty()
    }

    /// Renders the combination as `Ctrl + Alt + Space`.
    pub fn display_string(&self) -> String {
        let mut parts = Vec::with_capacity(5);
        if self.use_ctrl {
            parts.push("Ctrl");
        }
        if self.use_alt {
            parts.push("Alt");
        }
        if self.use_shift {
            parts.push("Shift");
        }
        if self.use_win {
            parts.push("Win");
        }
        parts.push(self.key_display_name.as_str());
        parts.join(" + ")
    }
}

/// User settings record; saved on every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    /// Closing the window hides it instead of exiting.
    #[serde(alias = "CloseToTray")]
    pub close_to_tray: bool,
    #[serde(alias = "HotKey")]
    pub hotkey: HotkeyConfig,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            close_to_tray: true,
            hotkey: HotkeyConfig::default(),
        }
    }
}
