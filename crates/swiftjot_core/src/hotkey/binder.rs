//! OS binding seam for the global hotkey.

use crate::model::settings::HotkeyConfig;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::ops::BitOr;

/// Binding id used for the show/hide hotkey.
pub const HOTKEY_ID: i32 = 9000;

/// Win32 last-error code for a combination held by another process.
pub const ERROR_HOTKEY_ALREADY_REGISTERED: u32 = 1409;

/// Opaque native handle of the window that owns the binding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub isize);

impl WindowHandle {
    /// No owning window; activations go to the registering thread.
    pub const NONE: Self = Self(0);
}

/// Modifier bitmask in Win32 `MOD_*` layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ModifierMask(u32);

impl ModifierMask {
    pub const NONE: Self = Self(0);
    pub const ALT: Self = Self(0x0001);
    pub const CONTROL: Self = Self(0x0002);
    pub const SHIFT: Self = Self(0x0004);
    pub const WIN: Self = Self(0x0008);

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Combines the config's modifier flags into one mask.
    pub fn from_config(config: &HotkeyConfig) -> Self {
        let mut mask = Self::NONE;
        if config.use_ctrl {
            mask = mask | Self::CONTROL;
        }
        if config.use_alt {
            mask = mask | Self::ALT;
        }
        if config.use_shift {
            mask = mask | Self::SHIFT;
        }
        if config.use_win {
            mask = mask | Self::WIN;
        }
        mask
    }
}

impl BitOr for ModifierMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

/// Classified failure of one OS binding call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// The combination is held by another application.
    AlreadyRegistered,
    /// Any other OS failure, with its raw error code.
    Os(u32),
    /// The platform cannot express or service the request.
    Platform(String),
}

impl Display for BindError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyRegistered => {
                write!(f, "hotkey already registered by another application")
            }
            Self::Os(code) => write!(f, "hotkey os call failed with error {code}"),
            Self::Platform(message) => write!(f, "hotkey platform error: {message}"),
        }
    }
}

impl Error for BindError {}

/// Maps a raw OS last-error code to a binding failure.
pub fn classify_os_error(code: u32) -> BindError {
    if code == ERROR_HOTKEY_ALREADY_REGISTERED {
        BindError::AlreadyRegistered
    } else {
        BindError::Os(code)
    }
}

/// Native global-hotkey binding calls.
///
/// Implementations are used from the owning window's thread only.
pub trait HotkeyBinder {
    /// Binds `modifiers + key_code` under `id` for `owner`.
    fn bind(
        &mut self,
        owner: WindowHandle,
        id: i32,
        modifiers: ModifierMask,
        key_code: u32,
    ) -> Result<(), BindError>;

    /// Releases the binding registered under `id`.
    fn unbind(&mut self, owner: WindowHandle, id: i32) -> Result<(), BindError>;

    /// Drains pending activation events and returns their binding ids.
    fn drain_activations(&mut self) -> Vec<i32>;
}
