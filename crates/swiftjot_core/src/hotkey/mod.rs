//! Global show/hide hotkey.
//!
//! # Responsibility
//! - Bind one system-wide key combination for the owning window.
//! - Classify binding failures into conflict vs. generic failure.
//! - Swap combinations without leaving the user without a working hotkey.
//!
//! # Invariants
//! - A manager holds at most one OS binding at any time.
//! - OS error codes are classified at the binder boundary; the manager only
//!   sees `BindError`.

mod accelerator;
mod binder;
mod manager;
#[cfg(not(windows))]
mod native;
#[cfg(windows)]
mod win32;

pub use accelerator::{parse_accelerator, virtual_key_code, HotkeyParseError};
pub use binder::{
    classify_os_error, BindError, HotkeyBinder, ModifierMask, WindowHandle,
    ERROR_HOTKEY_ALREADY_REGISTERED, HOTKEY_ID,
};
pub use manager::{HotkeyManager, RegistrationOutcome};
#[cfg(not(windows))]
pub use native::GlobalHotkeyBinder as PlatformBinder;
#[cfg(windows)]
pub use win32::Win32Binder as PlatformBinder;
