//! `global-hotkey` binder for non-Windows desktops.

use super::binder::{BindError, HotkeyBinder, ModifierMask, WindowHandle};
use global_hotkey::hotkey::{Code, HotKey, Modifiers};
use global_hotkey::{Error as HotkeyError, GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use std::collections::HashMap;

/// Binds through the platform hotkey service wrapped by `global-hotkey`.
///
/// The OS manager is created on first bind so hosts without a display
/// server can still construct the binder.
#[derive(Default)]
pub struct GlobalHotkeyBinder {
    manager: Option<GlobalHotKeyManager>,
    bound: HashMap<i32, HotKey>,
}

impl GlobalHotkeyBinder {
    pub fn new() -> Self {
        Self::default()
    }

    fn manager(&mut self) -> Result<&GlobalHotKeyManager, BindError> {
        if self.manager.is_none() {
            let manager = GlobalHotKeyManager::new()
                .map_err(|err| BindError::Platform(err.to_string()))?;
            self.manager = Some(manager);
        }
        self.manager
            .as_ref()
            .ok_or_else(|| BindError::Platform("hotkey manager unavailable".to_string()))
    }
}

impl HotkeyBinder for GlobalHotkeyBinder {
    fn bind(
        &mut self,
        _owner: WindowHandle,
        id: i32,
        modifiers: ModifierMask,
        key_code: u32,
    ) -> Result<(), BindError> {
        let code = code_for_virtual_key(key_code).ok_or_else(|| {
            BindError::Platform(format!("virtual key 0x{key_code:02X} has no native mapping"))
        })?;
        let hotkey = HotKey::new(Some(native_modifiers(modifiers)), code);
        self.manager()?.register(hotkey).map_err(|err| match err {
            HotkeyError::AlreadyRegistered(_) => BindError::AlreadyRegistered,
            other => BindError::Platform(other.to_string()),
        })?;
        self.bound.insert(id, hotkey);
        Ok(())
    }

    fn unbind(&mut self, _owner: WindowHandle, id: i32) -> Result<(), BindError> {
        let Some(hotkey) = self.bound.remove(&id) else {
            return Ok(());
        };
        self.manager()?
            .unregister(hotkey)
            .map_err(|err| BindError::Platform(err.to_string()))
    }

    fn drain_activations(&mut self) -> Vec<i32> {
        let mut ids = Vec::new();
        while let Ok(event) = GlobalHotKeyEvent::receiver().try_recv() {
            if event.state != HotKeyState::Pressed {
                continue;
            }
            if let Some((id, _)) = self.bound.iter().find(|(_, hotkey)| hotkey.id() == event.id) {
                ids.push(*id);
            }
        }
        ids
    }
}

fn native_modifiers(mask: ModifierMask) -> Modifiers {
    let mut modifiers = Modifiers::empty();
    if mask.contains(ModifierMask::CONTROL) {
        modifiers |= Modifiers::CONTROL;
    }
    if mask.contains(ModifierMask::ALT) {
        modifiers |= Modifiers::ALT;
    }
    if mask.contains(ModifierMask::SHIFT) {
        modifiers |= Modifiers::SHIFT;
    }
    if mask.contains(ModifierMask::WIN) {
        modifiers |= Modifiers::META;
    }
    modifiers
}

const LETTER_CODES: [Code; 26] = [
    Code::KeyA, Code::KeyB, Code::KeyC, Code::KeyD, Code::KeyE, Code::KeyF, Code::KeyG,
    Code::KeyH, Code::KeyI, Code::KeyJ, Code::KeyK, Code::KeyL, Code::KeyM, Code::KeyN,
    Code::KeyO, Code::KeyP, Code::KeyQ, Code::KeyR, Code::KeyS, Code::KeyT, Code::KeyU,
    Code::KeyV, Code::KeyW, Code::KeyX, Code::KeyY, Code::KeyZ,
];

const DIGIT_CODES: [Code; 10] = [
    Code::Digit0, Code::Digit1, Code::Digit2, Code::Digit3, Code::Digit4,
    Code::Digit5, Code::Digit6, Code::Digit7, Code::Digit8, Code::Digit9,
];

const FUNCTION_CODES: [Code; 12] = [
    Code::F1, Code::F2, Code::F3, Code::F4, Code::F5, Code::F6,
    Code::F7, Code::F8, Code::F9, Code::F10, Code::F11, Code::F12,
];

/// Maps a Win32 virtual key code to a physical key code.
fn code_for_virtual_key(key_code: u32) -> Option<Code> {
    match key_code {
        0x41..=0x5A => Some(LETTER_CODES[(key_code - 0x41) as usize]),
        0x30..=0x39 => Some(DIGIT_CODES[(key_code - 0x30) as usize]),
        0x70..=0x7B => Some(FUNCTION_CODES[(key_code - 0x70) as usize]),
        0x20 => Some(Code::Space),
        0x0D => Some(Code::Enter),
        0x09 => Some(Code::Tab),
        0x08 => Some(Code::Backspace),
        0x2D => Some(Code::Insert),
        0x2E => Some(Code::Delete),
        0x24 => Some(Code::Home),
        0x23 => Some(Code::End),
        0x21 => Some(Code::PageUp),
        0x22 => Some(Code::PageDown),
        0x26 => Some(Code::ArrowUp),
        0x28 => Some(Code::ArrowDown),
        0x25 => Some(Code::ArrowLeft),
        0x27 => Some(Code::ArrowRight),
        0xC0 => Some(Code::Backquote),
        0xBD => Some(Code::Minus),
        0xBB => Some(Code::Equal),
        0xDB => Some(Code::BracketLeft),
        0xDD => Some(Code::BracketRight),
        0xBA => Some(Code::Semicolon),
        0xDE => Some(Code::Quote),
        0xBC => Some(Code::Comma),
        0xBE => Some(Code::Period),
        0xBF => Some(Code::Slash),
        0xDC => Some(Code::Backslash),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{code_for_virtual_key, native_modifiers};
    use crate::hotkey::ModifierMask;
    use global_hotkey::hotkey::{Code, Modifiers};

    #[test]
    fn maps_virtual_keys_to_codes() {
        assert_eq!(code_for_virtual_key(0x4A), Some(Code::KeyJ));
        assert_eq!(code_for_virtual_key(0x30), Some(Code::Digit0));
        assert_eq!(code_for_virtual_key(0x7B), Some(Code::F12));
        assert_eq!(code_for_virtual_key(0x20), Some(Code::Space));
        assert_eq!(code_for_virtual_key(0xFF), None);
    }

    #[test]
    fn maps_modifier_mask() {
        let modifiers = native_modifiers(ModifierMask::CONTROL | ModifierMask::WIN);
        assert!(modifiers.contains(Modifiers::CONTROL));
        assert!(modifiers.contains(Modifiers::META));
        assert!(!modifiers.contains(Modifiers::ALT));
    }
}
