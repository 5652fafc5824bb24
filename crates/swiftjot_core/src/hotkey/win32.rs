//! `RegisterHotKey` binder for Windows.

use super::binder::{classify_os_error, BindError, HotkeyBinder, ModifierMask, WindowHandle};
use windows_sys::Win32::Foundation::{GetLastError, HWND};
use windows_sys::Win32::UI::Input::KeyboardAndMouse::{RegisterHotKey, UnregisterHotKey};
use windows_sys::Win32::UI::WindowsAndMessaging::{PeekMessageW, MSG, PM_REMOVE, WM_HOTKEY};

/// Binds through user32; activations arrive as `WM_HOTKEY`.
#[derive(Debug, Default)]
pub struct Win32Binder;

impl Win32Binder {
    pub fn new() -> Self {
        Self
    }
}

fn hwnd(owner: WindowHandle) -> HWND {
    owner.0 as HWND
}

impl HotkeyBinder for Win32Binder {
    fn bind(
        &mut self,
        owner: WindowHandle,
        id: i32,
        modifiers: ModifierMask,
        key_code: u32,
    ) -> Result<(), BindError> {
        let ok = unsafe { RegisterHotKey(hwnd(owner), id, modifiers.bits(), key_code) };
        if ok == 0 {
            let code = unsafe { GetLastError() };
            return Err(classify_os_error(code));
        }
        Ok(())
    }

    fn unbind(&mut self, owner: WindowHandle, id: i32) -> Result<(), BindError> {
        let ok = unsafe { UnregisterHotKey(hwnd(owner), id) };
        if ok == 0 {
            let code = unsafe { GetLastError() };
            return Err(BindError::Os(code));
        }
        Ok(())
    }

    fn drain_activations(&mut self) -> Vec<i32> {
        let mut ids = Vec::new();
        // Null window filter: thread messages plus this thread's windows.
        let mut msg: MSG = unsafe { std::mem::zeroed() };
        while unsafe {
            PeekMessageW(&mut msg, std::ptr::null_mut(), WM_HOTKEY, WM_HOTKEY, PM_REMOVE)
        } != 0
        {
            ids.push(msg.wParam as i32);
        }
        ids
    }
}
