//! Named mutex and auto-reset event coordination for Windows.

use super::coordinator::{CoordinationBackend, WakeSignal};
use super::{InstanceError, InstanceResult};
use windows_sys::Win32::Foundation::{
    CloseHandle, GetLastError, ERROR_ALREADY_EXISTS, HANDLE, WAIT_OBJECT_0,
};
use windows_sys::Win32::System::Threading::{
    CreateEventW, CreateMutexW, OpenEventW, ReleaseMutex, SetEvent, WaitForSingleObject,
    EVENT_MODIFY_STATE, INFINITE,
};

/// Session-local named kernel objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamedObjectBackend;

impl NamedObjectBackend {
    pub fn new() -> Self {
        Self
    }
}

/// Owned named mutex handle.
pub struct NamedMutex(HANDLE);

// Kernel handles are process-wide and usable from any thread.
unsafe impl Send for NamedMutex {}

impl Drop for NamedMutex {
    fn drop(&mut self) {
        unsafe {
            ReleaseMutex(self.0);
            CloseHandle(self.0);
        }
    }
}

/// Owned named auto-reset event handle.
pub struct NamedEvent(HANDLE);

unsafe impl Send for NamedEvent {}

impl Drop for NamedEvent {
    fn drop(&mut self) {
        unsafe {
            CloseHandle(self.0);
        }
    }
}

fn session_name(name: &str) -> Vec<u16> {
    format!("Local\\{name}")
        .encode_utf16()
        .chain(std::iter::once(0))
        .collect()
}

fn last_error() -> u32 {
    unsafe { GetLastError() }
}

impl CoordinationBackend for NamedObjectBackend {
    type Token = NamedMutex;
    type Signal = NamedEvent;

    fn claim_ownership(&self, name: &str) -> InstanceResult<Option<Self::Token>> {
        let wide = session_name(name);
        let handle = unsafe { CreateMutexW(std::ptr::null(), 1, wide.as_ptr()) };
        if handle.is_null() {
            return Err(InstanceError::Os(last_error()));
        }
        if last_error() == ERROR_ALREADY_EXISTS {
            unsafe {
                CloseHandle(handle);
            }
            return Ok(None);
        }
        Ok(Some(NamedMutex(handle)))
    }

    fn create_signal(&self, name: &str) -> InstanceResult<Self::Signal> {
        let wide = session_name(name);
        let handle = unsafe { CreateEventW(std::ptr::null(), 0, 0, wide.as_ptr()) };
        if handle.is_null() {
            return Err(InstanceError::Os(last_error()));
        }
        Ok(NamedEvent(handle))
    }

    fn fire_signal(&self, name: &str) -> InstanceResult<()> {
        let wide = session_name(name);
        let handle = unsafe { OpenEventW(EVENT_MODIFY_STATE, 0, wide.as_ptr()) };
        if handle.is_null() {
            return Err(InstanceError::SignalUnavailable);
        }
        let event = NamedEvent(handle);
        if unsafe { SetEvent(event.0) } == 0 {
            return Err(InstanceError::Os(last_error()));
        }
        Ok(())
    }
}

impl WakeSignal for NamedEvent {
    fn wait(&mut self) -> InstanceResult<()> {
        let status = unsafe { WaitForSingleObject(self.0, INFINITE) };
        if status == WAIT_OBJECT_0 {
            Ok(())
        } else {
            Err(InstanceError::Os(last_error()))
        }
    }
}
