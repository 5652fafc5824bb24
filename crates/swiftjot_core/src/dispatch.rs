//! Hand-off queue onto the interactive thread.
//!
//! # Responsibility
//! - Carry UI actions from background threads (instance listener, hotkey
//!   pump, input readers) to the thread that owns UI state.
//!
//! # Invariants
//! - Posting never blocks and never touches UI state directly.
//! - Actions are delivered in posting order per sender.

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

/// Work the interactive thread performs on request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    /// Show, activate and raise the main window.
    ShowWindow,
    /// One line of user input for the host's command handler.
    Command(String),
    /// Shut down the interactive loop.
    Quit,
}

/// Thread-safe posting handle.
#[derive(Debug, Clone)]
pub struct UiDispatcher {
    sender: Sender<UiAction>,
}

impl UiDispatcher {
    /// Queues `action`; false once the interactive side has gone away.
    pub fn post(&self, action: UiAction) -> bool {
        self.sender.send(action).is_ok()
    }
}

/// Receiving end owned by the interactive thread.
#[derive(Debug)]
pub struct UiQueue {
    receiver: Receiver<UiAction>,
}

impl UiQueue {
    /// Next queued action without waiting.
    pub fn try_next(&self) -> Option<UiAction> {
        self.receiver.try_recv().ok()
    }

    /// Waits up to `timeout` for the next action.
    ///
    /// Returns `Some(UiAction::Quit)` when every dispatcher was dropped.
    pub fn next_timeout(&self, timeout: Duration) -> Option<UiAction> {
        match self.receiver.recv_timeout(timeout) {
            Ok(action) => Some(action),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(UiAction::Quit),
        }
    }

    /// Takes every action queued so far.
    pub fn drain(&self) -> Vec<UiAction> {
        self.receiver.try_iter().collect()
    }
}

/// Creates a connected dispatcher/queue pair.
pub fn ui_channel() -> (UiDispatcher, UiQueue) {
    let (sender, receiver) = crossbeam_channel::unbounded();
    (UiDispatcher { sender }, UiQueue { receiver })
}
