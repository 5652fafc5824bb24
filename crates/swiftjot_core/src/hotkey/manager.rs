//! Single-binding hotkey state machine.

use super::binder::{BindError, HotkeyBinder, ModifierMask, WindowHandle, HOTKEY_ID};
use crate::model::settings::HotkeyConfig;
use log::{debug, info, warn};

const CONFLICT_MESSAGE: &str = "⚠ Hotkey is already in use by another application";
const FAILED_MESSAGE: &str = "⚠ Failed to register hotkey";

/// Result of one registration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Success,
    /// Another application holds the combination.
    Conflict,
    /// Any other failure, including rejected configs.
    Failed,
}

impl RegistrationOutcome {
    pub fn is_success(self) -> bool {
        self == Self::Success
    }

    /// User-visible status text; `None` on success.
    pub fn status_message(self) -> Option<&'static str> {
        match self {
            Self::Success => None,
            Self::Conflict => Some(CONFLICT_MESSAGE),
            Self::Failed => Some(FAILED_MESSAGE),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Conflict => "conflict",
            Self::Failed => "failed",
        }
    }
}

impl From<&BindError> for RegistrationOutcome {
    fn from(value: &BindError) -> Self {
        match value {
            BindError::AlreadyRegistered => Self::Conflict,
            BindError::Os(_) | BindError::Platform(_) => Self::Failed,
        }
    }
}

#[derive(Debug)]
enum RegistrationState {
    Unbound,
    Bound {
        owner: WindowHandle,
        config: HotkeyConfig,
    },
}

/// Owns the show/hide hotkey binding for one window.
///
/// Not thread-safe by contract: call from the owning window's thread.
pub struct HotkeyManager<B: HotkeyBinder> {
    binder: B,
    state: RegistrationState,
}

impl<B: HotkeyBinder> HotkeyManager<B> {
    pub fn new(binder: B) -> Self {
        Self {
            binder,
            state: RegistrationState::Unbound,
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.state, RegistrationState::Bound { .. })
    }

    /// Config of the active binding, if any.
    pub fn active_config(&self) -> Option<&HotkeyConfig> {
        match &self.state {
            RegistrationState::Bound { config, .. } => Some(config),
            RegistrationState::Unbound => None,
        }
    }

    /// Replaces any active binding with `config`.
    ///
    /// The existing binding is always released first, whatever the outcome
    /// of the new attempt.
    pub fn register(&mut self, owner: WindowHandle, config: &HotkeyConfig) -> RegistrationOutcome {
        self.unregister();

        if !config.has_key_identity() {
            warn!(
                "event=hotkey_register module=hotkey status=rejected reason=no_key_identity key_code={}",
                config.key_code
            );
            return RegistrationOutcome::Failed;
        }

        let modifiers = ModifierMask::from_config(config);
        match self
            .binder
            .bind(owner, HOTKEY_ID, modifiers, config.key_code)
        {
            Ok(()) => {
                info!(
                    "event=hotkey_register module=hotkey status=ok combo=\"{}\"",
                    config.display_string()
                );
                self.state = RegistrationState::Bound {
                    owner,
                    config: config.clone(),
                };
                RegistrationOutcome::Success
            }
            Err(err) => {
                let outcome = RegistrationOutcome::from(&err);
                warn!(
                    "event=hotkey_register module=hotkey status={} combo=\"{}\" error={}",
                    outcome.as_str(),
                    config.display_string(),
                    err
                );
                outcome
            }
        }
    }

    /// Switches to `config`, restoring the previous binding on failure.
    ///
    /// The returned outcome is always that of the `config` attempt; a failed
    /// restore is logged only.
    pub fn reconfigure(
        &mut self,
        owner: WindowHandle,
        config: &HotkeyConfig,
    ) -> RegistrationOutcome {
        let previous = self.active_config().cloned();
        let outcome = self.register(owner, config);
        if outcome.is_success() {
            return outcome;
        }

        if let Some(previous) = previous {
            let restored = self.register(owner, &previous);
            if restored.is_success() {
                info!("event=hotkey_restore module=hotkey status=ok");
            } else {
                warn!(
                    "event=hotkey_restore module=hotkey status={}",
                    restored.as_str()
                );
            }
        }
        outcome
    }

    /// Releases the active binding; no-op when unbound.
    pub fn unregister(&mut self) {
        let RegistrationState::Bound { owner, .. } =
            std::mem::replace(&mut self.state, RegistrationState::Unbound)
        else {
            return;
        };
        match self.binder.unbind(owner, HOTKEY_ID) {
            Ok(()) => debug!("event=hotkey_unregister module=hotkey status=ok"),
            Err(err) => warn!(
                "event=hotkey_unregister module=hotkey status=error error={}",
                err
            ),
        }
    }

    /// Returns whether a raw binding id belongs to this manager's hotkey.
    pub fn is_hotkey_message(&self, id: i32) -> bool {
        self.is_bound() && id == HOTKEY_ID
    }

    /// Drains OS activation events; true when the bound hotkey fired.
    pub fn poll_activated(&mut self) -> bool {
        let ids = self.binder.drain_activations();
        ids.into_iter().any(|id| self.is_hotkey_message(id))
    }
}

impl<B: HotkeyBinder> Drop for HotkeyManager<B> {
    fn drop(&mut self) {
        self.unregister();
    }
}

#[cfg(test)]
mod tests {
    use super::RegistrationOutcome;
    use crate::hotkey::BindError;

    #[test]
    fn status_messages_distinguish_conflict_from_failure() {
        assert_eq!(RegistrationOutcome::Success.status_message(), None);
        let conflict = RegistrationOutcome::Conflict.status_message().expect("message");
        let failed = RegistrationOutcome::Failed.status_message().expect("message");
        assert_ne!(conflict, failed);
        assert!(conflict.contains("already in use"));
    }

    #[test]
    fn bind_errors_map_to_outcomes() {
        assert_eq!(
            RegistrationOutcome::from(&BindError::AlreadyRegistered),
            RegistrationOutcome::Conflict
        );
        assert_eq!(
            RegistrationOutcome::from(&BindError::Os(87)),
            RegistrationOutcome::Failed
        );
        assert_eq!(
            RegistrationOutcome::from(&BindError::Platform("no display".to_string())),
            RegistrationOutcome::Failed
        );
    }
}
