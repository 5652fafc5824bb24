use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use swiftjot_core::hotkey::HOTKEY_ID;
use swiftjot_core::{
    parse_accelerator, BindError, HotkeyBinder, HotkeyConfig, HotkeyManager, ModifierMask,
    RegistrationOutcome, WindowHandle,
};

const OWNER: WindowHandle = WindowHandle(0x1234);

/// Simulated OS hotkey table shared between "applications".
#[derive(Default)]
struct FakeOs {
    // (modifiers, key) held by other processes.
    foreign: HashSet<(u32, u32)>,
    // Our bindings: (owner, id) -> combo.
    ours: HashMap<(isize, i32), (u32, u32)>,
    // Key codes the OS rejects with a generic error.
    broken_keys: HashSet<u32>,
    bind_calls: usize,
    pending_activations: Vec<i32>,
}

#[derive(Clone, Default)]
struct FakeBinder {
    os: Rc<RefCell<FakeOs>>,
}

impl FakeBinder {
    fn active_bindings(&self) -> usize {
        self.os.borrow().ours.len()
    }

    fn bound_combo(&self) -> Option<(u32, u32)> {
        self.os.borrow().ours.values().next().copied()
    }

    fn grab_foreign(&self, config: &HotkeyConfig) {
        self.os
            .borrow_mut()
            .foreign
            .insert((ModifierMask::from_config(config).bits(), config.key_code));
    }

    fn break_key(&self, key_code: u32) {
        self.os.borrow_mut().broken_keys.insert(key_code);
    }

    fn press(&self, id: i32) {
        self.os.borrow_mut().pending_activations.push(id);
    }
}

impl HotkeyBinder for FakeBinder {
    fn bind(
        &mut self,
        owner: WindowHandle,
        id: i32,
        modifiers: ModifierMask,
        key_code: u32,
    ) -> Result<(), BindError> {
        let mut os = self.os.borrow_mut();
        os.bind_calls += 1;
        let combo = (modifiers.bits(), key_code);
        if os.broken_keys.contains(&key_code) {
            return Err(BindError::Os(87));
        }
        if os.foreign.contains(&combo) || os.ours.contains_key(&(owner.0, id)) {
            return Err(BindError::AlreadyRegistered);
        }
        os.ours.insert((owner.0, id), combo);
        Ok(())
    }

    fn unbind(&mut self, owner: WindowHandle, id: i32) -> Result<(), BindError> {
        self.os.borrow_mut().ours.remove(&(owner.0, id));
        Ok(())
    }

    fn drain_activations(&mut self) -> Vec<i32> {
        std::mem::take(&mut self.os.borrow_mut().pending_activations)
    }
}

fn config(text: &str) -> HotkeyConfig {
    parse_accelerator(text).unwrap()
}

#[test]
fn register_binds_combined_modifier_mask() {
    let binder = FakeBinder::default();
    let mut manager = HotkeyManager::new(binder.clone());

    let outcome = manager.register(OWNER, &HotkeyConfig::default());

    assert_eq!(outcome, RegistrationOutcome::Success);
    assert!(manager.is_bound());
    assert_eq!(binder.bound_combo(), Some((0x0003, 0x20)));
    assert_eq!(manager.active_config(), Some(&HotkeyConfig::default()));
}

#[test]
fn registering_twice_never_leaves_two_bindings() {
    let binder = FakeBinder::default();
    let mut manager = HotkeyManager::new(binder.clone());

    manager.register(OWNER, &config("Ctrl+Alt+Space"));
    let second = manager.register(OWNER, &config("Ctrl+Shift+J"));

    assert_eq!(second, RegistrationOutcome::Success);
    assert_eq!(binder.active_bindings(), 1);
    assert_eq!(binder.bound_combo(), Some((0x0006, 0x4A)));
}

#[test]
fn failed_second_register_leaves_zero_bindings() {
    let binder = FakeBinder::default();
    let mut manager = HotkeyManager::new(binder.clone());
    let taken = config("Ctrl+Shift+K");
    binder.grab_foreign(&taken);

    manager.register(OWNER, &config("Ctrl+Alt+Space"));
    let outcome = manager.register(OWNER, &taken);

    assert_eq!(outcome, RegistrationOutcome::Conflict);
    assert_eq!(binder.active_bindings(), 0);
    assert!(!manager.is_bound());
    assert_eq!(manager.active_config(), None);
}

#[test]
fn conflict_and_generic_failure_are_distinct() {
    let binder = FakeBinder::default();
    let mut manager = HotkeyManager::new(binder.clone());
    let taken = config("Alt+F4");
    binder.grab_foreign(&taken);
    binder.break_key(0x51);

    let conflict = manager.register(OWNER, &taken);
    let failed = manager.register(OWNER, &config("Ctrl+Q"));

    assert_eq!(conflict, RegistrationOutcome::Conflict);
    assert_eq!(failed, RegistrationOutcome::Failed);
    assert_ne!(conflict.status_message(), failed.status_message());
}

#[test]
fn failed_reconfigure_restores_previous_binding() {
    let binder = FakeBinder::default();
    let mut manager = HotkeyManager::new(binder.clone());
    let config_a = config("Ctrl+Alt+Space");
    let config_b = config("Ctrl+Alt+N");
    binder.grab_foreign(&config_b);

    assert!(manager.register(OWNER, &config_a).is_success());
    let outcome = manager.reconfigure(OWNER, &config_b);

    assert_eq!(outcome, RegistrationOutcome::Conflict);
    assert!(manager.is_bound());
    assert_eq!(manager.active_config(), Some(&config_a));
    assert_eq!(binder.active_bindings(), 1);
    assert_eq!(binder.bound_combo(), Some((0x0003, 0x20)));
}

#[test]
fn successful_reconfigure_discards_previous_binding() {
    let binder = FakeBinder::default();
    let mut manager = HotkeyManager::new(binder.clone());
    let config_b = config("Win+Shift+J");

    manager.register(OWNER, &config("Ctrl+Alt+Space"));
    let outcome = manager.reconfigure(OWNER, &config_b);

    assert_eq!(outcome, RegistrationOutcome::Success);
    assert_eq!(manager.active_config(), Some(&config_b));
    assert_eq!(binder.active_bindings(), 1);
    assert_eq!(binder.bound_combo(), Some((0x000C, 0x4A)));
}

#[test]
fn failed_restore_reports_first_attempt_outcome() {
    let binder = FakeBinder::default();
    let mut manager = HotkeyManager::new(binder.clone());
    let config_a = config("Ctrl+Alt+Space");

    manager.register(OWNER, &config_a);
    // Another application grabs A while we try B, and B's key is broken.
    binder.grab_foreign(&config_a);
    binder.break_key(0x42);
    let outcome = manager.reconfigure(OWNER, &config("Ctrl+B"));

    assert_eq!(outcome, RegistrationOutcome::Failed);
    assert!(!manager.is_bound());
    assert_eq!(binder.active_bindings(), 0);
}

#[test]
fn reconfigure_from_unbound_has_nothing_to_restore() {
    let binder = FakeBinder::default();
    let mut manager = HotkeyManager::new(binder.clone());
    let taken = config("Ctrl+Alt+T");
    binder.grab_foreign(&taken);

    assert_eq!(
        manager.reconfigure(OWNER, &taken),
        RegistrationOutcome::Conflict
    );
    assert_eq!(binder.os.borrow().bind_calls, 1);
}

#[test]
fn config_without_key_identity_is_never_bound() {
    let binder = FakeBinder::default();
    let mut manager = HotkeyManager::new(binder.clone());
    let bare = HotkeyConfig {
        use_ctrl: false,
        use_alt: false,
        use_shift: false,
        use_win: false,
        key_code: 0x41,
        key_display_name: String::new(),
    };

    assert_eq!(manager.register(OWNER, &bare), RegistrationOutcome::Failed);
    assert_eq!(binder.os.borrow().bind_calls, 0);
    assert_eq!(binder.active_bindings(), 0);
}

#[test]
fn unregister_and_drop_release_binding_once() {
    let binder = FakeBinder::default();
    {
        let mut manager = HotkeyManager::new(binder.clone());
        manager.register(OWNER, &HotkeyConfig::default());
        manager.unregister();
        manager.unregister();
        assert_eq!(binder.active_bindings(), 0);

        manager.register(OWNER, &HotkeyConfig::default());
        assert_eq!(binder.active_bindings(), 1);
    }
    assert_eq!(binder.active_bindings(), 0);
}

#[test]
fn poll_reports_activation_of_bound_hotkey_only() {
    let binder = FakeBinder::default();
    let mut manager = HotkeyManager::new(binder.clone());

    binder.press(HOTKEY_ID);
    assert!(!manager.poll_activated());

    manager.register(OWNER, &HotkeyConfig::default());
    binder.press(42);
    assert!(!manager.poll_activated());
    binder.press(HOTKEY_ID);
    assert!(manager.poll_activated());
    assert!(!manager.poll_activated());
}
