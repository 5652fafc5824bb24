//! Ownership claim, second-launch signalling and wake listener.

use super::{InstanceError, InstanceNames, InstanceResult};
use log::{debug, error, info, warn};
use std::thread;

const LISTENER_THREAD_NAME: &str = "swiftjot-instance-listener";

/// Blocking receiver side of the wake signal.
pub trait WakeSignal: Send + 'static {
    /// Blocks until one fire is observed and consumes it.
    fn wait(&mut self) -> InstanceResult<()>;
}

/// Platform primitives behind the coordinator.
pub trait CoordinationBackend {
    /// Held for as long as the process owns the application.
    type Token: Send + 'static;
    type Signal: WakeSignal;

    /// Atomically creates and owns `name`. `None` when another process owns it.
    fn claim_ownership(&self, name: &str) -> InstanceResult<Option<Self::Token>>;

    /// Creates the wake signal so later launches can open it.
    fn create_signal(&self, name: &str) -> InstanceResult<Self::Signal>;

    /// Opens the existing signal `name` and fires it once.
    fn fire_signal(&self, name: &str) -> InstanceResult<()>;
}

/// Proof of ownership; keeps the ownership token alive.
pub struct InstanceGuard {
    _token: Box<dyn Send>,
    listening: bool,
}

impl InstanceGuard {
    /// Whether the wake listener is running.
    pub fn is_listening(&self) -> bool {
        self.listening
    }
}

/// Result of [`InstanceCoordinator::acquire`].
pub enum Acquired {
    /// This process owns the application and keeps running.
    Owner(InstanceGuard),
    /// Another process owns it and was signalled; exit without further work.
    NotOwner,
}

impl Acquired {
    pub fn is_owner(&self) -> bool {
        matches!(self, Self::Owner(_))
    }
}

/// Gatekeeper run before anything else in the process.
pub struct InstanceCoordinator<B: CoordinationBackend> {
    backend: B,
    names: InstanceNames,
}

impl<B: CoordinationBackend> InstanceCoordinator<B> {
    pub fn new(backend: B, names: InstanceNames) -> Self {
        Self { backend, names }
    }

    /// Claims ownership or signals the current owner.
    ///
    /// As owner, spawns a listener thread that calls `on_wake` once per
    /// fired signal for the rest of the process lifetime. `on_wake` runs on
    /// that thread and must hand UI work to the interactive thread.
    ///
    /// # Errors
    /// - Returns an error only when the ownership claim itself fails; callers
    ///   should then continue as the sole instance.
    pub fn acquire<F>(&self, on_wake: F) -> InstanceResult<Acquired>
    where
        F: Fn() + Send + 'static,
    {
        let Some(token) = self.backend.claim_ownership(&self.names.ownership)? else {
            match self.backend.fire_signal(&self.names.wake) {
                Ok(()) => {
                    info!("event=instance_acquire module=instance status=not_owner signal=sent")
                }
                // Owner may not have created its signal yet; the attempt is dropped.
                Err(err) => debug!(
                    "event=instance_acquire module=instance status=not_owner signal=dropped error={}",
                    err
                ),
            }
            return Ok(Acquired::NotOwner);
        };

        let listening = match self.backend.create_signal(&self.names.wake) {
            Ok(signal) => spawn_listener(signal, on_wake),
            Err(err) => {
                warn!(
                    "event=instance_listen module=instance status=error error_code=signal_create_failed error={}",
                    err
                );
                false
            }
        };
        info!(
            "event=instance_acquire module=instance status=owner listening={}",
            listening
        );

        Ok(Acquired::Owner(InstanceGuard {
            _token: Box::new(token),
            listening,
        }))
    }
}

fn spawn_listener<S, F>(mut signal: S, on_wake: F) -> bool
where
    S: WakeSignal,
    F: Fn() + Send + 'static,
{
    let spawned = thread::Builder::new()
        .name(LISTENER_THREAD_NAME.to_string())
        .spawn(move || loop {
            match signal.wait() {
                Ok(()) => {
                    debug!("event=instance_wake module=instance status=ok");
                    on_wake();
                }
                Err(err) => {
                    error!(
                        "event=instance_wake module=instance status=error error={}",
                        err
                    );
                    return;
                }
            }
        });
    match spawned {
        Ok(_) => true,
        Err(err) => {
            warn!(
                "event=instance_listen module=instance status=error error_code=spawn_failed error={}",
                InstanceError::Io(err)
            );
            false
        }
    }
}
