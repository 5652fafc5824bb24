//! Single-instance coordination.
//!
//! # Responsibility
//! - Decide which process owns the application identity.
//! - Let later launches wake the owner instead of starting a duplicate.
//!
//! # Invariants
//! - Exactly one process observes itself as creator of the ownership token.
//! - One fired wake signal yields exactly one `on_wake` call in the owner.
//! - Coordination failures never terminate the process.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod coordinator;
#[cfg(unix)]
mod socket;
#[cfg(windows)]
mod win32;

pub use coordinator::{
    Acquired, CoordinationBackend, InstanceCoordinator, InstanceGuard, WakeSignal,
};
#[cfg(unix)]
pub use socket::SocketBackend as PlatformBackend;
#[cfg(windows)]
pub use win32::NamedObjectBackend as PlatformBackend;

/// Well-known name of the ownership token.
pub const OWNERSHIP_NAME: &str = "SwiftJot.SingleInstance";
/// Well-known name of the wake signal.
pub const WAKE_NAME: &str = "SwiftJot.ShowWindow";

/// Names of the two process-external coordination objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceNames {
    pub ownership: String,
    pub wake: String,
}

impl Default for InstanceNames {
    fn default() -> Self {
        Self {
            ownership: OWNERSHIP_NAME.to_string(),
            wake: WAKE_NAME.to_string(),
        }
    }
}

pub type InstanceResult<T> = Result<T, InstanceError>;

/// Coordination failure.
#[derive(Debug)]
pub enum InstanceError {
    Io(std::io::Error),
    /// Raw OS error code from a named-object call.
    Os(u32),
    /// The wake signal of the owner cannot be opened (yet).
    SignalUnavailable,
    /// A named object is held by a process that does not own the token.
    NameTaken(String),
}

impl Display for InstanceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "instance coordination io error: {err}"),
            Self::Os(code) => write!(f, "instance coordination os error {code}"),
            Self::SignalUnavailable => write!(f, "wake signal is not available"),
            Self::NameTaken(name) => write!(f, "coordination name already taken: {name}"),
        }
    }
}

impl Error for InstanceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for InstanceError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
