//! Local-socket coordination objects for Unix.
//!
//! The ownership token is a bound listening socket that never accepts; the
//! wake signal is a second listening socket where each connection carrying
//! one wake byte is one fire. Pending connections queue in the listen
//! backlog, so fires made while the owner is busy are observed later and
//! never merged.
//!
//! Linux uses the abstract namespace by default: binding is atomic and the
//! kernel releases names when the process exits. Socket files are used on
//! other Unix systems, or when a socket directory is configured. Each socket
//! file is guarded by an advisory lock on a sibling `.lock` file; only the
//! lock holder may unlink or bind the socket, and the kernel drops the lock
//! when its holder exits.

use super::coordinator::{CoordinationBackend, WakeSignal};
use super::{InstanceError, InstanceResult};
use log::debug;
use std::fs::{File, OpenOptions, TryLockError};
use std::io::{ErrorKind, Read, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::time::Duration;

const WAKE_BYTE: u8 = 0x57;
const WAKE_READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Socket-backed coordination scoped to the current user.
#[derive(Debug, Clone)]
pub struct SocketBackend {
    scope: String,
    // `None` selects abstract names (Linux only).
    socket_dir: Option<PathBuf>,
}

impl SocketBackend {
    /// Scopes names to the current user.
    pub fn new() -> Self {
        Self::with_scope(user_scope())
    }

    /// Scopes names to an explicit discriminator.
    pub fn with_scope(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            socket_dir: default_socket_dir(),
        }
    }

    /// Places socket and lock files in `dir`, on every Unix system.
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.socket_dir = Some(dir.into());
        self
    }

    fn address(&self, name: &str) -> Address {
        let scoped = format!("{name}.{}", self.scope);
        match &self.socket_dir {
            Some(dir) => Address::File {
                socket: dir.join(format!("{scoped}.sock")),
                lock: dir.join(format!("{scoped}.lock")),
            },
            #[cfg(target_os = "linux")]
            None => Address::Abstract(scoped),
            #[cfg(not(target_os = "linux"))]
            None => Address::File {
                socket: std::env::temp_dir().join(format!("{scoped}.sock")),
                lock: std::env::temp_dir().join(format!("{scoped}.lock")),
            },
        }
    }
}

impl Default for SocketBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_os = "linux")]
fn default_socket_dir() -> Option<PathBuf> {
    None
}

#[cfg(not(target_os = "linux"))]
fn default_socket_dir() -> Option<PathBuf> {
    Some(dirs::runtime_dir().unwrap_or_else(std::env::temp_dir))
}

/// Bound ownership socket; dropping it releases the name.
pub struct SocketToken {
    _endpoint: Endpoint,
}

/// Listening side of the wake signal.
pub struct SocketSignal {
    endpoint: Endpoint,
}

impl CoordinationBackend for SocketBackend {
    type Token = SocketToken;
    type Signal = SocketSignal;

    fn claim_ownership(&self, name: &str) -> InstanceResult<Option<Self::Token>> {
        Ok(self
            .address(name)
            .bind_exclusive()?
            .map(|endpoint| SocketToken { _endpoint: endpoint }))
    }

    fn create_signal(&self, name: &str) -> InstanceResult<Self::Signal> {
        let address = self.address(name);
        match address.bind_exclusive()? {
            Some(endpoint) => Ok(SocketSignal { endpoint }),
            None => Err(InstanceError::NameTaken(address.describe())),
        }
    }

    fn fire_signal(&self, name: &str) -> InstanceResult<()> {
        let mut stream = self.address(name).connect().map_err(|err| match err.kind() {
            ErrorKind::NotFound | ErrorKind::ConnectionRefused => InstanceError::SignalUnavailable,
            _ => InstanceError::Io(err),
        })?;
        stream.write_all(&[WAKE_BYTE])?;
        stream.flush()?;
        Ok(())
    }
}

impl WakeSignal for SocketSignal {
    fn wait(&mut self) -> InstanceResult<()> {
        loop {
            let mut stream = match self.endpoint.listener.accept() {
                Ok((stream, _)) => stream,
                Err(err)
                    if matches!(
                        err.kind(),
                        ErrorKind::Interrupted | ErrorKind::ConnectionAborted
                    ) =>
                {
                    continue
                }
                Err(err) => return Err(err.into()),
            };

            if read_wake_byte(&mut stream) {
                return Ok(());
            }
            debug!("event=instance_wake module=instance status=ignored reason=bad_payload");
        }
    }
}

fn read_wake_byte(stream: &mut UnixStream) -> bool {
    if stream.set_read_timeout(Some(WAKE_READ_TIMEOUT)).is_err() {
        return false;
    }
    let mut byte = [0_u8; 1];
    matches!(stream.read_exact(&mut byte), Ok(()) if byte[0] == WAKE_BYTE)
}

enum Address {
    #[cfg(target_os = "linux")]
    Abstract(String),
    File {
        socket: PathBuf,
        lock: PathBuf,
    },
}

impl Address {
    fn describe(&self) -> String {
        match self {
            #[cfg(target_os = "linux")]
            Self::Abstract(name) => name.clone(),
            Self::File { socket, .. } => socket.display().to_string(),
        }
    }

    /// Binds the address; `None` when another live owner holds it.
    fn bind_exclusive(&self) -> std::io::Result<Option<Endpoint>> {
        match self {
            #[cfg(target_os = "linux")]
            Self::Abstract(name) => bind_abstract(name),
            Self::File { socket, lock } => bind_file(socket, lock),
        }
    }

    fn connect(&self) -> std::io::Result<UnixStream> {
        match self {
            #[cfg(target_os = "linux")]
            Self::Abstract(name) => UnixStream::connect_addr(&abstract_address(name)?),
            Self::File { socket, .. } => UnixStream::connect(socket),
        }
    }
}

#[cfg(target_os = "linux")]
fn abstract_address(name: &str) -> std::io::Result<std::os::unix::net::SocketAddr> {
    use std::os::linux::net::SocketAddrExt;
    std::os::unix::net::SocketAddr::from_abstract_name(name.as_bytes())
}

#[cfg(target_os = "linux")]
fn bind_abstract(name: &str) -> std::io::Result<Option<Endpoint>> {
    match UnixListener::bind_addr(&abstract_address(name)?) {
        Ok(listener) => Ok(Some(Endpoint {
            listener,
            path: None,
            _lock: None,
        })),
        Err(err) if err.kind() == ErrorKind::AddrInUse => Ok(None),
        Err(err) => Err(err),
    }
}

/// Takes the advisory lock, then replaces whatever socket file is present.
///
/// A socket file found while holding the lock belongs to an owner that has
/// exited, so it is removed without probing it.
fn bind_file(socket: &Path, lock_path: &Path) -> std::io::Result<Option<Endpoint>> {
    if let Some(dir) = lock_path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let lock = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(lock_path)?;
    match lock.try_lock() {
        Ok(()) => {}
        Err(TryLockError::WouldBlock) => return Ok(None),
        Err(TryLockError::Error(err)) => return Err(err),
    }

    match std::fs::remove_file(socket) {
        Ok(()) => debug!("event=instance_claim module=instance status=stale_socket_removed"),
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    let listener = UnixListener::bind(socket)?;
    Ok(Some(Endpoint {
        listener,
        path: Some(socket.to_path_buf()),
        _lock: Some(lock),
    }))
}

struct Endpoint {
    listener: UnixListener,
    // Socket file to unlink on drop; `None` for abstract names.
    path: Option<PathBuf>,
    // Dropped after the unlink in `Drop::drop`.
    _lock: Option<File>,
}

impl Drop for Endpoint {
    fn drop(&mut self) {
        if let Some(path) = &self.path {
            let _ = std::fs::remove_file(path);
        }
    }
}

fn user_scope() -> String {
    use std::os::unix::fs::MetadataExt;

    if let Some(uid) = dirs::home_dir()
        .and_then(|home| std::fs::metadata(home).ok())
        .map(|meta| meta.uid())
    {
        return uid.to_string();
    }
    std::env::var("USER").unwrap_or_else(|_| "default".to_string())
}
