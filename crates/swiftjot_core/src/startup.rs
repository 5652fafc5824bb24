//! Launch-at-login registration.
//!
//! # Responsibility
//! - Write or remove a small launcher artifact in the OS startup location.
//!
//! # Invariants
//! - `register` and `unregister` are idempotent.

use log::info;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[cfg(windows)]
const LAUNCHER_FILE_NAME: &str = "SwiftJot.bat";
#[cfg(not(windows))]
const LAUNCHER_FILE_NAME: &str = "swiftjot.desktop";
#[cfg(windows)]
const LEGACY_SHORTCUT_NAME: &str = "SwiftJot.lnk";

/// Launcher artifact in one startup directory.
#[derive(Debug, Clone)]
pub struct StartupRegistration {
    startup_dir: PathBuf,
}

impl StartupRegistration {
    pub fn new(startup_dir: impl Into<PathBuf>) -> Self {
        Self {
            startup_dir: startup_dir.into(),
        }
    }

    /// Uses the platform startup location when it can be resolved.
    ///
    /// Windows: `%APPDATA%\Microsoft\Windows\Start Menu\Programs\Startup`.
    /// Elsewhere: the XDG autostart directory.
    pub fn for_current_user() -> Option<Self> {
        #[cfg(windows)]
        let dir = dirs::config_dir().map(|base| {
            base.join("Microsoft")
                .join("Windows")
                .join("Start Menu")
                .join("Programs")
                .join("Startup")
        });
        #[cfg(not(windows))]
        let dir = dirs::config_dir().map(|base| base.join("autostart"));
        dir.map(Self::new)
    }

    pub fn launcher_path(&self) -> PathBuf {
        self.startup_dir.join(LAUNCHER_FILE_NAME)
    }

    pub fn is_registered(&self) -> bool {
        self.launcher_path().exists()
    }

    /// Writes a launcher for `exe_path`, replacing any previous one.
    pub fn register(&self, exe_path: &Path) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.startup_dir)?;
        std::fs::write(self.launcher_path(), launcher_contents(exe_path))?;
        info!("event=startup_register module=startup status=ok");
        Ok(())
    }

    /// Removes launcher artifacts; absent files are not an error.
    pub fn unregister(&self) -> std::io::Result<()> {
        remove_if_present(&self.launcher_path())?;
        #[cfg(windows)]
        remove_if_present(&self.startup_dir.join(LEGACY_SHORTCUT_NAME))?;
        info!("event=startup_unregister module=startup status=ok");
        Ok(())
    }
}

#[cfg(windows)]
fn launcher_contents(exe_path: &Path) -> String {
    format!("@echo off\nstart \"\" \"{}\"", exe_path.display())
}

#[cfg(not(windows))]
fn launcher_contents(exe_path: &Path) -> String {
    format!(
        "[Desktop Entry]\nType=Application\nName=SwiftJot\nExec=\"{}\"\nX-GNOME-Autostart-enabled=true\n",
        exe_path.display()
    )
}

fn remove_if_present(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::StartupRegistration;
    use std::path::Path;

    #[test]
    fn register_and_unregister_are_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let startup = StartupRegistration::new(dir.path().join("startup"));
        let exe = Path::new("/opt/swiftjot/swiftjot");

        assert!(!startup.is_registered());
        startup.register(exe).expect("register");
        startup.register(exe).expect("register again");
        assert!(startup.is_registered());

        let launcher = std::fs::read_to_string(startup.launcher_path()).expect("read");
        assert!(launcher.contains("/opt/swiftjot/swiftjot"));

        startup.unregister().expect("unregister");
        startup.unregister().expect("unregister again");
        assert!(!startup.is_registered());
    }
}
