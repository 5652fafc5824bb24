//! Headless SwiftJot host.
//!
//! # Responsibility
//! - Run the startup sequence: logging, instance claim, settings, notes,
//!   hotkey.
//! - Drive the interactive loop from stdin commands, wake signals and
//!   hotkey activations.
//!
//! # Invariants
//! - Note and hotkey state are touched only on the main thread.
//! - Pending note saves are flushed before exit.

use log::{info, warn};
use std::io::BufRead;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use swiftjot_core::hotkey::PlatformBinder;
use swiftjot_core::instance::PlatformBackend;
use swiftjot_core::{
    default_log_level, init_logging, parse_accelerator, ui_channel, Acquired, AppPaths,
    HotkeyManager, InstanceCoordinator, InstanceNames, JsonNoteRepository, NoteStore,
    SettingsService, SettingsStore, StartupRegistration, UiAction, UiDispatcher, WindowHandle,
};

const LOG_LEVEL_ENV: &str = "SWIFTJOT_LOG_LEVEL";
const POLL_INTERVAL: Duration = Duration::from_millis(50);

fn main() {
    let paths = AppPaths::resolve();
    let level = std::env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| default_log_level().to_string());
    if let Err(err) = init_logging(&level, &paths.log_dir()) {
        eprintln!("logging disabled: {err}");
    }

    let (dispatcher, queue) = ui_channel();
    let coordinator = InstanceCoordinator::new(PlatformBackend::new(), InstanceNames::default());
    let wake_dispatcher = dispatcher.clone();
    let _guard = match coordinator.acquire(move || {
        wake_dispatcher.post(UiAction::ShowWindow);
    }) {
        Ok(Acquired::Owner(guard)) => Some(guard),
        Ok(Acquired::NotOwner) => {
            println!("SwiftJot is already running; asked it to show its window.");
            return;
        }
        Err(err) => {
            warn!(
                "event=app_start module=cli status=degraded reason=instance_claim_failed error={}",
                err
            );
            None
        }
    };

    let mut app = App::start(&paths);
    spawn_input_reader(dispatcher);
    app.show();

    loop {
        if let Some(action) = queue.next_timeout(POLL_INTERVAL) {
            match action {
                UiAction::ShowWindow => app.show(),
                UiAction::Command(line) => {
                    if !app.handle(&line) {
                        break;
                    }
                }
                UiAction::Quit => break,
            }
        }
        if app.hotkey.poll_activated() {
            app.show();
        }
    }

    app.shutdown();
}

struct App {
    notes: NoteStore,
    settings: SettingsService,
    hotkey: HotkeyManager<PlatformBinder>,
}

impl App {
    fn start(paths: &AppPaths) -> Self {
        let settings = SettingsService::load(SettingsStore::new(paths.settings_file()));
        let notes = NoteStore::load(Arc::new(JsonNoteRepository::new(paths.notes_file())));
        let mut hotkey = HotkeyManager::new(PlatformBinder::default());
        let outcome = hotkey.register(WindowHandle::NONE, settings.hotkey());
        report_hotkey(outcome.status_message(), &settings.hotkey().display_string());
        info!(
            "event=app_start module=cli status=ok notes={} data_dir={}",
            notes.len(),
            paths.data_dir().display()
        );
        Self {
            notes,
            settings,
            hotkey,
        }
    }

    fn show(&self) {
        let selected = self.notes.selected();
        println!(
            "[{}/{}] {}",
            self.notes.selected_index() + 1,
            self.notes.len(),
            selected.title
        );
    }

    /// Applies one input line; false when the loop should stop.
    fn handle(&mut self, line: &str) -> bool {
        let line = line.trim();
        let (command, rest) = match line.split_once(' ') {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "" => {}
            "list" => self.list(),
            "new" => {
                let title = self.notes.add_note().title.clone();
                println!("created {title}");
            }
            "select" => {
                let index = rest.parse::<usize>().ok().and_then(|n| n.checked_sub(1));
                match index {
                    Some(index) if index < self.notes.len() => {
                        self.notes.select_index(index);
                        self.show();
                    }
                    _ => println!("usage: select <1..{}>", self.notes.len()),
                }
            }
            "title" => {
                self.notes.set_selected_title(rest);
                self.show();
            }
            "write" => {
                self.notes.set_selected_content(rest.replace("\\n", "\n"));
                self.show();
            }
            "delete" => {
                if self.notes.delete_selected() {
                    self.show();
                } else {
                    println!("the last note cannot be deleted");
                }
            }
            "export" if !rest.is_empty() => match self.notes.export_selected(rest) {
                Ok(()) => println!("exported to {rest}"),
                Err(err) => println!("export failed: {err}"),
            },
            "hotkey" => self.change_hotkey(rest),
            "tray" => match parse_switch(rest) {
                Some(on) => {
                    self.settings.set_close_to_tray(on);
                    println!("close to tray: {}", if on { "on" } else { "off" });
                }
                None => println!("usage: tray on|off"),
            },
            "autostart" => match parse_switch(rest) {
                Some(on) => set_autostart(on),
                None => println!("usage: autostart on|off"),
            },
            "quit" | "exit" => return false,
            _ => println!(
                "commands: list, new, select <n>, title <text>, write <text>, delete, \
                 export <path>, hotkey <accelerator>, tray on|off, autostart on|off, quit"
            ),
        }
        true
    }

    fn list(&self) {
        let selected = self.notes.selected_index();
        for (index, note) in self.notes.notes().iter().enumerate() {
            let marker = if index == selected { '*' } else { ' ' };
            println!("{marker} {}. {}", index + 1, note.title);
        }
    }

    fn change_hotkey(&mut self, text: &str) {
        let config = match parse_accelerator(text) {
            Ok(config) => config,
            Err(err) => {
                println!("invalid hotkey: {err}");
                return;
            }
        };
        let outcome = self.hotkey.reconfigure(WindowHandle::NONE, &config);
        report_hotkey(outcome.status_message(), &config.display_string());
        if outcome.is_success() {
            self.settings.update_hotkey(config);
        }
    }

    fn shutdown(mut self) {
        self.hotkey.unregister();
        self.notes.flush();
        info!("event=app_exit module=cli status=ok");
    }
}

fn report_hotkey(status: Option<&str>, combo: &str) {
    match status {
        None => println!("hotkey: {combo}"),
        Some(message) => println!("{message} ({combo})"),
    }
}

fn parse_switch(value: &str) -> Option<bool> {
    match value {
        "on" => Some(true),
        "off" => Some(false),
        _ => None,
    }
}

fn set_autostart(on: bool) {
    let Some(registration) = StartupRegistration::for_current_user() else {
        println!("no startup location on this system");
        return;
    };
    let result = if on {
        std::env::current_exe().and_then(|exe| registration.register(&exe))
    } else {
        registration.unregister()
    };
    match result {
        Ok(()) => println!("autostart: {}", if on { "on" } else { "off" }),
        Err(err) => {
            warn!(
                "event=startup_toggle module=cli status=error error={}",
                err
            );
            println!("autostart change failed: {err}");
        }
    }
}

fn spawn_input_reader(dispatcher: UiDispatcher) {
    let spawned = thread::Builder::new()
        .name("swiftjot-stdin".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if !dispatcher.post(UiAction::Command(line)) {
                    return;
                }
            }
            dispatcher.post(UiAction::Quit);
        });
    if let Err(err) = spawned {
        warn!(
            "event=app_start module=cli status=degraded reason=stdin_reader error={}",
            err
        );
    }
}

#[cfg(test)]
mod tests {
    use super::parse_switch;

    #[test]
    fn switch_accepts_only_on_and_off() {
        assert_eq!(parse_switch("on"), Some(true));
        assert_eq!(parse_switch("off"), Some(false));
        assert_eq!(parse_switch("yes"), None);
    }
}
