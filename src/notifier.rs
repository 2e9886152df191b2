//! Update notifications

use std::process::{Command, Stdio};
use std::thread;

#[cfg(test)]
use mockall::automock;
use tracing::{debug, warn};

use crate::library::Library;

const NOTIFICATION_TITLE: &str = "Verdog";

/// Trait for telling the user that a library has a new upstream version
///
/// Implementations are best-effort and must never abort a check run.
#[cfg_attr(test, automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, library: &Library, previous: &str, current: &str);
}

/// Human-readable update message shared by every notifier
pub fn update_message(library: &Library, previous: &str, current: &str) -> String {
    format!(
        "Library `{}` requires a version update: {} -> {}",
        library.name, previous, current
    )
}

/// Prints update messages to stdout
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, library: &Library, previous: &str, current: &str) {
        println!("{}", update_message(library, previous, current));
    }
}

/// Console output plus a desktop notification through the platform's notifier tool
#[derive(Debug, Default)]
pub struct DesktopNotifier {
    console: ConsoleNotifier,
}

impl DesktopNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, library: &Library, previous: &str, current: &str) {
        self.console.notify(library, previous, current);

        let message = update_message(library, previous, current);
        match spawn_detached(desktop_command(&message)) {
            Ok(()) => debug!("Desktop notification raised for {}", library.name),
            Err(e) => warn!("Failed to raise desktop notification: {}", e),
        }
    }
}

/// Starts `command` without waiting for it. The child is reaped on a
/// background thread so a slow notifier never stalls the check run.
fn spawn_detached(mut command: Command) -> std::io::Result<()> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    thread::spawn(move || match child.wait() {
        Ok(status) if !status.success() => warn!("Desktop notifier exited with {}", status),
        Ok(_) => {}
        Err(e) => warn!("Failed to wait for desktop notifier: {}", e),
    });
    Ok(())
}

#[cfg(target_os = "macos")]
fn desktop_command(message: &str) -> Command {
    let script = format!(
        "display notification {} with title {} sound name \"Basso\"",
        applescript_string(message),
        applescript_string(NOTIFICATION_TITLE)
    );
    let mut command = Command::new("osascript");
    command.args(["-e", &script]);
    command
}

#[cfg(target_os = "macos")]
fn applescript_string(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(not(target_os = "macos"))]
fn desktop_command(message: &str) -> Command {
    let mut command = Command::new("notify-send");
    command.args(["--app-name", "verdog", NOTIFICATION_TITLE, message]);
    command
}
