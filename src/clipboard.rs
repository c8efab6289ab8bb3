use std::env;
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::debug;

pub enum DisplayServer {
    X11,
    Wayland,
    Unknown,
}

/// Detect which display server we're running on
pub fn detect_display_server() -> DisplayServer {
    match env::var("XDG_SESSION_TYPE") {
        Ok(session) => {
            if session.to_lowercase() == "wayland" {
                DisplayServer::Wayland
            } else {
                DisplayServer::X11
            }
        }
        Err(_) => {
            // Fallback detection
            if env::var("WAYLAND_DISPLAY").is_ok() {
                DisplayServer::Wayland
            } else if env::var("DISPLAY").is_ok() {
                DisplayServer::X11
            } else {
                DisplayServer::Unknown
            }
        }
    }
}

/// Place `text` on the system clipboard using the tool appropriate for the
/// detected display server. Returns `false` if no tool managed to take it.
pub fn set_clipboard_text(text: &str) -> bool {
    let display_server = detect_display_server();
    debug!(
        "setting clipboard via {}",
        match display_server {
            DisplayServer::X11 => "X11",
            DisplayServer::Wayland => "Wayland",
            DisplayServer::Unknown => "unknown display server",
        }
    );

    match display_server {
        DisplayServer::X11 => set_x11_clipboard(text),
        DisplayServer::Wayland => set_wayland_clipboard(text),
        DisplayServer::Unknown => false,
    }
}

/// Set the clipboard on X11 using xclip, falling back to xsel
fn set_x11_clipboard(text: &str) -> bool {
    pipe_to_command("xclip", &["-i", "-selection", "clipboard"], text)
        || pipe_to_command("xsel", &["--clipboard", "--input"], text)
}

/// Set the clipboard on Wayland using wl-copy, falling back to XWayland
fn set_wayland_clipboard(text: &str) -> bool {
    pipe_to_command("wl-copy", &[], text) || set_x11_clipboard(text)
}

/// Spawn `program` and feed `text` to its stdin
fn pipe_to_command(program: &str, args: &[&str], text: &str) -> bool {
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();

    match child {
        Ok(mut child) => {
            if let Some(stdin) = child.stdin.as_mut() {
                if stdin.write_all(text.as_bytes()).is_err() {
                    return false;
                }
            }
            // Drop stdin so the tool sees EOF before we wait
            drop(child.stdin.take());
            matches!(child.wait(), Ok(status) if status.success())
        }
        Err(_) => false,
    }
}
