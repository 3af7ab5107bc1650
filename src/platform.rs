//! Platform naming rules and console handling
//!
//! The interpreter naming rules are pure functions of the platform family and
//! the windowless preference so they can be exercised on any host.

use std::process::Command;

/// Platform family the launcher is targeting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformKind {
    Windows,
    Unix,
}

impl PlatformKind {
    /// Family of the host the launcher was built for
    pub fn current() -> Self {
        if cfg!(windows) {
            PlatformKind::Windows
        } else {
            PlatformKind::Unix
        }
    }
}

/// Interpreter file name the locator looks for
pub fn candidate_binary_name(kind: PlatformKind, prefer_windowless: bool) -> &'static str {
    match (kind, prefer_windowless) {
        (PlatformKind::Windows, true) => "pythonw.exe",
        (PlatformKind::Windows, false) => "python.exe",
        (PlatformKind::Unix, _) => "python",
    }
}

/// Whether `file_name` is the interpreter binary for this platform.
///
/// Windows file names compare case-insensitively; Unix names must match
/// exactly.
pub fn matches_binary(kind: PlatformKind, prefer_windowless: bool, file_name: &str) -> bool {
    let wanted = candidate_binary_name(kind, prefer_windowless);
    match kind {
        PlatformKind::Windows => file_name.eq_ignore_ascii_case(wanted),
        PlatformKind::Unix => file_name == wanted,
    }
}

/// Keep child processes from flashing a console window
pub fn hide_console(cmd: &mut Command) {
    cfg_if::cfg_if! {
        if #[cfg(windows)] {
            use std::os::windows::process::CommandExt;
            use windows::Win32::System::Threading::CREATE_NO_WINDOW;
            cmd.creation_flags(CREATE_NO_WINDOW.0);
        } else {
            let _ = cmd;
        }
    }
}
