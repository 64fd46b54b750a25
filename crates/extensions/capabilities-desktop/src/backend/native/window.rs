//! Window management through platform command-line tools.

use std::io::ErrorKind;
use std::process::Command;

use tracing::debug;

use crate::backend::{BackendError, Geometry, WindowBackend, WindowInfo};

/// Window controller backed by `wmctrl` on Linux and `osascript` on macOS.
pub struct NativeWindows;

impl NativeWindows {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NativeWindows {
    fn default() -> Self {
        Self::new()
    }
}

/// Run `program` and return its stdout. A missing binary is reported as
/// unavailable with an install hint.
#[cfg_attr(not(any(target_os = "linux", target_os = "macos")), allow(dead_code))]
fn run(program: &str, args: &[&str], install_hint: &str) -> Result<String, BackendError> {
    debug!("Running {} {:?}", program, args);
    let output = Command::new(program).args(args).output().map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            BackendError::unavailable(format!("{} not found", program), install_hint)
        } else {
            BackendError::Failed(format!("{} failed to start: {}", program, e))
        }
    })?;

    if !output.status.success() {
        return Err(BackendError::Failed(format!(
            "{} exited with {}: {}",
            program,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(target_os = "linux")]
mod platform {
    use super::*;
    use crate::backend::native::parsers::parse_wmctrl_windows;

    const HINT: &str = "install wmctrl (e.g. `sudo apt install wmctrl`) and run under an EWMH-compliant window manager";

    pub(super) fn list() -> Result<Vec<WindowInfo>, BackendError> {
        let stdout = run("wmctrl", &["-l", "-p", "-G"], HINT)?;
        Ok(parse_wmctrl_windows(&stdout))
    }

    pub(super) fn focus(window: &WindowInfo) -> Result<(), BackendError> {
        let id = format!("0x{:x}", window.handle);
        run("wmctrl", &["-i", "-a", &id], HINT).map(|_| ())
    }

    pub(super) fn move_resize(window: &WindowInfo, geometry: Geometry) -> Result<(), BackendError> {
        let id = format!("0x{:x}", window.handle);
        let dim = |v: Option<i64>| v.map_or("-1".to_string(), |v| v.to_string());
        let placement = format!(
            "0,{},{},{},{}",
            dim(geometry.x.map(i64::from)),
            dim(geometry.y.map(i64::from)),
            dim(geometry.width.map(i64::from)),
            dim(geometry.height.map(i64::from)),
        );
        run("wmctrl", &["-i", "-r", &id, "-e", &placement], HINT).map(|_| ())
    }
}

#[cfg(target_os = "macos")]
mod platform {
    use super::*;
    use crate::backend::native::parsers::parse_applescript_windows;

    const HINT: &str = "grant Accessibility permission to the terminal running deskhand in System Settings > Privacy & Security";

    const LIST_SCRIPT: &str = r#"
        set output to ""
        tell application "System Events"
            set frontName to name of first application process whose frontmost is true
            repeat with proc in (processes whose visible is true)
                set procName to name of proc
                set procId to unix id of proc
                try
                    repeat with win in windows of proc
                        set {wx, wy} to position of win
                        set {ww, wh} to size of win
                        set output to output & procName & "|" & procId & "|" & (name of win) & "|" & wx & "|" & wy & "|" & ww & "|" & wh & "|" & (procName is frontName) & linefeed
                    end repeat
                end try
            end repeat
        end tell
        return output
    "#;

    fn osascript(script: &str) -> Result<String, BackendError> {
        run("osascript", &["-e", script], HINT)
    }

    pub(super) fn list() -> Result<Vec<WindowInfo>, BackendError> {
        Ok(parse_applescript_windows(&osascript(LIST_SCRIPT)?))
    }

    pub(super) fn focus(window: &WindowInfo) -> Result<(), BackendError> {
        let script = format!(
            r#"tell application "System Events" to set frontmost of (first process whose unix id is {}) to true"#,
            window.pid
        );
        osascript(&script).map(|_| ())
    }

    pub(super) fn move_resize(window: &WindowInfo, geometry: Geometry) -> Result<(), BackendError> {
        let x = geometry.x.unwrap_or(window.x);
        let y = geometry.y.unwrap_or(window.y);
        let width = geometry.width.unwrap_or(window.width);
        let height = geometry.height.unwrap_or(window.height);
        let script = format!(
            r#"
            tell application "System Events"
                set win to window 1 of (first process whose unix id is {pid})
                set position of win to {{{x}, {y}}}
                set size of win to {{{width}, {height}}}
            end tell
            "#,
            pid = window.pid,
        );
        osascript(&script).map(|_| ())
    }
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
mod platform {
    use super::*;

    fn unsupported<T>() -> Result<T, BackendError> {
        Err(BackendError::unavailable(
            format!("window management is not supported on {}", std::env::consts::OS),
            "use backend.kind = \"dry_run\" on this platform",
        ))
    }

    pub(super) fn list() -> Result<Vec<WindowInfo>, BackendError> {
        unsupported()
    }

    pub(super) fn focus(_window: &WindowInfo) -> Result<(), BackendError> {
        unsupported()
    }

    pub(super) fn move_resize(_window: &WindowInfo, _geometry: Geometry) -> Result<(), BackendError> {
        unsupported()
    }
}

impl WindowBackend for NativeWindows {
    fn list(&self) -> Result<Vec<WindowInfo>, BackendError> {
        platform::list()
    }

    fn focus(&self, window: &WindowInfo) -> Result<(), BackendError> {
        platform::focus(window)
    }

    fn move_resize(&self, window: &WindowInfo, geometry: Geometry) -> Result<(), BackendError> {
        platform::move_resize(window, geometry)
    }
}
