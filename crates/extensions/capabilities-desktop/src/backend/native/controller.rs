//! Virtual gamepad backend.

use crate::backend::{BackendError, ControllerBackend, ControllerState};

/// Platform gamepad emulation. No driver binding ships with this build, so
/// the probe always fails with a platform-specific remediation hint.
pub struct NativeController;

impl NativeController {
    pub fn new() -> Self {
        Self
    }

    fn remediation() -> &'static str {
        if cfg!(target_os = "windows") {
            "install the ViGEmBus driver from https://github.com/nefarius/ViGEmBus/releases and restart deskhand"
        } else if cfg!(target_os = "linux") {
            "load the uinput module (`sudo modprobe uinput`) and grant your user write access to /dev/uinput"
        } else {
            "gamepad emulation is only available on Windows and Linux; use backend.kind = \"dry_run\" to test sequences"
        }
    }
}

impl Default for NativeController {
    fn default() -> Self {
        Self::new()
    }
}

impl ControllerBackend for NativeController {
    fn probe(&self) -> Result<(), BackendError> {
        Err(BackendError::unavailable(
            format!(
                "virtual gamepad emulation is not available on {}",
                std::env::consts::OS
            ),
            Self::remediation(),
        ))
    }

    fn apply(&self, _state: &ControllerState) -> Result<(), BackendError> {
        self.probe()
    }
}
