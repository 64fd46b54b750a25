//! Device backends.
//!
//! Capabilities talk to the machine only through these traits. Calls are
//! blocking; capabilities run them on the blocking thread pool.

mod dry_run;
mod error;
mod keymap;
pub mod native;
mod types;

use std::sync::Arc;

pub use dry_run::{DryRunBackend, DryRunCall};
pub use error::BackendError;
pub use keymap::{KeyCode, NamedKey, parse_chord, parse_key};
pub use types::*;

/// Pointer and keyboard injection.
pub trait InputBackend: Send + Sync {
    /// Check that input can be injected at all.
    fn probe(&self) -> Result<(), BackendError> {
        Ok(())
    }

    /// Move the pointer to absolute screen coordinates.
    fn move_pointer(&self, x: i32, y: i32) -> Result<(), BackendError>;

    fn button(&self, button: MouseButton, action: PressAction) -> Result<(), BackendError>;

    fn scroll(&self, direction: ScrollDirection, amount: i32) -> Result<(), BackendError>;

    fn key(&self, key: KeyCode, action: PressAction) -> Result<(), BackendError>;

    fn type_text(&self, text: &str) -> Result<(), BackendError>;
}

/// Virtual gamepad.
pub trait ControllerBackend: Send + Sync {
    /// Fails with [`BackendError::Unavailable`] when no virtual device can
    /// be created (missing driver, unsupported platform).
    fn probe(&self) -> Result<(), BackendError>;

    /// Push a full report to the device.
    fn apply(&self, state: &ControllerState) -> Result<(), BackendError>;
}

/// Screen pixels.
pub trait CaptureBackend: Send + Sync {
    fn probe(&self) -> Result<(), BackendError> {
        self.displays().map(|_| ())
    }

    fn displays(&self) -> Result<Vec<DisplayInfo>, BackendError>;

    /// Capture `region`, or the primary display when `None`.
    fn capture(&self, region: Option<Region>) -> Result<Frame, BackendError>;
}

/// Top-level window enumeration and placement.
pub trait WindowBackend: Send + Sync {
    fn probe(&self) -> Result<(), BackendError> {
        self.list().map(|_| ())
    }

    /// Windows in a stable order; a target id is an index into this list.
    fn list(&self) -> Result<Vec<WindowInfo>, BackendError>;

    fn focus(&self, window: &WindowInfo) -> Result<(), BackendError>;

    fn move_resize(&self, window: &WindowInfo, geometry: Geometry) -> Result<(), BackendError>;
}

/// The full set of backends the desktop capabilities run on.
#[derive(Clone)]
pub struct DesktopBackends {
    pub input: Arc<dyn InputBackend>,
    pub controller: Arc<dyn ControllerBackend>,
    pub capture: Arc<dyn CaptureBackend>,
    pub windows: Arc<dyn WindowBackend>,
}

impl DesktopBackends {
    /// Every concern served by one recording backend.
    pub fn dry_run(backend: Arc<DryRunBackend>) -> Self {
        Self {
            input: backend.clone(),
            controller: backend.clone(),
            capture: backend.clone(),
            windows: backend,
        }
    }

    /// Platform backends. Without the `native` feature every call fails
    /// with [`BackendError::Unavailable`].
    pub fn native() -> Self {
        native::backends()
    }
}
