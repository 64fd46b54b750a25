//! Platform backends.
//!
//! Window management shells out to `wmctrl` (Linux) or `osascript` (macOS)
//! and is always built. Input injection and screen capture link against
//! platform libraries and are only built with the `native` feature.

#[cfg(feature = "native")]
mod capture;
mod controller;
#[cfg(feature = "native")]
mod input;
mod parsers;
mod window;

use std::sync::Arc;

pub use controller::NativeController;
pub use window::NativeWindows;
#[cfg(feature = "native")]
pub use {capture::NativeCapture, input::NativeInput};

#[cfg(not(feature = "native"))]
use super::{
    BackendError, CaptureBackend, DisplayInfo, Frame, InputBackend, KeyCode, MouseButton,
    PressAction, Region, ScrollDirection,
};
use super::DesktopBackends;

/// The platform backend set.
pub fn backends() -> DesktopBackends {
    #[cfg(feature = "native")]
    let (input, capture): (Arc<dyn super::InputBackend>, Arc<dyn super::CaptureBackend>) =
        (Arc::new(NativeInput::new()), Arc::new(NativeCapture::new()));
    #[cfg(not(feature = "native"))]
    let (input, capture): (Arc<dyn InputBackend>, Arc<dyn CaptureBackend>) =
        (Arc::new(NotBuilt), Arc::new(NotBuilt));

    DesktopBackends {
        input,
        controller: Arc::new(NativeController::new()),
        capture,
        windows: Arc::new(NativeWindows::new()),
    }
}

/// Stand-in for backends compiled out of this binary.
#[cfg(not(feature = "native"))]
struct NotBuilt;

#[cfg(not(feature = "native"))]
impl NotBuilt {
    fn err<T>() -> Result<T, BackendError> {
        Err(BackendError::unavailable(
            "native input and capture support is not compiled into this binary",
            "rebuild with `cargo build --features native`, or set backend.kind = \"dry_run\"",
        ))
    }
}

#[cfg(not(feature = "native"))]
impl InputBackend for NotBuilt {
    fn probe(&self) -> Result<(), BackendError> {
        Self::err()
    }

    fn move_pointer(&self, _x: i32, _y: i32) -> Result<(), BackendError> {
        Self::err()
    }

    fn button(&self, _button: MouseButton, _action: PressAction) -> Result<(), BackendError> {
        Self::err()
    }

    fn scroll(&self, _direction: ScrollDirection, _amount: i32) -> Result<(), BackendError> {
        Self::err()
    }

    fn key(&self, _key: KeyCode, _action: PressAction) -> Result<(), BackendError> {
        Self::err()
    }

    fn type_text(&self, _text: &str) -> Result<(), BackendError> {
        Self::err()
    }
}

#[cfg(not(feature = "native"))]
impl CaptureBackend for NotBuilt {
    fn displays(&self) -> Result<Vec<DisplayInfo>, BackendError> {
        Self::err()
    }

    fn capture(&self, _region: Option<Region>) -> Result<Frame, BackendError> {
        Self::err()
    }
}
