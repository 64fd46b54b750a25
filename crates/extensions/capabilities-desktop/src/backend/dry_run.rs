//! Recording backend that never touches a real device.

#[cfg(test)]
#[path = "dry_run_tests.rs"]
mod tests;

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use super::{
    BackendError, CaptureBackend, ControllerBackend, ControllerState, DisplayInfo, Frame,
    Geometry, InputBackend, KeyCode, MouseButton, PressAction, Region, ScrollDirection,
    WindowBackend, WindowInfo,
};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum DryRunCall {
    MovePointer { x: i32, y: i32 },
    Button { button: MouseButton, action: PressAction },
    Scroll { direction: ScrollDirection, amount: i32 },
    Key { key: KeyCode, action: PressAction },
    TypeText(String),
    Controller(ControllerState),
    Capture(Option<Region>),
    Focus(u64),
    MoveResize { handle: u64, geometry: Geometry },
}

impl DryRunCall {
    /// Calls that would change device state.
    pub fn is_input(&self) -> bool {
        !matches!(self, Self::Capture(_))
    }
}

/// Backend that records every call and serves a scripted desktop.
pub struct DryRunBackend {
    calls: Mutex<Vec<DryRunCall>>,
    windows: Mutex<Vec<WindowInfo>>,
    display: DisplayInfo,
    controller_available: bool,
    capture_fails: AtomicBool,
}

impl DryRunBackend {
    /// A 1280x800 display with two windows.
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            windows: Mutex::new(sample_windows()),
            display: DisplayInfo {
                id: 1,
                name: "Dry-run display".to_string(),
                x: 0,
                y: 0,
                width: 1280,
                height: 800,
                is_primary: true,
                scale_factor: 1.0,
            },
            controller_available: true,
            capture_fails: AtomicBool::new(false),
        }
    }

    pub fn with_windows(self, windows: Vec<WindowInfo>) -> Self {
        *self.windows.lock() = windows;
        self
    }

    pub fn with_display(mut self, width: u32, height: u32) -> Self {
        self.display.width = width;
        self.display.height = height;
        self
    }

    /// Report the virtual gamepad as missing.
    pub fn without_controller(mut self) -> Self {
        self.controller_available = false;
        self
    }

    /// Make subsequent captures fail.
    pub fn fail_captures(&self, fail: bool) {
        self.capture_fails.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<DryRunCall> {
        self.calls.lock().clone()
    }

    /// Recorded calls that inject input or move windows.
    pub fn input_calls(&self) -> Vec<DryRunCall> {
        self.calls.lock().iter().filter(|c| c.is_input()).cloned().collect()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    pub fn windows(&self) -> Vec<WindowInfo> {
        self.windows.lock().clone()
    }

    fn record(&self, call: DryRunCall) {
        self.calls.lock().push(call);
    }
}

impl Default for DryRunBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Two overlapping application windows.
pub fn sample_windows() -> Vec<WindowInfo> {
    vec![
        WindowInfo {
            handle: 0x0400_0001,
            title: "notes.txt - Editor".to_string(),
            app_name: "editor".to_string(),
            pid: 4101,
            x: 100,
            y: 50,
            width: 800,
            height: 600,
            is_focused: true,
        },
        WindowInfo {
            handle: 0x0400_0002,
            title: "Terminal".to_string(),
            app_name: "terminal".to_string(),
            pid: 4102,
            x: 600,
            y: 200,
            width: 640,
            height: 480,
            is_focused: false,
        },
    ]
}

impl InputBackend for DryRunBackend {
    fn move_pointer(&self, x: i32, y: i32) -> Result<(), BackendError> {
        self.record(DryRunCall::MovePointer { x, y });
        Ok(())
    }

    fn button(&self, button: MouseButton, action: PressAction) -> Result<(), BackendError> {
        self.record(DryRunCall::Button { button, action });
        Ok(())
    }

    fn scroll(&self, direction: ScrollDirection, amount: i32) -> Result<(), BackendError> {
        self.record(DryRunCall::Scroll { direction, amount });
        Ok(())
    }

    fn key(&self, key: KeyCode, action: PressAction) -> Result<(), BackendError> {
        self.record(DryRunCall::Key { key, action });
        Ok(())
    }

    fn type_text(&self, text: &str) -> Result<(), BackendError> {
        self.record(DryRunCall::TypeText(text.to_string()));
        Ok(())
    }
}

impl ControllerBackend for DryRunBackend {
    fn probe(&self) -> Result<(), BackendError> {
        if self.controller_available {
            Ok(())
        } else {
            Err(BackendError::unavailable(
                "virtual gamepad driver not found",
                "install the gamepad emulation driver and restart the server",
            ))
        }
    }

    fn apply(&self, state: &ControllerState) -> Result<(), BackendError> {
        ControllerBackend::probe(self)?;
        self.record(DryRunCall::Controller(state.clone()));
        Ok(())
    }
}

impl CaptureBackend for DryRunBackend {
    fn displays(&self) -> Result<Vec<DisplayInfo>, BackendError> {
        Ok(vec![self.display.clone()])
    }

    fn capture(&self, region: Option<Region>) -> Result<Frame, BackendError> {
        self.record(DryRunCall::Capture(region));
        if self.capture_fails.load(Ordering::SeqCst) {
            return Err(BackendError::CaptureFailed("scripted capture failure".to_string()));
        }
        let area = region.unwrap_or_else(|| self.display.region());
        Ok(Frame::solid(
            area.width.max(1),
            area.height.max(1),
            [32, 96, 160, 255],
        ))
    }
}

impl WindowBackend for DryRunBackend {
    fn list(&self) -> Result<Vec<WindowInfo>, BackendError> {
        Ok(self.windows.lock().clone())
    }

    fn focus(&self, window: &WindowInfo) -> Result<(), BackendError> {
        self.record(DryRunCall::Focus(window.handle));
        for w in self.windows.lock().iter_mut() {
            w.is_focused = w.handle == window.handle;
        }
        Ok(())
    }

    fn move_resize(&self, window: &WindowInfo, geometry: Geometry) -> Result<(), BackendError> {
        self.record(DryRunCall::MoveResize {
            handle: window.handle,
            geometry,
        });
        let mut windows = self.windows.lock();
        let Some(w) = windows.iter_mut().find(|w| w.handle == window.handle) else {
            return Err(BackendError::Failed(format!(
                "window 0x{:x} no longer exists",
                window.handle
            )));
        };
        w.x = geometry.x.unwrap_or(w.x);
        w.y = geometry.y.unwrap_or(w.y);
        w.width = geometry.width.unwrap_or(w.width);
        w.height = geometry.height.unwrap_or(w.height);
        Ok(())
    }
}
