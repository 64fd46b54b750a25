//! Screen capture through the `screenshots` crate.

use screenshots::Screen;

use crate::backend::{BackendError, CaptureBackend, DisplayInfo, Frame, Region};

pub struct NativeCapture;

impl NativeCapture {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NativeCapture {
    fn default() -> Self {
        Self
    }
}

fn screens() -> Result<Vec<Screen>, BackendError> {
    let screens = Screen::all().map_err(|e| {
        BackendError::unavailable(
            format!("cannot enumerate displays: {}", e),
            "grant screen recording permission to the process running deskhand",
        )
    })?;
    if screens.is_empty() {
        return Err(BackendError::CaptureFailed("no display found".to_string()));
    }
    Ok(screens)
}

fn primary(screens: Vec<Screen>) -> Result<Screen, BackendError> {
    let idx = screens
        .iter()
        .position(|s| s.display_info.is_primary)
        .unwrap_or(0);
    screens
        .into_iter()
        .nth(idx)
        .ok_or_else(|| BackendError::CaptureFailed("no display found".to_string()))
}

fn to_frame(image: screenshots::image::RgbaImage) -> Frame {
    Frame {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    }
}

impl CaptureBackend for NativeCapture {
    fn displays(&self) -> Result<Vec<DisplayInfo>, BackendError> {
        Ok(screens()?
            .into_iter()
            .enumerate()
            .map(|(idx, s)| DisplayInfo {
                id: s.display_info.id,
                name: format!("Monitor {}", idx + 1),
                x: s.display_info.x,
                y: s.display_info.y,
                width: s.display_info.width,
                height: s.display_info.height,
                is_primary: s.display_info.is_primary,
                scale_factor: s.display_info.scale_factor,
            })
            .collect())
    }

    fn capture(&self, region: Option<Region>) -> Result<Frame, BackendError> {
        let image = match region {
            None => primary(screens()?)?.capture(),
            Some(r) => {
                let screen = Screen::from_point(r.x, r.y)
                    .map_err(|e| BackendError::CaptureFailed(e.to_string()))?;
                screen.capture_area(
                    r.x - screen.display_info.x,
                    r.y - screen.display_info.y,
                    r.width,
                    r.height,
                )
            }
        }
        .map_err(|e| BackendError::CaptureFailed(e.to_string()))?;
        Ok(to_frame(image))
    }
}
