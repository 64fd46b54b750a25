//! Value types exchanged with device backends.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Mouse button types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Press, release, or press-then-release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PressAction {
    Press,
    Release,
    Click,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

impl ScrollDirection {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Signed wheel delta for `amount` notches.
    pub fn delta(self, amount: i32) -> i32 {
        match self {
            Self::Down | Self::Right => amount,
            Self::Up | Self::Left => -amount,
        }
    }
}

/// Screen rectangle in absolute pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Raw RGBA pixels of a capture.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Frame {
    /// A frame filled with one colour.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = (width as usize) * (height as usize);
        Self {
            width,
            height,
            rgba: rgba.iter().copied().cycle().take(pixels * 4).collect(),
        }
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

/// Monitor information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayInfo {
    pub id: u32,
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub is_primary: bool,
    pub scale_factor: f32,
}

impl DisplayInfo {
    pub fn region(&self) -> Region {
        Region {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

/// Information about a top-level window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowInfo {
    /// Platform handle (X11 window id, process id on macOS).
    pub handle: u64,
    pub title: String,
    pub app_name: String,
    pub pid: u32,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub is_focused: bool,
}

impl WindowInfo {
    pub fn region(&self) -> Region {
        Region {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    /// Translate a window-relative point to absolute screen coordinates.
    /// `None` when the result does not fit in `i32`.
    pub fn to_screen(&self, x: i32, y: i32) -> Option<(i32, i32)> {
        Some((self.x.checked_add(x)?, self.y.checked_add(y)?))
    }
}

/// Partial window geometry; `None` keeps the current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl Geometry {
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.width.is_none() && self.height.is_none()
    }
}

/// Virtual gamepad buttons (XInput layout).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamepadButton {
    A,
    B,
    X,
    Y,
    Lb,
    Rb,
    Ls,
    Rs,
    Start,
    Back,
    Guide,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// Full report pushed to the virtual gamepad.
///
/// Axes are in `[-1.0, 1.0]`, triggers in `0..=255`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControllerState {
    pub buttons: BTreeSet<GamepadButton>,
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub left_stick: [f32; 2],
    pub right_stick: [f32; 2],
}

impl ControllerState {
    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }

    pub fn set_trigger(&mut self, side: Side, pressure: u8) {
        match side {
            Side::Left => self.left_trigger = pressure,
            Side::Right => self.right_trigger = pressure,
        }
    }

    pub fn set_stick(&mut self, side: Side, x: f32, y: f32) {
        match side {
            Side::Left => self.left_stick = [x, y],
            Side::Right => self.right_stick = [x, y],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_delta_sign() {
        assert_eq!(ScrollDirection::Down.delta(3), 3);
        assert_eq!(ScrollDirection::Up.delta(3), -3);
        assert_eq!(ScrollDirection::Left.delta(2), -2);
        assert!(ScrollDirection::Right.is_horizontal());
        assert!(!ScrollDirection::Up.is_horizontal());
    }

    #[test]
    fn test_solid_frame_size() {
        let frame = Frame::solid(4, 3, [1, 2, 3, 255]);
        assert_eq!(frame.rgba.len(), 48);
        assert_eq!(&frame.rgba[4..8], &[1, 2, 3, 255]);
    }

    #[test]
    fn test_window_to_screen() {
        let window = WindowInfo {
            handle: 1,
            title: "Editor".into(),
            app_name: "editor".into(),
            pid: 10,
            x: 200,
            y: 100,
            width: 800,
            height: 600,
            is_focused: false,
        };
        assert_eq!(window.to_screen(10, 20), Some((210, 120)));
        assert_eq!(window.to_screen(i32::MAX, 0), None);
        assert_eq!(window.region().width, 800);
    }

    #[test]
    fn test_controller_state_neutral() {
        let mut state = ControllerState::default();
        assert!(state.is_neutral());
        state.set_trigger(Side::Left, 128);
        assert!(!state.is_neutral());
        state.set_stick(Side::Right, 0.5, -1.0);
        assert_eq!(state.right_stick, [0.5, -1.0]);
    }

    #[test]
    fn test_gamepad_button_names() {
        let button: GamepadButton = serde_json::from_str("\"dpad_up\"").unwrap();
        assert_eq!(button, GamepadButton::DpadUp);
        assert_eq!(serde_json::to_string(&GamepadButton::Lb).unwrap(), "\"lb\"");
    }
}
