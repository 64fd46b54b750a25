//! Mouse and keyboard injection through enigo.

use enigo::{Axis, Button, Coordinate, Direction, Enigo, Key, Keyboard, Mouse, Settings};

use crate::backend::{
    BackendError, InputBackend, KeyCode, MouseButton, NamedKey, PressAction, ScrollDirection,
};

/// Input backend that opens a fresh enigo connection per call.
pub struct NativeInput {
    settings: Settings,
}

impl NativeInput {
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
        }
    }

    fn with_enigo<T>(
        &self,
        f: impl FnOnce(&mut Enigo) -> Result<T, enigo::InputError>,
    ) -> Result<T, BackendError> {
        let mut enigo = Enigo::new(&self.settings).map_err(|e| {
            BackendError::unavailable(
                format!("cannot connect to the input system: {}", e),
                remediation(),
            )
        })?;
        f(&mut enigo).map_err(|e| BackendError::Failed(e.to_string()))
    }
}

impl Default for NativeInput {
    fn default() -> Self {
        Self::new()
    }
}

fn remediation() -> &'static str {
    if cfg!(target_os = "macos") {
        "grant Accessibility permission to the terminal running deskhand in System Settings > Privacy & Security"
    } else if cfg!(target_os = "linux") {
        "run inside an X11 session (DISPLAY must be set) with libxdo installed"
    } else {
        "run deskhand in an interactive desktop session"
    }
}

fn direction(action: PressAction) -> Direction {
    match action {
        PressAction::Press => Direction::Press,
        PressAction::Release => Direction::Release,
        PressAction::Click => Direction::Click,
    }
}

impl From<MouseButton> for Button {
    fn from(btn: MouseButton) -> Self {
        match btn {
            MouseButton::Left => Button::Left,
            MouseButton::Right => Button::Right,
            MouseButton::Middle => Button::Middle,
        }
    }
}

pub(crate) fn to_enigo_key(key: KeyCode) -> Key {
    match key {
        KeyCode::Char(c) => Key::Unicode(c),
        KeyCode::Named(named) => match named {
            NamedKey::Return => Key::Return,
            NamedKey::Tab => Key::Tab,
            NamedKey::Space => Key::Space,
            NamedKey::Backspace => Key::Backspace,
            NamedKey::Delete => Key::Delete,
            NamedKey::Escape => Key::Escape,
            NamedKey::Home => Key::Home,
            NamedKey::End => Key::End,
            NamedKey::PageUp => Key::PageUp,
            NamedKey::PageDown => Key::PageDown,
            NamedKey::Up => Key::UpArrow,
            NamedKey::Down => Key::DownArrow,
            NamedKey::Left => Key::LeftArrow,
            NamedKey::Right => Key::RightArrow,
            NamedKey::Control => Key::Control,
            NamedKey::Alt => Key::Alt,
            NamedKey::Shift => Key::Shift,
            NamedKey::Meta => Key::Meta,
            NamedKey::F(n) => match n {
                1 => Key::F1,
                2 => Key::F2,
                3 => Key::F3,
                4 => Key::F4,
                5 => Key::F5,
                6 => Key::F6,
                7 => Key::F7,
                8 => Key::F8,
                9 => Key::F9,
                10 => Key::F10,
                11 => Key::F11,
                _ => Key::F12,
            },
        },
    }
}

impl InputBackend for NativeInput {
    fn probe(&self) -> Result<(), BackendError> {
        self.with_enigo(|_| Ok(()))
    }

    fn move_pointer(&self, x: i32, y: i32) -> Result<(), BackendError> {
        self.with_enigo(|e| e.move_mouse(x, y, Coordinate::Abs))
    }

    fn button(&self, button: MouseButton, action: PressAction) -> Result<(), BackendError> {
        self.with_enigo(|e| e.button(button.into(), direction(action)))
    }

    fn scroll(&self, direction: ScrollDirection, amount: i32) -> Result<(), BackendError> {
        let axis = if direction.is_horizontal() {
            Axis::Horizontal
        } else {
            Axis::Vertical
        };
        self.with_enigo(|e| e.scroll(direction.delta(amount), axis))
    }

    fn key(&self, key: KeyCode, action: PressAction) -> Result<(), BackendError> {
        self.with_enigo(|e| e.key(to_enigo_key(key), direction(action)))
    }

    fn type_text(&self, text: &str) -> Result<(), BackendError> {
        self.with_enigo(|e| e.text(text))
    }
}
