//! Key names and chord parsing, shared by every input backend.

use serde::Serialize;

use super::BackendError;

/// Non-character keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedKey {
    Return,
    Tab,
    Space,
    Backspace,
    Delete,
    Escape,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    Control,
    Alt,
    Shift,
    Meta,
    /// Function key `F1`..=`F12`.
    F(u8),
}

/// A single physical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCode {
    Char(char),
    Named(NamedKey),
}

impl KeyCode {
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            Self::Named(NamedKey::Control | NamedKey::Alt | NamedKey::Shift | NamedKey::Meta)
        )
    }
}

/// Parse a key name such as `"enter"`, `"f5"`, `"ctrl"` or `"a"`.
pub fn parse_key(key: &str) -> Result<KeyCode, BackendError> {
    let lower = key.trim().to_lowercase();
    let named = match lower.as_str() {
        "enter" | "return" => NamedKey::Return,
        "tab" => NamedKey::Tab,
        "space" => NamedKey::Space,
        "backspace" => NamedKey::Backspace,
        "delete" | "del" => NamedKey::Delete,
        "escape" | "esc" => NamedKey::Escape,
        "home" => NamedKey::Home,
        "end" => NamedKey::End,
        "pageup" | "page_up" => NamedKey::PageUp,
        "pagedown" | "page_down" => NamedKey::PageDown,
        "up" => NamedKey::Up,
        "down" => NamedKey::Down,
        "left" => NamedKey::Left,
        "right" => NamedKey::Right,
        "ctrl" | "control" => NamedKey::Control,
        "alt" | "option" => NamedKey::Alt,
        "shift" => NamedKey::Shift,
        "meta" | "cmd" | "command" | "win" | "super" => NamedKey::Meta,
        "plus" => return Ok(KeyCode::Char('+')),
        s => {
            if let Some(n) = s.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                if (1..=12).contains(&n) {
                    return Ok(KeyCode::Named(NamedKey::F(n)));
                }
            }
            let mut chars = s.chars();
            return match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(KeyCode::Char(c)),
                _ => Err(BackendError::InvalidKey(key.to_string())),
            };
        }
    };
    Ok(KeyCode::Named(named))
}

/// Parse a `+`-separated chord such as `"ctrl+shift+t"`. A lone `"+"` is
/// the plus key; inside a chord spell it `plus`.
pub fn parse_chord(chord: &str) -> Result<Vec<KeyCode>, BackendError> {
    if chord.trim() == "+" {
        return Ok(vec![KeyCode::Char('+')]);
    }
    chord
        .split('+')
        .map(|part| {
            if part.trim().is_empty() {
                Err(BackendError::InvalidKey(chord.to_string()))
            } else {
                parse_key(part)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_letters_and_digits() {
        assert_eq!(parse_key("a").unwrap(), KeyCode::Char('a'));
        assert_eq!(parse_key("Z").unwrap(), KeyCode::Char('z'));
        assert_eq!(parse_key("7").unwrap(), KeyCode::Char('7'));
        assert_eq!(parse_key("/").unwrap(), KeyCode::Char('/'));
    }

    #[test]
    fn test_parse_named_aliases() {
        assert_eq!(parse_key("Enter").unwrap(), KeyCode::Named(NamedKey::Return));
        assert_eq!(parse_key("return").unwrap(), KeyCode::Named(NamedKey::Return));
        assert_eq!(parse_key("esc").unwrap(), KeyCode::Named(NamedKey::Escape));
        assert_eq!(parse_key("cmd").unwrap(), KeyCode::Named(NamedKey::Meta));
        assert_eq!(parse_key("page_down").unwrap(), KeyCode::Named(NamedKey::PageDown));
    }

    #[test]
    fn test_parse_function_keys() {
        assert_eq!(parse_key("f1").unwrap(), KeyCode::Named(NamedKey::F(1)));
        assert_eq!(parse_key("F12").unwrap(), KeyCode::Named(NamedKey::F(12)));
        assert!(parse_key("f13").is_err());
        // A bare "f" is the letter.
        assert_eq!(parse_key("f").unwrap(), KeyCode::Char('f'));
    }

    #[test]
    fn test_parse_unknown_key() {
        let err = parse_key("hyperspace").unwrap_err();
        assert!(matches!(err, BackendError::InvalidKey(k) if k == "hyperspace"));
        assert!(parse_key("").is_err());
    }

    #[test]
    fn test_parse_chord() {
        let chord = parse_chord("ctrl+shift+t").unwrap();
        assert_eq!(
            chord,
            vec![
                KeyCode::Named(NamedKey::Control),
                KeyCode::Named(NamedKey::Shift),
                KeyCode::Char('t'),
            ]
        );
        assert!(chord[0].is_modifier());
        assert!(!chord[2].is_modifier());
    }

    #[test]
    fn test_parse_chord_plus() {
        assert_eq!(parse_chord("+").unwrap(), vec![KeyCode::Char('+')]);
        assert_eq!(
            parse_chord("ctrl+plus").unwrap(),
            vec![KeyCode::Named(NamedKey::Control), KeyCode::Char('+')]
        );
        assert!(parse_chord("ctrl++").is_err());
        assert!(parse_chord("ctrl+").is_err());
    }
}
