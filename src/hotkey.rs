use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde::{Deserialize, Serialize};

use crate::error::ChordParseError;

// ─── Keys ──────────────────────────────────────────────────────────────

/// Punctuation keys that have a stable position on every layout we map.
const PUNCTUATION: &[char] = &[';', ',', '.', '/', '\\', '[', ']', '\'', '`', '-', '='];

/// Key under a shifted symbol on a US layout. Terminals report the symbol,
/// the system hotkey needs the key.
fn unshifted(ch: char) -> Option<char> {
    let base = match ch {
        '!' => '1',
        '@' => '2',
        '#' => '3',
        '$' => '4',
        '%' => '5',
        '^' => '6',
        '&' => '7',
        '*' => '8',
        '(' => '9',
        ')' => '0',
        '_' => '-',
        '+' => '=',
        '{' => '[',
        '}' => ']',
        '|' => '\\',
        ':' => ';',
        '"' => '\'',
        '<' => ',',
        '>' => '.',
        '?' => '/',
        '~' => '`',
        _ => return None,
    };
    Some(base)
}

/// The one non-modifier key of a chord.
///
/// `Char` holds an upper-case ASCII letter, a digit, or one of the
/// punctuation keys above. Anything else a terminal can report (shifted
/// symbols, media keys, F13 and up) has no stable global-hotkey mapping and is
/// rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HotkeyKey {
    Char(char),
    F(u8),
    Space,
    Tab,
    Enter,
    Escape,
    Backspace,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
}

impl HotkeyKey {
    pub fn from_char(ch: char) -> Option<Self> {
        if ch == ' ' {
            return Some(Self::Space);
        }
        if ch.is_ascii_alphabetic() {
            return Some(Self::Char(ch.to_ascii_uppercase()));
        }
        if ch.is_ascii_digit() || PUNCTUATION.contains(&ch) {
            return Some(Self::Char(ch));
        }
        None
    }

    /// Maps a terminal key code. `BackTab` is reported for Shift+Tab and maps
    /// to `Tab`; the caller adds the Shift flag.
    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Char(ch) => Self::from_char(ch),
            KeyCode::F(n) if (1..=12).contains(&n) => Some(Self::F(n)),
            KeyCode::Tab | KeyCode::BackTab => Some(Self::Tab),
            KeyCode::Enter => Some(Self::Enter),
            KeyCode::Esc => Some(Self::Escape),
            KeyCode::Backspace => Some(Self::Backspace),
            KeyCode::Delete => Some(Self::Delete),
            KeyCode::Insert => Some(Self::Insert),
            KeyCode::Home => Some(Self::Home),
            KeyCode::End => Some(Self::End),
            KeyCode::PageUp => Some(Self::PageUp),
            KeyCode::PageDown => Some(Self::PageDown),
            KeyCode::Up => Some(Self::Up),
            KeyCode::Down => Some(Self::Down),
            KeyCode::Left => Some(Self::Left),
            KeyCode::Right => Some(Self::Right),
            _ => None,
        }
    }
}

impl fmt::Display for HotkeyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(ch) => write!(f, "{}", ch),
            Self::F(n) => write!(f, "F{}", n),
            Self::Space => f.write_str("Space"),
            Self::Tab => f.write_str("Tab"),
            Self::Enter => f.write_str("Enter"),
            Self::Escape => f.write_str("Escape"),
            Self::Backspace => f.write_str("Backspace"),
            Self::Delete => f.write_str("Delete"),
            Self::Insert => f.write_str("Insert"),
            Self::Home => f.write_str("Home"),
            Self::End => f.write_str("End"),
            Self::PageUp => f.write_str("PageUp"),
            Self::PageDown => f.write_str("PageDown"),
            Self::Up => f.write_str("Up"),
            Self::Down => f.write_str("Down"),
            Self::Left => f.write_str("Left"),
            Self::Right => f.write_str("Right"),
        }
    }
}

impl FromStr for HotkeyKey {
    type Err = ChordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ChordParseError::Empty);
        }
        let lower = trimmed.to_lowercase();

        let named = match lower.as_str() {
            "space" => Some(Self::Space),
            "tab" => Some(Self::Tab),
            "enter" | "return" => Some(Self::Enter),
            "esc" | "escape" => Some(Self::Escape),
            "backspace" | "bksp" => Some(Self::Backspace),
            "delete" | "del" => Some(Self::Delete),
            "insert" | "ins" => Some(Self::Insert),
            "home" => Some(Self::Home),
            "end" => Some(Self::End),
            "pageup" | "pgup" => Some(Self::PageUp),
            "pagedown" | "pgdn" => Some(Self::PageDown),
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        };
        if let Some(key) = named {
            return Ok(key);
        }

        let mut chars = trimmed.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            return Self::from_char(ch).ok_or_else(|| ChordParseError::UnknownKey(trimmed.to_string()));
        }

        if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
            if (1..=12).contains(&n) {
                return Ok(Self::F(n));
            }
        }

        Err(ChordParseError::UnknownKey(trimmed.to_string()))
    }
}

impl TryFrom<String> for HotkeyKey {
    type Error = ChordParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HotkeyKey> for String {
    fn from(key: HotkeyKey) -> Self {
        key.to_string()
    }
}

// ─── Chords ────────────────────────────────────────────────────────────

/// A key combination: any set of the four modifiers plus exactly one key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HotkeyChord {
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub windows: bool,
    pub key: HotkeyKey,
}

impl Default for HotkeyChord {
    fn default() -> Self {
        Self {
            ctrl: false,
            shift: false,
            alt: true,
            windows: false,
            key: HotkeyKey::Space,
        }
    }
}

impl HotkeyChord {
    /// A chord with no modifiers.
    pub fn bare(key: HotkeyKey) -> Self {
        Self { ctrl: false, shift: false, alt: false, windows: false, key }
    }

    /// Reads a chord from a live key event.
    ///
    /// Returns `None` for key releases, for bare modifier presses, and for
    /// keys with no `HotkeyKey` mapping.
    pub fn from_key_event(event: &KeyEvent) -> Option<Self> {
        if event.kind == KeyEventKind::Release {
            return None;
        }
        if let KeyCode::Modifier(_) = event.code {
            return None;
        }
        let (code, shifted) = match event.code {
            KeyCode::Char(ch) => match unshifted(ch) {
                Some(base) => (KeyCode::Char(base), true),
                None => (event.code, false),
            },
            KeyCode::BackTab => (KeyCode::Tab, true),
            other => (other, false),
        };
        let key = HotkeyKey::from_key_code(code)?;
        let modifiers = event.modifiers;
        Some(Self {
            ctrl: modifiers.contains(KeyModifiers::CONTROL),
            shift: shifted || modifiers.contains(KeyModifiers::SHIFT),
            alt: modifiers.contains(KeyModifiers::ALT),
            windows: modifiers.contains(KeyModifiers::SUPER),
            key,
        })
    }

    pub fn has_modifiers(&self) -> bool {
        self.ctrl || self.shift || self.alt || self.windows
    }

    /// Tab with no modifiers is reserved for moving focus out of the capture
    /// field.
    pub fn is_focus_escape(&self) -> bool {
        self.to_string() == "Tab"
    }
}

impl fmt::Display for HotkeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("Ctrl + ")?;
        }
        if self.shift {
            f.write_str("Shift + ")?;
        }
        if self.alt {
            f.write_str("Alt + ")?;
        }
        if self.windows {
            f.write_str("Win + ")?;
        }
        write!(f, "{}", self.key)
    }
}

/// Parses strings like `"Ctrl + Shift + A"`, `"alt+space"` or `"win+f5"`.
///
/// Whitespace around `+` is optional and names are case-insensitive.
impl FromStr for HotkeyChord {
    type Err = ChordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ChordParseError::Empty);
        }

        let mut chord = HotkeyChord::bare(HotkeyKey::Space);
        let mut key = None;

        for part in s.split('+') {
            let part = part.trim();
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => chord.ctrl = true,
                "shift" => chord.shift = true,
                "alt" => chord.alt = true,
                "win" | "windows" | "super" => chord.windows = true,
                _ => {
                    if key.is_some() {
                        return Err(ChordParseError::MultipleKeys(s.trim().to_string()));
                    }
                    key = Some(part.parse::<HotkeyKey>()?);
                }
            }
        }

        chord.key = key.ok_or(ChordParseError::MissingKey)?;
        Ok(chord)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────
