use global_hotkey::hotkey::{Code, HotKey, Modifiers};
use global_hotkey::GlobalHotKeyManager;

use crate::config::Settings;
use crate::error::HotkeyError;
use crate::hotkey::{HotkeyChord, HotkeyKey};

/// Outcome of changing a registration.
///
/// `AlreadyInUse` is an expected result, not an error: another program owns
/// the chord and the user has to pick a different one.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Active,
    Inactive,
    AlreadyInUse,
}

/// The single system-wide activation hotkey.
///
/// A new chord set with `set_chord` takes effect on the next
/// `set_enabled(true)`.
pub trait HotkeyRegistrar {
    fn chord(&self) -> &HotkeyChord;
    fn set_chord(&mut self, chord: HotkeyChord);
    fn is_enabled(&self) -> bool;
    fn set_enabled(&mut self, enabled: bool) -> Result<Registration, HotkeyError>;
}

/// Registrar backed by the OS global hotkey API.
pub struct GlobalHotkey {
    manager: GlobalHotKeyManager,
    chord: HotkeyChord,
    registered: Option<HotKey>,
}

impl GlobalHotkey {
    pub fn new(chord: HotkeyChord) -> Result<Self, HotkeyError> {
        let manager = GlobalHotKeyManager::new().map_err(|e| HotkeyError::Manager(e.to_string()))?;
        Ok(Self { manager, chord, registered: None })
    }

    /// Restores the saved registration. A chord owned by another program is
    /// left unregistered without failing.
    pub fn load(settings: &Settings) -> Result<Self, HotkeyError> {
        let mut hotkey = Self::new(settings.hotkey.clone())?;
        if settings.enable_hotkey {
            match hotkey.set_enabled(true) {
                Ok(Registration::AlreadyInUse) => {
                    tracing::info!(chord = %settings.hotkey, "saved hotkey is in use by another program");
                }
                Ok(_) => {}
                Err(err) => tracing::warn!(chord = %settings.hotkey, %err, "saved hotkey not registered"),
            }
        }
        Ok(hotkey)
    }

    fn unregister(&mut self) -> Result<(), HotkeyError> {
        if let Some(hotkey) = self.registered {
            self.manager.unregister(hotkey).map_err(|e| HotkeyError::Os(e.to_string()))?;
            self.registered = None;
            tracing::debug!(chord = %self.chord, "hotkey unregistered");
        }
        Ok(())
    }
}

impl HotkeyRegistrar for GlobalHotkey {
    fn chord(&self) -> &HotkeyChord {
        &self.chord
    }

    fn set_chord(&mut self, chord: HotkeyChord) {
        self.chord = chord;
    }

    fn is_enabled(&self) -> bool {
        self.registered.is_some()
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<Registration, HotkeyError> {
        if !enabled {
            self.unregister()?;
            return Ok(Registration::Inactive);
        }

        let wanted = to_global_hotkey(&self.chord)?;
        if self.registered == Some(wanted) {
            return Ok(Registration::Active);
        }
        self.unregister()?;

        let registration = registration_from(self.manager.register(wanted))?;
        if registration == Registration::Active {
            self.registered = Some(wanted);
            tracing::info!(chord = %self.chord, "hotkey registered");
        } else {
            tracing::info!(chord = %self.chord, "hotkey already in use");
        }
        Ok(registration)
    }
}

/// Classifies the manager's answer to a register call.
fn registration_from(result: global_hotkey::Result<()>) -> Result<Registration, HotkeyError> {
    match result {
        Ok(()) => Ok(Registration::Active),
        Err(global_hotkey::Error::AlreadyRegistered(_)) => Ok(Registration::AlreadyInUse),
        Err(err) => Err(HotkeyError::Os(err.to_string())),
    }
}

impl Drop for GlobalHotkey {
    fn drop(&mut self) {
        if let Err(err) = self.unregister() {
            tracing::debug!(%err, "hotkey not released on drop");
        }
    }
}

/// Registrar used when no global hotkey service is reachable (for example
/// without a display server). It records the chord and state without
/// talking to the OS.
#[derive(Debug, Clone, Default)]
pub struct OfflineHotkey {
    chord: HotkeyChord,
    enabled: bool,
}

impl OfflineHotkey {
    pub fn load(settings: &Settings) -> Self {
        Self { chord: settings.hotkey.clone(), enabled: settings.enable_hotkey }
    }
}

impl HotkeyRegistrar for OfflineHotkey {
    fn chord(&self) -> &HotkeyChord {
        &self.chord
    }

    fn set_chord(&mut self, chord: HotkeyChord) {
        self.chord = chord;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<Registration, HotkeyError> {
        if enabled {
            to_global_hotkey(&self.chord)?;
        }
        self.enabled = enabled;
        Ok(if enabled { Registration::Active } else { Registration::Inactive })
    }
}

/// Converts a chord to the OS hotkey type.
pub fn to_global_hotkey(chord: &HotkeyChord) -> Result<HotKey, HotkeyError> {
    let mut modifiers = Modifiers::empty();
    if chord.ctrl {
        modifiers |= Modifiers::CONTROL;
    }
    if chord.shift {
        modifiers |= Modifiers::SHIFT;
    }
    if chord.alt {
        modifiers |= Modifiers::ALT;
    }
    if chord.windows {
        modifiers |= Modifiers::SUPER;
    }
    let code = key_code(chord.key).ok_or(HotkeyError::UnsupportedKey(chord.key))?;
    Ok(HotKey::new(Some(modifiers), code))
}

fn key_code(key: HotkeyKey) -> Option<Code> {
    let code = match key {
        HotkeyKey::Char(ch) => return char_code(ch),
        HotkeyKey::F(n) => return function_code(n),
        HotkeyKey::Space => Code::Space,
        HotkeyKey::Tab => Code::Tab,
        HotkeyKey::Enter => Code::Enter,
        HotkeyKey::Escape => Code::Escape,
        HotkeyKey::Backspace => Code::Backspace,
        HotkeyKey::Delete => Code::Delete,
        HotkeyKey::Insert => Code::Insert,
        HotkeyKey::Home => Code::Home,
        HotkeyKey::End => Code::End,
        HotkeyKey::PageUp => Code::PageUp,
        HotkeyKey::PageDown => Code::PageDown,
        HotkeyKey::Up => Code::ArrowUp,
        HotkeyKey::Down => Code::ArrowDown,
        HotkeyKey::Left => Code::ArrowLeft,
        HotkeyKey::Right => Code::ArrowRight,
    };
    Some(code)
}

fn char_code(ch: char) -> Option<Code> {
    let code = match ch.to_ascii_uppercase() {
        'A' => Code::KeyA,
        'B' => Code::KeyB,
        'C' => Code::KeyC,
        'D' => Code::KeyD,
        'E' => Code::KeyE,
        'F' => Code::KeyF,
        'G' => Code::KeyG,
        'H' => Code::KeyH,
        'I' => Code::KeyI,
        'J' => Code::KeyJ,
        'K' => Code::KeyK,
        'L' => Code::KeyL,
        'M' => Code::KeyM,
        'N' => Code::KeyN,
        'O' => Code::KeyO,
        'P' => Code::KeyP,
        'Q' => Code::KeyQ,
        'R' => Code::KeyR,
        'S' => Code::KeyS,
        'T' => Code::KeyT,
        'U' => Code::KeyU,
        'V' => Code::KeyV,
        'W' => Code::KeyW,
        'X' => Code::KeyX,
        'Y' => Code::KeyY,
        'Z' => Code::KeyZ,
        '0' => Code::Digit0,
        '1' => Code::Digit1,
        '2' => Code::Digit2,
        '3' => Code::Digit3,
        '4' => Code::Digit4,
        '5' => Code::Digit5,
        '6' => Code::Digit6,
        '7' => Code::Digit7,
        '8' => Code::Digit8,
        '9' => Code::Digit9,
        ';' => Code::Semicolon,
        ',' => Code::Comma,
        '.' => Code::Period,
        '/' => Code::Slash,
        '\\' => Code::Backslash,
        '[' => Code::BracketLeft,
        ']' => Code::BracketRight,
        '\'' => Code::Quote,
        '`' => Code::Backquote,
        '-' => Code::Minus,
        '=' => Code::Equal,
        _ => return None,
    };
    Some(code)
}

fn function_code(n: u8) -> Option<Code> {
    let code = match n {
        1 => Code::F1,
        2 => Code::F2,
        3 => Code::F3,
        4 => Code::F4,
        5 => Code::F5,
        6 => Code::F6,
        7 => Code::F7,
        8 => Code::F8,
        9 => Code::F9,
        10 => Code::F10,
        11 => Code::F11,
        12 => Code::F12,
        _ => return None,
    };
    Some(code)
}
