use thiserror::Error;

use crate::hotkey::HotkeyKey;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON in settings.json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not determine config directory")]
    NoConfigDir,
}

#[derive(Debug, Error)]
pub enum HotkeyError {
    #[error("Failed to create hotkey manager: {0}")]
    Manager(String),

    #[error("Key {0} cannot be registered as a global hotkey")]
    UnsupportedKey(HotkeyKey),

    #[error("Hotkey registration failed: {0}")]
    Os(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChordParseError {
    #[error("Hotkey is empty")]
    Empty,

    #[error("Unknown key: {0}")]
    UnknownKey(String),

    #[error("Hotkey has more than one non-modifier key: {0}")]
    MultipleKeys(String),

    #[error("Hotkey has no non-modifier key")]
    MissingKey,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid theme file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not determine themes directory")]
    NoThemesDir,
}

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Hotkey(#[from] HotkeyError),
}

/// Errors surfaced by the command line front end
#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Theme(#[from] ThemeError),

    #[error(transparent)]
    Options(#[from] OptionsError),

    #[error("{0}")]
    Usage(String),
}
