use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;
use crate::hotkey::HotkeyChord;
use crate::placement::DisplayPlacement;
use crate::ui::theme::{ThemeMode, ThemeSetting};

/// Which screen the switcher appears on, as persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DisplayBehaviour {
    #[default]
    FollowCursor,
    PrimaryScreen,
    CustomScreen,
}

impl DisplayBehaviour {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FollowCursor => "FollowCursor",
            Self::PrimaryScreen => "PrimaryScreen",
            Self::CustomScreen => "CustomScreen",
        }
    }
}

impl fmt::Display for DisplayBehaviour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayBehaviour {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "followcursor" => Ok(Self::FollowCursor),
            "primaryscreen" => Ok(Self::PrimaryScreen),
            "customscreen" => Ok(Self::CustomScreen),
            other => Err(format!("unknown display behaviour: {}", other)),
        }
    }
}

impl<'de> Deserialize<'de> for DisplayBehaviour {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        lenient(deserializer, "display_behaviour")
    }
}

/// Mode names are matched case-insensitively; an unknown name falls back to
/// the default instead of rejecting the whole file.
pub(crate) fn lenient<'de, D, T>(deserializer: D, field: &str) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr<Err = String> + Default,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.parse().unwrap_or_else(|err| {
        tracing::warn!(field, %err, "falling back to default");
        T::default()
    }))
}

fn default_true() -> bool {
    true
}

fn default_screen_index() -> i32 {
    -1
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_true")]
    pub enable_hotkey: bool,
    #[serde(default)]
    pub hotkey: HotkeyChord,
    /// Activate from Alt+Tab instead of (or in addition to) the hotkey
    #[serde(default)]
    pub alt_tab_hook: bool,
    /// Switch to the selected window when Alt is released
    #[serde(default)]
    pub auto_switch: bool,
    #[serde(default)]
    pub run_as_admin: bool,
    #[serde(default)]
    pub theme_mode: ThemeMode,
    /// File name (with extension) of the custom theme, empty unless
    /// `theme_mode` is `CustomTheme`
    #[serde(default)]
    pub custom_theme: String,
    #[serde(default)]
    pub display_behaviour: DisplayBehaviour,
    /// Zero-based screen index, -1 unless `display_behaviour` is `CustomScreen`
    #[serde(default = "default_screen_index")]
    pub screen_index: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable_hotkey: true,
            hotkey: HotkeyChord::default(),
            alt_tab_hook: false,
            auto_switch: false,
            run_as_admin: false,
            theme_mode: ThemeMode::SystemDefault,
            custom_theme: String::new(),
            display_behaviour: DisplayBehaviour::FollowCursor,
            screen_index: default_screen_index(),
        }
    }
}

impl Settings {
    /// Returns the config directory path (~/.swish)
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".swish"))
    }

    /// Returns the config file path (~/.swish/settings.json)
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("settings.json"))
    }

    /// Returns the themes directory (`Themes/` next to the executable)
    pub fn themes_dir() -> Option<PathBuf> {
        let exe = std::env::current_exe().ok()?;
        exe.parent().map(|dir| dir.join("Themes"))
    }

    pub fn theme_setting(&self) -> ThemeSetting {
        match self.theme_mode {
            ThemeMode::SystemDefault => ThemeSetting::SystemDefault,
            ThemeMode::DefaultLight => ThemeSetting::Light,
            ThemeMode::DefaultDark => ThemeSetting::Dark,
            ThemeMode::CustomTheme => ThemeSetting::Custom(self.custom_theme.clone()),
        }
    }

    pub fn set_theme_setting(&mut self, setting: &ThemeSetting) {
        self.theme_mode = setting.mode();
        self.custom_theme = match setting {
            ThemeSetting::Custom(file_name) => file_name.clone(),
            _ => String::new(),
        };
    }

    /// A negative index on a custom-screen entry can never match a screen;
    /// it is kept as an out-of-range index so resolution falls back.
    pub fn placement(&self) -> DisplayPlacement {
        match self.display_behaviour {
            DisplayBehaviour::FollowCursor => DisplayPlacement::FollowCursor,
            DisplayBehaviour::PrimaryScreen => DisplayPlacement::PrimaryScreen,
            DisplayBehaviour::CustomScreen => {
                DisplayPlacement::Screen(usize::try_from(self.screen_index).unwrap_or(usize::MAX))
            }
        }
    }

    pub fn set_placement(&mut self, placement: DisplayPlacement) {
        self.display_behaviour = placement.behaviour();
        self.screen_index = match placement {
            DisplayPlacement::Screen(index) => i32::try_from(index).unwrap_or(i32::MAX),
            _ => -1,
        };
    }
}

// ─── Persistence ───────────────────────────────────────────────────────

/// Where settings live. The options dialog saves through this and nothing
/// else, so a failed confirm never touches storage.
pub trait SettingsStore {
    fn load(&self) -> Result<Settings, ConfigError>;
    fn save(&self, settings: &Settings) -> Result<(), ConfigError>;
}

/// JSON file store with atomic writes.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location (~/.swish/settings.json)
    pub fn open_default() -> Result<Self, ConfigError> {
        Settings::config_path().map(Self::new).ok_or(ConfigError::NoConfigDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads settings, returns default if the file is missing or invalid
    pub fn load_or_default(&self) -> Settings {
        match self.load() {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "using default settings");
                Settings::default()
            }
        }
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> Result<Settings, ConfigError> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, settings: &Settings) -> Result<(), ConfigError> {
        let Some(config_dir) = self.path.parent() else {
            return Err(ConfigError::NoConfigDir);
        };

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            // Set directory permissions to user-only on Unix
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let perms = fs::Permissions::from_mode(0o700);
                let _ = fs::set_permissions(config_dir, perms);
            }
        }

        let mut temp_path = self.path.clone().into_os_string();
        temp_path.push(".tmp");
        let temp_path = PathBuf::from(temp_path);
        let content = serde_json::to_string_pretty(settings)?;

        // Atomic write: write to temp file first, then rename
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, &self.path)?;

        tracing::info!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}
