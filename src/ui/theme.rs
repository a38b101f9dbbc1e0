use std::fmt;
use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Deserializer, Serialize};

/// Extension of custom theme files
pub const THEME_FILE_EXTENSION: &str = "stheme";

// ═══════════════════════════════════════════════════════════════════════════════
// Theme selection
// ═══════════════════════════════════════════════════════════════════════════════

/// Persisted theme mode name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ThemeMode {
    /// Light or dark depending on the OS setting
    #[default]
    SystemDefault,
    DefaultLight,
    DefaultDark,
    CustomTheme,
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "systemdefault" => Ok(Self::SystemDefault),
            "defaultlight" => Ok(Self::DefaultLight),
            "defaultdark" => Ok(Self::DefaultDark),
            "customtheme" => Ok(Self::CustomTheme),
            other => Err(format!("unknown theme mode: {}", other)),
        }
    }
}

impl<'de> Deserialize<'de> for ThemeMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        crate::config::lenient(deserializer, "theme_mode")
    }
}

/// A theme choice. `Custom` holds the theme file name including extension.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ThemeSetting {
    #[default]
    SystemDefault,
    Light,
    Dark,
    Custom(String),
}

impl ThemeSetting {
    pub fn mode(&self) -> ThemeMode {
        match self {
            Self::SystemDefault => ThemeMode::SystemDefault,
            Self::Light => ThemeMode::DefaultLight,
            Self::Dark => ThemeMode::DefaultDark,
            Self::Custom(_) => ThemeMode::CustomTheme,
        }
    }
}

impl fmt::Display for ThemeSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SystemDefault => f.write_str("System default"),
            Self::Light => f.write_str("Light"),
            Self::Dark => f.write_str("Dark"),
            Self::Custom(file_name) => f.write_str(file_name),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Colors
// ═══════════════════════════════════════════════════════════════════════════════

/// Help label categories shown under the window list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpLabel {
    FocusWindow,
    CloseWindow,
    Navigation,
    Search,
    Dismiss,
}

/// Colors for every region of the switcher window.
///
/// Values are `#AARRGGBB` or `#RRGGBB` strings. Keys missing from a theme
/// file take the light preset value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeColorSet {
    // Search box
    pub search_box_background_color: String,
    pub search_box_font_color: String,
    pub search_box_border_color: String,
    pub search_box_text_selection_color: String,

    // Process list
    pub process_list_background_color: String,
    pub process_list_border_color: String,

    // Process items
    pub process_item_background_color: String,
    pub process_item_font_color: String,
    pub process_item_fade_out_color: String,
    pub process_item_closing_color: String,

    // Help labels
    pub focus_window_help_label_font_color: String,
    pub close_window_help_label_font_color: String,
    pub navigation_help_label_font_color: String,
    pub search_help_label_font_color: String,
    pub dismiss_help_label_font_color: String,
}

impl Default for ThemeColorSet {
    fn default() -> Self {
        Self::light()
    }
}

impl ThemeColorSet {
    pub fn light() -> Self {
        Self {
            search_box_background_color: "#FFFFFFFF".into(),
            search_box_font_color: "#FF000000".into(),
            search_box_border_color: "#FF808080".into(),
            search_box_text_selection_color: "#FFFFFFFF".into(),

            process_list_background_color: "#FFFFFFFF".into(),
            process_list_border_color: "#FF808080".into(),

            process_item_background_color: "#FFFFFFFF".into(),
            process_item_font_color: "#FF000000".into(),
            process_item_fade_out_color: "#FF808080".into(),
            process_item_closing_color: "#FF808080".into(),

            focus_window_help_label_font_color: "#FF000000".into(),
            close_window_help_label_font_color: "#FF000000".into(),
            navigation_help_label_font_color: "#FF000000".into(),
            search_help_label_font_color: "#FF000000".into(),
            dismiss_help_label_font_color: "#FF000000".into(),
        }
    }

    pub fn dark() -> Self {
        Self {
            search_box_background_color: "#FF000000".into(),
            search_box_font_color: "#FFFFFFFF".into(),
            search_box_border_color: "#FF808080".into(),
            search_box_text_selection_color: "#FFFFFFFF".into(),

            process_list_background_color: "#FF000000".into(),
            process_list_border_color: "#FF808080".into(),

            process_item_background_color: "#FF000000".into(),
            process_item_font_color: "#FFFFFFFF".into(),
            process_item_fade_out_color: "#FFFFFFFF".into(),
            process_item_closing_color: "#FFFFFFFF".into(),

            focus_window_help_label_font_color: "#FFFFFFFF".into(),
            close_window_help_label_font_color: "#FFFFFFFF".into(),
            navigation_help_label_font_color: "#FFFFFFFF".into(),
            search_help_label_font_color: "#FFFFFFFF".into(),
            dismiss_help_label_font_color: "#FFFFFFFF".into(),
        }
    }

    /// Theme as a pretty JSON document (theme file contents)
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn help_label_color(&self, label: HelpLabel) -> &str {
        match label {
            HelpLabel::FocusWindow => &self.focus_window_help_label_font_color,
            HelpLabel::CloseWindow => &self.close_window_help_label_font_color,
            HelpLabel::Navigation => &self.navigation_help_label_font_color,
            HelpLabel::Search => &self.search_help_label_font_color,
            HelpLabel::Dismiss => &self.dismiss_help_label_font_color,
        }
    }

    // ─── Terminal styles ───────────────────────────────────────────────

    /// Window body: list background with item text
    pub fn normal_style(&self) -> Style {
        Style::default()
            .fg(color_or(&self.process_item_font_color, Color::Reset))
            .bg(color_or(&self.process_list_background_color, Color::Reset))
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(color_or(&self.process_list_border_color, Color::Gray))
    }

    /// The hotkey capture box, drawn like the search box
    pub fn input_style(&self, focused: bool) -> Style {
        let style = Style::default()
            .fg(color_or(&self.search_box_font_color, Color::Reset))
            .bg(color_or(&self.search_box_background_color, Color::Reset));
        if focused {
            style.add_modifier(Modifier::REVERSED)
        } else {
            style
        }
    }

    pub fn input_border_style(&self) -> Style {
        Style::default().fg(color_or(&self.search_box_border_color, Color::Gray))
    }

    pub fn selected_style(&self) -> Style {
        self.normal_style().add_modifier(Modifier::REVERSED | Modifier::BOLD)
    }

    /// Disabled controls use the fading-out item color
    pub fn disabled_style(&self) -> Style {
        Style::default()
            .fg(color_or(&self.process_item_fade_out_color, Color::DarkGray))
            .add_modifier(Modifier::DIM)
    }

    /// Warnings use the closing-item color
    pub fn warning_style(&self) -> Style {
        Style::default()
            .fg(color_or(&self.process_item_closing_color, Color::Red))
            .add_modifier(Modifier::BOLD)
    }

    pub fn help_style(&self, label: HelpLabel) -> Style {
        Style::default().fg(color_or(self.help_label_color(label), Color::Reset))
    }
}

/// Parses `#AARRGGBB` or `#RRGGBB`. Alpha is dropped: terminal cells are
/// opaque.
pub fn parse_color(value: &str) -> Option<Color> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let rgb = match hex.len() {
        8 => &hex[2..],
        6 => hex,
        _ => return None,
    };
    let channel = |i: usize| u8::from_str_radix(rgb.get(i..i + 2)?, 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

fn color_or(value: &str, fallback: Color) -> Color {
    parse_color(value).unwrap_or(fallback)
}
