use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::theme::{ThemeColorSet, ThemeSetting, THEME_FILE_EXTENSION};
use crate::error::ThemeError;

// ═══════════════════════════════════════════════════════════════════════════════
// Theme file discovery
// ═══════════════════════════════════════════════════════════════════════════════

/// A theme file found in the themes directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeFile {
    /// File name without extension, shown in the dropdown
    pub label: String,
    /// File name with extension, stored in settings
    pub file_name: String,
    pub path: PathBuf,
}

/// Lists `*.stheme` files in `dir`, creating the directory if it is missing.
/// The extension is matched case-insensitively; results are sorted by file
/// name.
pub fn discover_theme_files(dir: &Path) -> Result<Vec<ThemeFile>, ThemeError> {
    fs::create_dir_all(dir)?;

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_theme = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case(THEME_FILE_EXTENSION))
            .unwrap_or(false);
        if !is_theme {
            continue;
        }
        let (Some(label), Some(file_name)) = (
            path.file_stem().and_then(|s| s.to_str()),
            path.file_name().and_then(|s| s.to_str()),
        ) else {
            tracing::debug!(path = %path.display(), "skipping theme file with non UTF-8 name");
            continue;
        };
        files.push(ThemeFile {
            label: label.to_string(),
            file_name: file_name.to_string(),
            path: path.clone(),
        });
    }

    files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    tracing::debug!(dir = %dir.display(), count = files.len(), "theme files discovered");
    Ok(files)
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

pub fn find_theme_file<'a>(files: &'a [ThemeFile], file_name: &str) -> Option<&'a ThemeFile> {
    files.iter().find(|f| same_name(&f.file_name, file_name))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Dropdown options
// ═══════════════════════════════════════════════════════════════════════════════

/// One entry of the theme dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeOption {
    pub label: String,
    pub setting: ThemeSetting,
}

/// Built-in entries first, then one entry per theme file. A file whose label
/// matches an entry already listed (ignoring case) is skipped, so
/// `light.stheme` never shadows the built-in Light theme.
pub fn theme_options(files: &[ThemeFile]) -> Vec<ThemeOption> {
    let mut options: Vec<ThemeOption> = [ThemeSetting::SystemDefault, ThemeSetting::Light, ThemeSetting::Dark]
        .into_iter()
        .map(|setting| ThemeOption { label: setting.to_string(), setting })
        .collect();

    for file in files {
        if options.iter().any(|o| same_name(&o.label, &file.label)) {
            tracing::debug!(file = %file.file_name, "theme label already listed");
            continue;
        }
        options.push(ThemeOption {
            label: file.label.clone(),
            setting: ThemeSetting::Custom(file.file_name.clone()),
        });
    }
    options
}

/// Index of the entry matching a saved setting, or 0 when nothing matches.
/// Custom themes match on file name, ignoring case.
pub fn select_theme(options: &[ThemeOption], saved: &ThemeSetting) -> usize {
    let index = match saved {
        ThemeSetting::Custom(name) => options.iter().position(|o| match &o.setting {
            ThemeSetting::Custom(file_name) => same_name(file_name, name),
            _ => false,
        }),
        other => options.iter().position(|o| &o.setting == other),
    };
    index.unwrap_or_else(|| {
        tracing::info!(saved = %saved, "saved theme not available, selecting first entry");
        0
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// Loading
// ═══════════════════════════════════════════════════════════════════════════════

/// Loads a theme file. Missing keys take the light preset value.
pub fn load_theme_file(path: &Path) -> Result<ThemeColorSet, ThemeError> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| ThemeError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Colors for a theme setting. An unresolvable custom theme falls back to the
/// system default preset.
pub fn resolve_colors(setting: &ThemeSetting, files: &[ThemeFile], prefers_dark: bool) -> ThemeColorSet {
    let system_default = || if prefers_dark { ThemeColorSet::dark() } else { ThemeColorSet::light() };

    match setting {
        ThemeSetting::SystemDefault => system_default(),
        ThemeSetting::Light => ThemeColorSet::light(),
        ThemeSetting::Dark => ThemeColorSet::dark(),
        ThemeSetting::Custom(name) => {
            let Some(file) = find_theme_file(files, name) else {
                tracing::warn!(theme = %name, "custom theme not found, using system default");
                return system_default();
            };
            match load_theme_file(&file.path) {
                Ok(colors) => colors,
                Err(err) => {
                    tracing::warn!(theme = %name, %err, "custom theme unreadable, using system default");
                    system_default()
                }
            }
        }
    }
}

/// Writes `colors` as `{name}.stheme` into `dir` as a starting point for a
/// custom theme. Never overwrites an existing file.
/// Security: rejects names that would escape `dir`
pub fn export_theme(dir: &Path, name: &str, colors: &ThemeColorSet) -> Result<PathBuf, ThemeError> {
    if name.is_empty()
        || name.len() > 64
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..")
        || name.chars().any(|c| c.is_control())
    {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, format!("invalid theme name: {:?}", name)).into());
    }

    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.{}", name, THEME_FILE_EXTENSION));
    if path.exists() {
        return Err(io::Error::new(io::ErrorKind::AlreadyExists, format!("{} already exists", path.display())).into());
    }
    fs::write(&path, colors.to_json())?;
    tracing::info!(path = %path.display(), "theme exported");
    Ok(path)
}
