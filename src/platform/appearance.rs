/// Whether the OS asks apps for a dark appearance.
pub trait SystemAppearance {
    fn prefers_dark(&self) -> bool;
}

/// Reads the per-user app theme setting.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTheme;

impl SystemAppearance for SystemTheme {
    fn prefers_dark(&self) -> bool {
        apps_use_dark_theme()
    }
}

#[cfg(windows)]
fn apps_use_dark_theme() -> bool {
    use winreg::enums::HKEY_CURRENT_USER;
    use winreg::RegKey;

    const PERSONALIZE: &str = r"Software\Microsoft\Windows\CurrentVersion\Themes\Personalize";

    let value = RegKey::predef(HKEY_CURRENT_USER)
        .open_subkey(PERSONALIZE)
        .and_then(|key| key.get_value::<u32, _>("AppsUseLightTheme"));
    match value {
        Ok(light) => light == 0,
        Err(err) => {
            tracing::debug!(%err, "AppsUseLightTheme not readable, assuming light");
            false
        }
    }
}

#[cfg(not(windows))]
fn apps_use_dark_theme() -> bool {
    false
}
