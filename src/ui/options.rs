//! Options dialog state and behavior, independent of how it is drawn.
//!
//! The dialog works on a draft copy of the settings. Nothing reaches the
//! settings store until `confirm` succeeds, and a chord owned by another
//! program leaves the store untouched.

use crossterm::event::KeyEvent;

use super::theme::{ThemeColorSet, ThemeSetting};
use super::theme_loader::{resolve_colors, select_theme, theme_options, ThemeFile, ThemeOption};
use crate::config::{Settings, SettingsStore};
use crate::error::OptionsError;
use crate::hotkey::HotkeyChord;
use crate::placement::{placement_options, select_placement, DisplayPlacement, PlacementOption};
use crate::platform::{HotkeyRegistrar, Registration};

pub const HOTKEY_IN_USE_TITLE: &str = "Shortcut already in use";
pub const HOTKEY_IN_USE_MESSAGE: &str =
    "Sorry! The selected shortcut for activating Swish is in use by another program. Please choose another.";

/// Dialog controls in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    HotkeyEnabled,
    Hotkey,
    AltTabHook,
    AutoSwitch,
    RunAsAdmin,
    Theme,
    Placement,
    Ok,
    Cancel,
}

const FIELD_ORDER: [Field; 9] = [
    Field::HotkeyEnabled,
    Field::Hotkey,
    Field::AltTabHook,
    Field::AutoSwitch,
    Field::RunAsAdmin,
    Field::Theme,
    Field::Placement,
    Field::Ok,
    Field::Cancel,
];

/// What the dialog needs to know about the machine when it opens.
#[derive(Debug, Clone, Default)]
pub struct OptionsContext {
    pub screen_count: usize,
    pub theme_files: Vec<ThemeFile>,
    pub system_prefers_dark: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// The key became the pending chord
    Captured,
    /// Modifier-only, released, or unmappable key
    Ignored,
    /// Tab alone: focus moved to the next control
    FocusNext,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Saved(Settings),
    /// Another program owns the chord; nothing was saved and the dialog stays
    /// open with a warning
    HotkeyInUse,
}

pub struct OptionsDialog<'a> {
    registrar: &'a mut dyn HotkeyRegistrar,
    store: &'a dyn SettingsStore,
    theme_files: Vec<ThemeFile>,
    system_prefers_dark: bool,

    enable_hotkey: bool,
    chord: HotkeyChord,
    alt_tab_hook: bool,
    auto_switch: bool,
    run_as_admin: bool,
    themes: Vec<ThemeOption>,
    theme_index: usize,
    preview: ThemeColorSet,
    placements: Vec<PlacementOption>,
    placement_index: usize,

    focus: Field,
    /// `enable_hotkey` as saved when the dialog opened
    saved_hotkey_enabled: bool,
    /// Set while the hotkey field has focus: whether leaving the field turns
    /// the live hotkey back on
    paused_hotkey: Option<bool>,
    warning: Option<&'static str>,
}

impl<'a> OptionsDialog<'a> {
    pub fn open(
        settings: &Settings,
        registrar: &'a mut dyn HotkeyRegistrar,
        store: &'a dyn SettingsStore,
        context: OptionsContext,
    ) -> Self {
        let chord = registrar.chord().clone();

        let themes = theme_options(&context.theme_files);
        let theme_index = select_theme(&themes, &settings.theme_setting());
        let placements = placement_options(context.screen_count);
        let placement_index = select_placement(&placements, settings.placement());

        let mut dialog = Self {
            registrar,
            store,
            theme_files: context.theme_files,
            system_prefers_dark: context.system_prefers_dark,
            enable_hotkey: settings.enable_hotkey,
            chord,
            alt_tab_hook: settings.alt_tab_hook,
            auto_switch: settings.auto_switch && settings.alt_tab_hook,
            run_as_admin: settings.run_as_admin,
            themes,
            theme_index,
            preview: ThemeColorSet::default(),
            placements,
            placement_index,
            focus: Field::HotkeyEnabled,
            saved_hotkey_enabled: settings.enable_hotkey,
            paused_hotkey: None,
            warning: None,
        };
        dialog.refresh_preview();
        dialog
    }

    // ─── Accessors ─────────────────────────────────────────────────────

    pub fn focus(&self) -> Field {
        self.focus
    }

    pub fn chord(&self) -> &HotkeyChord {
        &self.chord
    }

    pub fn hotkey_preview(&self) -> String {
        self.chord.to_string()
    }

    pub fn hotkey_enabled(&self) -> bool {
        self.enable_hotkey
    }

    pub fn alt_tab_hook(&self) -> bool {
        self.alt_tab_hook
    }

    pub fn auto_switch(&self) -> bool {
        self.auto_switch
    }

    pub fn run_as_admin(&self) -> bool {
        self.run_as_admin
    }

    pub fn theme_options(&self) -> &[ThemeOption] {
        &self.themes
    }

    pub fn theme_index(&self) -> usize {
        self.theme_index
    }

    pub fn selected_theme(&self) -> &ThemeSetting {
        &self.themes[self.theme_index].setting
    }

    pub fn placement_options(&self) -> &[PlacementOption] {
        &self.placements
    }

    pub fn placement_index(&self) -> usize {
        self.placement_index
    }

    pub fn selected_placement(&self) -> DisplayPlacement {
        self.placements[self.placement_index].placement
    }

    /// Colors of the selected theme, used to draw the dialog itself
    pub fn preview_colors(&self) -> &ThemeColorSet {
        &self.preview
    }

    pub fn warning(&self) -> Option<&'static str> {
        self.warning
    }

    /// Whether the system-wide hotkey is live right now (it is paused while
    /// the capture field has focus)
    pub fn live_hotkey_enabled(&self) -> bool {
        self.registrar.is_enabled()
    }

    pub fn is_field_enabled(&self, field: Field) -> bool {
        match field {
            Field::Hotkey => self.enable_hotkey,
            Field::AutoSwitch => self.alt_tab_hook,
            _ => true,
        }
    }

    // ─── Focus ─────────────────────────────────────────────────────────

    /// Moves focus. Entering the hotkey field pauses the live hotkey so the
    /// chord can be typed; leaving it restores the hotkey.
    pub fn set_focus(&mut self, field: Field) {
        if field == self.focus || !self.is_field_enabled(field) {
            return;
        }
        if self.focus == Field::Hotkey {
            self.leave_hotkey_field();
        }
        self.focus = field;
        if field == Field::Hotkey {
            self.enter_hotkey_field();
        }
    }

    pub fn focus_next(&mut self) {
        self.step_focus(1);
    }

    pub fn focus_prev(&mut self) {
        self.step_focus(FIELD_ORDER.len() - 1);
    }

    fn step_focus(&mut self, step: usize) {
        let len = FIELD_ORDER.len();
        let mut index = FIELD_ORDER.iter().position(|f| *f == self.focus).unwrap_or(0);
        for _ in 0..len {
            index = (index + step) % len;
            if self.is_field_enabled(FIELD_ORDER[index]) {
                self.set_focus(FIELD_ORDER[index]);
                return;
            }
        }
    }

    /// A saved-enabled hotkey is restored on leaving even when it was not
    /// registered on entry, so a chord another program has since released
    /// gets picked up again.
    fn enter_hotkey_field(&mut self) {
        let restore = self.saved_hotkey_enabled || self.registrar.is_enabled();
        if let Err(err) = self.registrar.set_enabled(false) {
            tracing::warn!(%err, "could not pause hotkey while editing");
        }
        self.paused_hotkey = Some(restore);
    }

    /// Best-effort: another program may own the chord.
    fn leave_hotkey_field(&mut self) {
        if self.paused_hotkey.take() != Some(true) {
            return;
        }
        match self.registrar.set_enabled(true) {
            Ok(Registration::AlreadyInUse) => {
                tracing::debug!(chord = %self.registrar.chord(), "hotkey could not be re-enabled");
            }
            Ok(_) => {}
            Err(err) => tracing::warn!(%err, "hotkey could not be re-enabled"),
        }
    }

    // ─── Editing ───────────────────────────────────────────────────────

    /// Reads a key press in the hotkey field.
    pub fn handle_hotkey_key(&mut self, event: &KeyEvent) -> CaptureOutcome {
        if self.focus != Field::Hotkey {
            return CaptureOutcome::Ignored;
        }
        let Some(chord) = HotkeyChord::from_key_event(event) else {
            return CaptureOutcome::Ignored;
        };
        if chord.is_focus_escape() {
            self.focus_next();
            return CaptureOutcome::FocusNext;
        }
        tracing::debug!(%chord, "hotkey captured");
        self.chord = chord;
        CaptureOutcome::Captured
    }

    pub fn set_hotkey_enabled(&mut self, enabled: bool) {
        self.enable_hotkey = enabled;
    }

    /// Turning the alternate activation off also turns auto-switch off.
    pub fn set_alt_tab_hook(&mut self, enabled: bool) {
        self.alt_tab_hook = enabled;
        if !enabled {
            self.auto_switch = false;
        }
    }

    pub fn set_auto_switch(&mut self, enabled: bool) {
        self.auto_switch = enabled && self.alt_tab_hook;
    }

    pub fn set_run_as_admin(&mut self, enabled: bool) {
        self.run_as_admin = enabled;
    }

    /// Flips the focused checkbox. Returns false when focus is not on one.
    pub fn toggle_focused(&mut self) -> bool {
        match self.focus {
            Field::HotkeyEnabled => self.set_hotkey_enabled(!self.enable_hotkey),
            Field::AltTabHook => self.set_alt_tab_hook(!self.alt_tab_hook),
            Field::AutoSwitch => self.set_auto_switch(!self.auto_switch),
            Field::RunAsAdmin => self.set_run_as_admin(!self.run_as_admin),
            _ => return false,
        }
        true
    }

    pub fn select_theme(&mut self, index: usize) {
        if index < self.themes.len() && index != self.theme_index {
            self.theme_index = index;
            self.refresh_preview();
        }
    }

    pub fn select_placement(&mut self, index: usize) {
        if index < self.placements.len() {
            self.placement_index = index;
        }
    }

    /// Steps the focused dropdown forward or back, wrapping around.
    /// Returns false when focus is not on a dropdown.
    pub fn cycle_focused(&mut self, forward: bool) -> bool {
        let (index, len) = match self.focus {
            Field::Theme => (self.theme_index, self.themes.len()),
            Field::Placement => (self.placement_index, self.placements.len()),
            _ => return false,
        };
        let next = if forward { (index + 1) % len } else { (index + len - 1) % len };
        match self.focus {
            Field::Theme => self.select_theme(next),
            _ => self.select_placement(next),
        }
        true
    }

    fn refresh_preview(&mut self) {
        self.preview = resolve_colors(self.selected_theme(), &self.theme_files, self.system_prefers_dark);
    }

    pub fn dismiss_warning(&mut self) {
        if self.warning.take().is_some() {
            self.set_focus(Field::Hotkey);
        }
    }

    // ─── Confirm / cancel ──────────────────────────────────────────────

    /// Applies the hotkey and saves everything, or nothing.
    pub fn confirm(&mut self) -> Result<ConfirmOutcome, OptionsError> {
        let previous_chord = self.registrar.chord().clone();
        let previous_enabled = match self.paused_hotkey {
            Some(restore) => restore,
            None => self.registrar.is_enabled(),
        };

        let _ = self.registrar.set_enabled(false)?;
        // Paused state stays with the field until the disable went through
        self.paused_hotkey = None;

        if self.enable_hotkey {
            self.registrar.set_chord(self.chord.clone());
            let registration = match self.registrar.set_enabled(true) {
                Ok(registration) => registration,
                Err(err) => {
                    self.restore_registration(previous_chord, previous_enabled);
                    return Err(err.into());
                }
            };
            if registration == Registration::AlreadyInUse {
                tracing::info!(chord = %self.chord, "chosen hotkey is in use, nothing saved");
                self.restore_registration(previous_chord, previous_enabled);
                // The popup takes focus; dismissing it enters the field again
                if self.focus == Field::Hotkey {
                    self.focus = Field::Ok;
                }
                self.warning = Some(HOTKEY_IN_USE_MESSAGE);
                return Ok(ConfirmOutcome::HotkeyInUse);
            }
        }

        let settings = self.to_settings();
        if let Err(err) = self.store.save(&settings) {
            self.restore_registration(previous_chord, previous_enabled);
            return Err(err.into());
        }
        if self.focus == Field::Hotkey {
            self.focus = Field::Ok;
        }
        Ok(ConfirmOutcome::Saved(settings))
    }

    /// Discards every change and restores the live hotkey if it was paused.
    pub fn cancel(&mut self) {
        if self.focus == Field::Hotkey {
            self.leave_hotkey_field();
            self.focus = Field::Cancel;
        }
        tracing::debug!("options dialog cancelled");
    }

    fn restore_registration(&mut self, chord: HotkeyChord, enabled: bool) {
        self.registrar.set_chord(chord);
        if !enabled {
            return;
        }
        match self.registrar.set_enabled(true) {
            Ok(Registration::AlreadyInUse) => tracing::debug!("previous hotkey could not be restored"),
            Ok(_) => {}
            Err(err) => tracing::warn!(%err, "previous hotkey could not be restored"),
        }
    }

    /// The chord saved is the one the registrar holds: with the hotkey
    /// disabled the previous chord is kept.
    fn to_settings(&self) -> Settings {
        let mut settings = Settings {
            enable_hotkey: self.enable_hotkey,
            hotkey: self.registrar.chord().clone(),
            alt_tab_hook: self.alt_tab_hook,
            auto_switch: self.auto_switch,
            run_as_admin: self.run_as_admin,
            ..Settings::default()
        };
        settings.set_theme_setting(self.selected_theme());
        settings.set_placement(self.selected_placement());
        settings
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::RefCell;
    use std::fs;

    use crossterm::event::{KeyCode, KeyModifiers, ModifierKeyCode};

    use super::*;
    use crate::error::{ConfigError, HotkeyError};
    use crate::hotkey::HotkeyKey;

    /// Registrar that refuses chords listed in `taken`.
    pub(crate) struct FakeRegistrar {
        pub chord: HotkeyChord,
        pub enabled: bool,
        pub taken: Vec<HotkeyChord>,
        pub enable_attempts: usize,
        pub disable_calls: usize,
        /// Fails the disable call with this number (1-based)
        pub fail_disable_call: Option<usize>,
    }

    impl FakeRegistrar {
        pub fn new(chord: HotkeyChord, enabled: bool) -> Self {
            Self { chord, enabled, taken: Vec::new(), enable_attempts: 0, disable_calls: 0, fail_disable_call: None }
        }
    }

    impl HotkeyRegistrar for FakeRegistrar {
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
            if !enabled {
                self.disable_calls += 1;
                if self.fail_disable_call == Some(self.disable_calls) {
                    return Err(HotkeyError::Os("unregister refused".into()));
                }
                self.enabled = false;
                return Ok(Registration::Inactive);
            }
            self.enable_attempts += 1;
            if self.taken.contains(&self.chord) {
                self.enabled = false;
                return Ok(Registration::AlreadyInUse);
            }
            self.enabled = true;
            Ok(Registration::Active)
        }
    }

    #[derive(Default)]
    pub(crate) struct MemoryStore {
        pub saved: RefCell<Vec<Settings>>,
        pub fail: bool,
    }

    impl SettingsStore for MemoryStore {
        fn load(&self) -> Result<Settings, ConfigError> {
            Ok(self.saved.borrow().last().cloned().unwrap_or_default())
        }

        fn save(&self, settings: &Settings) -> Result<(), ConfigError> {
            if self.fail {
                return Err(ConfigError::NoConfigDir);
            }
            self.saved.borrow_mut().push(settings.clone());
            Ok(())
        }
    }

    fn context(screen_count: usize) -> OptionsContext {
        OptionsContext { screen_count, theme_files: Vec::new(), system_prefers_dark: false }
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn ctrl_shift_k() -> HotkeyChord {
        "ctrl+shift+k".parse().unwrap()
    }

    #[test]
    fn test_open_reflects_settings() {
        let mut settings = Settings::default();
        settings.alt_tab_hook = true;
        settings.auto_switch = true;
        settings.set_theme_setting(&ThemeSetting::Dark);
        settings.set_placement(DisplayPlacement::Screen(1));

        let mut registrar = FakeRegistrar::new(settings.hotkey.clone(), true);
        let store = MemoryStore::default();
        let dialog = OptionsDialog::open(&settings, &mut registrar, &store, context(2));

        assert_eq!(dialog.hotkey_preview(), "Alt + Space");
        assert!(dialog.auto_switch());
        assert_eq!(dialog.theme_index(), 2);
        assert_eq!(dialog.preview_colors(), &ThemeColorSet::dark());
        assert_eq!(dialog.selected_placement(), DisplayPlacement::Screen(1));
        assert_eq!(dialog.placement_options().len(), 4);
    }

    #[test]
    fn test_open_falls_back_for_missing_theme_and_screen() {
        let mut settings = Settings::default();
        settings.set_theme_setting(&ThemeSetting::Custom("Gone.stheme".into()));
        settings.set_placement(DisplayPlacement::Screen(3));

        let mut registrar = FakeRegistrar::new(settings.hotkey.clone(), true);
        let store = MemoryStore::default();
        let dialog = OptionsDialog::open(&settings, &mut registrar, &store, context(2));

        assert_eq!(dialog.theme_index(), 0);
        assert_eq!(dialog.selected_theme(), &ThemeSetting::SystemDefault);
        assert_eq!(dialog.placement_index(), 0);
        assert_eq!(dialog.selected_placement(), DisplayPlacement::FollowCursor);
    }

    #[test]
    fn test_open_with_discovered_custom_theme() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("Ember.stheme"), r##"{"process_list_background_color":"#FF331100"}"##).unwrap();
        let theme_files = crate::ui::theme_loader::discover_theme_files(tmp.path()).unwrap();

        let mut settings = Settings::default();
        settings.set_theme_setting(&ThemeSetting::Custom("ember.stheme".into()));
        let mut registrar = FakeRegistrar::new(settings.hotkey.clone(), true);
        let store = MemoryStore::default();
        let ctx = OptionsContext { screen_count: 1, theme_files, system_prefers_dark: false };
        let dialog = OptionsDialog::open(&settings, &mut registrar, &store, ctx);

        assert_eq!(dialog.theme_index(), 3);
        assert_eq!(dialog.preview_colors().process_list_background_color, "#FF331100");
    }

    #[test]
    fn test_focus_on_hotkey_field_pauses_live_hotkey() {
        let settings = Settings::default();
        let mut registrar = FakeRegistrar::new(settings.hotkey.clone(), true);
        let store = MemoryStore::default();
        let mut dialog = OptionsDialog::open(&settings, &mut registrar, &store, context(1));

        dialog.set_focus(Field::Hotkey);
        assert!(!dialog.live_hotkey_enabled());
        dialog.set_focus(Field::Theme);
        assert!(dialog.live_hotkey_enabled());
    }

    #[test]
    fn test_leaving_field_does_not_enable_a_disabled_hotkey() {
        let mut settings = Settings::default();
        settings.enable_hotkey = false;
        let mut registrar = FakeRegistrar::new(settings.hotkey.clone(), false);
        let store = MemoryStore::default();
        {
            let mut dialog = OptionsDialog::open(&settings, &mut registrar, &store, context(1));
            // Checked in the draft only; the saved flag is still off
            dialog.set_hotkey_enabled(true);
            dialog.set_focus(Field::Hotkey);
            dialog.focus_next();
            assert_eq!(dialog.focus(), Field::AltTabHook);
        }
        assert!(!registrar.enabled);
        assert_eq!(registrar.enable_attempts, 0);
    }

    #[test]
    fn test_leaving_field_retries_saved_hotkey_that_was_not_registered() {
        // Saved as enabled, but another program held the chord at startup
        let settings = Settings::default();
        let mut registrar = FakeRegistrar::new(settings.hotkey.clone(), false);
        let store = MemoryStore::default();
        {
            let mut dialog = OptionsDialog::open(&settings, &mut registrar, &store, context(1));
            dialog.set_focus(Field::Hotkey);
            dialog.set_focus(Field::Theme);
            assert!(dialog.live_hotkey_enabled());
        }
        assert_eq!(registrar.enable_attempts, 1);
        assert!(registrar.enabled);
    }

    #[test]
    fn test_failed_pause_on_confirm_keeps_restore_pending() {
        let settings = Settings::default();
        let mut registrar = FakeRegistrar::new(settings.hotkey.clone(), true);
        // First disable is entering the field, second is confirm
        registrar.fail_disable_call = Some(2);
        let store = MemoryStore::default();
        {
            let mut dialog = OptionsDialog::open(&settings, &mut registrar, &store, context(1));
            dialog.set_focus(Field::Hotkey);
            dialog.handle_hotkey_key(&key(KeyCode::Char('K'), KeyModifiers::CONTROL | KeyModifiers::SHIFT));
            assert!(matches!(dialog.confirm(), Err(OptionsError::Hotkey(_))));
            assert_eq!(dialog.focus(), Field::Hotkey);
            dialog.cancel();
        }
        assert!(registrar.enabled);
        assert_eq!(registrar.chord, HotkeyChord::default());
        assert!(store.saved.borrow().is_empty());
    }

    #[test]
    fn test_failed_reenable_is_swallowed() {
        let settings = Settings::default();
        let mut registrar = FakeRegistrar::new(settings.hotkey.clone(), true);
        registrar.taken.push(settings.hotkey.clone());
        let store = MemoryStore::default();
        let mut dialog = OptionsDialog::open(&settings, &mut registrar, &store, context(1));

        dialog.set_focus(Field::Hotkey);
        dialog.set_focus(Field::RunAsAdmin);
        assert_eq!(dialog.focus(), Field::RunAsAdmin);
        assert!(!dialog.live_hotkey_enabled());
    }

    #[test]
    fn test_capture_renders_chord() {
        let settings = Settings::default();
        let mut registrar = FakeRegistrar::new(settings.hotkey.clone(), true);
        let store = MemoryStore::default();
        let mut dialog = OptionsDialog::open(&settings, &mut registrar, &store, context(1));
        dialog.set_focus(Field::Hotkey);

        let shift = key(KeyCode::Modifier(ModifierKeyCode::LeftShift), KeyModifiers::SHIFT);
        assert_eq!(dialog.handle_hotkey_key(&shift), CaptureOutcome::Ignored);
        assert_eq!(dialog.hotkey_preview(), "Alt + Space");

        let event = key(KeyCode::Char('K'), KeyModifiers::CONTROL | KeyModifiers::SHIFT);
        assert_eq!(dialog.handle_hotkey_key(&event), CaptureOutcome::Captured);
        assert_eq!(dialog.hotkey_preview(), "Ctrl + Shift + K");
    }

    #[test]
    fn test_capture_only_in_hotkey_field() {
        let settings = Settings::default();
        let mut registrar = FakeRegistrar::new(settings.hotkey.clone(), true);
        let store = MemoryStore::default();
        let mut dialog = OptionsDialog::open(&settings, &mut registrar, &store, context(1));

        let event = key(KeyCode::Char('k'), KeyModifiers::CONTROL);
        assert_eq!(dialog.handle_hotkey_key(&event), CaptureOutcome::Ignored);
        assert_eq!(dialog.hotkey_preview(), "Alt + Space");
    }

    #[test]
    fn test_tab_alone_moves_focus_and_is_never_saved() {
        let settings = Settings::default();
        let mut registrar = FakeRegistrar::new(settings.hotkey.clone(), true);
        let store = MemoryStore::default();
        {
            let mut dialog = OptionsDialog::open(&settings, &mut registrar, &store, context(1));
            dialog.set_focus(Field::Hotkey);

            let tab = key(KeyCode::Tab, KeyModifiers::NONE);
            assert_eq!(dialog.handle_hotkey_key(&tab), CaptureOutcome::FocusNext);
            assert_eq!(dialog.focus(), Field::AltTabHook);
            assert_eq!(dialog.hotkey_preview(), "Alt + Space");

            let outcome = dialog.confirm().unwrap();
            let ConfirmOutcome::Saved(saved) = outcome else {
                panic!("expected save");
            };
            assert_eq!(saved.hotkey.to_string(), "Alt + Space");
        }
        assert!(registrar.enabled);
    }

    #[test]
    fn test_disabled_controls_are_skipped() {
        let settings = Settings::default();
        let mut registrar = FakeRegistrar::new(settings.hotkey.clone(), true);
        let store = MemoryStore::default();
        let mut dialog = OptionsDialog::open(&settings, &mut registrar, &store, context(1));

        assert!(dialog.toggle_focused());
        assert!(!dialog.hotkey_enabled());
        dialog.focus_next();
        assert_eq!(dialog.focus(), Field::AltTabHook);
        dialog.focus_next();
        assert_eq!(dialog.focus(), Field::RunAsAdmin);
        dialog.focus_prev();
        dialog.focus_prev();
        assert_eq!(dialog.focus(), Field::HotkeyEnabled);
        dialog.focus_prev();
        assert_eq!(dialog.focus(), Field::Cancel);
    }

    #[test]
    fn test_unchecking_alt_tab_clears_auto_switch() {
        let mut settings = Settings::default();
        settings.alt_tab_hook = true;
        settings.auto_switch = true;
        let mut registrar = FakeRegistrar::new(settings.hotkey.clone(), true);
        let store = MemoryStore::default();
        let mut dialog = OptionsDialog::open(&settings, &mut registrar, &store, context(1));

        dialog.set_alt_tab_hook(false);
        assert!(!dialog.auto_switch());
        assert!(!dialog.is_field_enabled(Field::AutoSwitch));
        dialog.set_auto_switch(true);
        assert!(!dialog.auto_switch());
        dialog.set_alt_tab_hook(true);
        dialog.set_auto_switch(true);
        assert!(dialog.auto_switch());
    }

    #[test]
    fn test_cycle_dropdowns_wrap() {
        let settings = Settings::default();
        let mut registrar = FakeRegistrar::new(settings.hotkey.clone(), true);
        let store = MemoryStore::default();
        let mut dialog = OptionsDialog::open(&settings, &mut registrar, &store, context(1));

        assert!(!dialog.cycle_focused(true));
        dialog.set_focus(Field::Theme);
        assert!(dialog.cycle_focused(false));
        assert_eq!(dialog.selected_theme(), &ThemeSetting::Dark);
        assert_eq!(dialog.preview_colors(), &ThemeColorSet::dark());

        dialog.set_focus(Field::Placement);
        dialog.cycle_focused(true);
        dialog.cycle_focused(true);
        assert_eq!(dialog.selected_placement(), DisplayPlacement::FollowCursor);
    }

    #[test]
    fn test_confirm_saves_everything() {
        let settings = Settings::default();
        let mut registrar = FakeRegistrar::new(settings.hotkey.clone(), true);
        let store = MemoryStore::default();
        {
            let mut dialog = OptionsDialog::open(&settings, &mut registrar, &store, context(3));
            dialog.set_focus(Field::Hotkey);
            dialog.handle_hotkey_key(&key(KeyCode::Char('K'), KeyModifiers::CONTROL | KeyModifiers::SHIFT));
            dialog.set_run_as_admin(true);
            dialog.select_theme(1);
            dialog.select_placement(4);

            let outcome = dialog.confirm().unwrap();
            assert!(matches!(outcome, ConfirmOutcome::Saved(_)));
        }

        let saved = store.saved.borrow();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].hotkey, ctrl_shift_k());
        assert!(saved[0].run_as_admin);
        assert_eq!(saved[0].theme_setting(), ThemeSetting::Light);
        assert_eq!(saved[0].placement(), DisplayPlacement::Screen(2));
        assert_eq!(registrar.chord, ctrl_shift_k());
        assert!(registrar.enabled);
    }

    #[test]
    fn test_confirm_with_hotkey_disabled_never_registers() {
        let settings = Settings::default();
        let mut registrar = FakeRegistrar::new(settings.hotkey.clone(), true);
        registrar.taken.push(ctrl_shift_k());
        let store = MemoryStore::default();
        {
            let mut dialog = OptionsDialog::open(&settings, &mut registrar, &store, context(1));
            dialog.set_focus(Field::Hotkey);
            dialog.handle_hotkey_key(&key(KeyCode::Char('K'), KeyModifiers::CONTROL | KeyModifiers::SHIFT));
            dialog.set_focus(Field::HotkeyEnabled);
            dialog.toggle_focused();
            assert!(dialog.live_hotkey_enabled());

            let outcome = dialog.confirm().unwrap();
            let ConfirmOutcome::Saved(saved) = outcome else {
                panic!("expected save");
            };
            assert!(!saved.enable_hotkey);
            assert_eq!(saved.hotkey, HotkeyChord::default());
        }
        // The only enable was restoring the paused hotkey on leaving the field
        assert_eq!(registrar.enable_attempts, 1);
        assert!(!registrar.enabled);
        assert_eq!(store.saved.borrow().len(), 1);
    }

    #[test]
    fn test_confirm_with_chord_in_use_saves_nothing() {
        let settings = Settings::default();
        let mut registrar = FakeRegistrar::new(settings.hotkey.clone(), true);
        registrar.taken.push(ctrl_shift_k());
        let store = MemoryStore::default();
        {
            let mut dialog = OptionsDialog::open(&settings, &mut registrar, &store, context(1));
            dialog.set_run_as_admin(true);
            dialog.select_theme(2);
            dialog.set_focus(Field::Hotkey);
            dialog.handle_hotkey_key(&key(KeyCode::Char('K'), KeyModifiers::CONTROL | KeyModifiers::SHIFT));
            dialog.set_focus(Field::Ok);

            assert_eq!(dialog.confirm().unwrap(), ConfirmOutcome::HotkeyInUse);
            assert_eq!(dialog.warning(), Some(HOTKEY_IN_USE_MESSAGE));
            assert!(dialog.run_as_admin());

            dialog.dismiss_warning();
            assert_eq!(dialog.warning(), None);
            assert_eq!(dialog.focus(), Field::Hotkey);

            dialog.handle_hotkey_key(&key(KeyCode::F(9), KeyModifiers::ALT));
            assert!(matches!(dialog.confirm().unwrap(), ConfirmOutcome::Saved(_)));
        }

        let saved = store.saved.borrow();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].hotkey.to_string(), "Alt + F9");
        assert!(saved[0].run_as_admin);
    }

    #[test]
    fn test_in_use_restores_previous_hotkey() {
        let settings = Settings::default();
        let mut registrar = FakeRegistrar::new(settings.hotkey.clone(), true);
        registrar.taken.push(ctrl_shift_k());
        let store = MemoryStore::default();
        {
            let mut dialog = OptionsDialog::open(&settings, &mut registrar, &store, context(1));
            dialog.set_focus(Field::Hotkey);
            dialog.handle_hotkey_key(&key(KeyCode::Char('K'), KeyModifiers::CONTROL | KeyModifiers::SHIFT));
            assert_eq!(dialog.confirm().unwrap(), ConfirmOutcome::HotkeyInUse);
            assert!(dialog.live_hotkey_enabled());

            dialog.dismiss_warning();
            assert_eq!(dialog.focus(), Field::Hotkey);
            assert!(!dialog.live_hotkey_enabled());
            dialog.cancel();
        }
        assert_eq!(registrar.chord, HotkeyChord::default());
        assert!(registrar.enabled);
        assert!(store.saved.borrow().is_empty());
    }

    #[test]
    fn test_store_failure_is_reported_and_hotkey_restored() {
        let settings = Settings::default();
        let mut registrar = FakeRegistrar::new(settings.hotkey.clone(), true);
        let store = MemoryStore { fail: true, ..MemoryStore::default() };
        {
            let mut dialog = OptionsDialog::open(&settings, &mut registrar, &store, context(1));
            dialog.set_focus(Field::Hotkey);
            dialog.handle_hotkey_key(&key(KeyCode::Char('K'), KeyModifiers::CONTROL | KeyModifiers::SHIFT));
            assert!(matches!(dialog.confirm(), Err(OptionsError::Config(_))));
        }
        assert_eq!(registrar.chord, HotkeyChord::default());
        assert!(registrar.enabled);
    }

    #[test]
    fn test_cancel_discards_and_restores() {
        let settings = Settings::default();
        let mut registrar = FakeRegistrar::new(settings.hotkey.clone(), true);
        let store = MemoryStore::default();
        {
            let mut dialog = OptionsDialog::open(&settings, &mut registrar, &store, context(1));
            dialog.set_run_as_admin(true);
            dialog.set_focus(Field::Hotkey);
            dialog.handle_hotkey_key(&key(KeyCode::Char('Q'), KeyModifiers::CONTROL));
            dialog.cancel();
        }
        assert!(store.saved.borrow().is_empty());
        assert!(registrar.enabled);
        assert_eq!(registrar.chord.key, HotkeyKey::Space);
    }
}
