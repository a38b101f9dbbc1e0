mod config;
mod error;
mod hotkey;
mod logging;
mod placement;
mod platform;
mod ui;

use std::env;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{
        self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::config::{JsonSettingsStore, Settings};
use crate::error::{AppError, ThemeError};
use crate::platform::{
    DisplayEnumerator, FixedDisplays, GlobalHotkey, HotkeyRegistrar, OfflineHotkey, SystemAppearance,
    SystemDisplays, SystemTheme,
};
use crate::ui::dialogs::{self, DialogExit};
use crate::ui::options::{OptionsContext, OptionsDialog};
use crate::ui::theme::ThemeColorSet;
use crate::ui::theme_loader;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_help() {
    println!("swish {} - Options for the swish window switcher", VERSION);
    println!();
    println!("USAGE:");
    println!("    swish [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help                       Print help information");
    println!("    -v, --version                    Print version information");
    println!("    --themes-dir <DIR>               Read custom themes from DIR");
    println!("    --screens <N>                    Assume N attached screens");
    println!("    --print-settings                 Print the effective settings and exit");
    println!("    --export-theme <light|dark> <NAME>");
    println!("                                     Write a preset as NAME.stheme into the themes directory");
    println!();
    println!("ENVIRONMENT:");
    println!("    {}                         Log filter (default: info)", logging::LOG_ENV);
}

fn print_version() {
    println!("swish {}", VERSION);
}

#[derive(Debug, Default, PartialEq, Eq)]
enum Command {
    #[default]
    Dialog,
    Help,
    Version,
    PrintSettings,
    ExportTheme {
        preset: String,
        name: String,
    },
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Cli {
    themes_dir: Option<PathBuf>,
    screens: Option<usize>,
    command: Command,
}

fn usage(message: impl Into<String>) -> AppError {
    AppError::Usage(message.into())
}

fn parse_args(args: &[String]) -> Result<Cli, AppError> {
    let mut cli = Cli::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => cli.command = Command::Help,
            "-v" | "--version" => cli.command = Command::Version,
            "--print-settings" => cli.command = Command::PrintSettings,
            "--themes-dir" => {
                let dir = iter.next().ok_or_else(|| usage("--themes-dir requires a directory"))?;
                cli.themes_dir = Some(PathBuf::from(dir));
            }
            "--screens" => {
                let value = iter.next().ok_or_else(|| usage("--screens requires a number"))?;
                let count = value
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| usage(format!("invalid screen count: {}", value)))?;
                cli.screens = Some(count);
            }
            "--export-theme" => {
                let (Some(preset), Some(name)) = (iter.next(), iter.next()) else {
                    return Err(usage("--export-theme requires <light|dark> <NAME>"));
                };
                cli.command = Command::ExportTheme { preset: preset.clone(), name: name.clone() };
            }
            other => return Err(usage(format!("Unknown option: {}", other))),
        }
    }
    Ok(cli)
}

fn main() -> io::Result<()> {
    // Handle command line arguments
    let args: Vec<String> = env::args().skip(1).collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("Error: {}", err);
            eprintln!("Use --help for usage information");
            std::process::exit(2);
        }
    };
    match cli.command {
        Command::Help => {
            print_help();
            return Ok(());
        }
        Command::Version => {
            print_version();
            return Ok(());
        }
        _ => {}
    }

    if let Some(path) = logging::log_path() {
        if let Err(err) = logging::init(&path) {
            eprintln!("Warning: logging disabled: {}", err);
        }
    }

    if let Err(err) = run(&cli) {
        tracing::error!(%err, "swish failed");
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let store = JsonSettingsStore::open_default()?;
    match &cli.command {
        Command::PrintSettings => print_settings(cli, &store),
        Command::ExportTheme { preset, name } => export_theme(cli, preset, name),
        _ => run_dialog(cli, &store),
    }
}

fn themes_dir(cli: &Cli) -> Result<PathBuf, ThemeError> {
    cli.themes_dir.clone().or_else(Settings::themes_dir).ok_or(ThemeError::NoThemesDir)
}

/// Custom theme files, or none when the themes directory is unusable.
fn discover_or_empty(cli: &Cli) -> Vec<theme_loader::ThemeFile> {
    match themes_dir(cli).and_then(|dir| theme_loader::discover_theme_files(&dir)) {
        Ok(files) => files,
        Err(err) => {
            tracing::warn!(%err, "custom themes unavailable");
            Vec::new()
        }
    }
}

fn screen_count(cli: &Cli) -> usize {
    let displays: Box<dyn DisplayEnumerator> = match cli.screens {
        Some(count) => Box::new(FixedDisplays(count)),
        None => Box::new(SystemDisplays),
    };
    displays.screen_count()
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

fn settings_report(cli: &Cli, store: &JsonSettingsStore) -> Vec<String> {
    let settings = store.load_or_default();
    let files = discover_or_empty(cli);

    let themes = theme_loader::theme_options(&files);
    let theme = &themes[theme_loader::select_theme(&themes, &settings.theme_setting())];
    let placement = settings.placement().resolve(screen_count(cli));

    vec![
        format!("settings file:  {}", store.path().display()),
        format!(
            "hotkey:         {} ({})",
            settings.hotkey,
            if settings.enable_hotkey { "enabled" } else { "disabled" }
        ),
        format!("alt+tab:        {}", on_off(settings.alt_tab_hook)),
        format!("auto switch:    {}", on_off(settings.auto_switch)),
        format!("run as admin:   {}", on_off(settings.run_as_admin)),
        format!("theme:          {}", theme.label),
        format!("placement:      {}", placement.label()),
    ]
}

fn print_settings(cli: &Cli, store: &JsonSettingsStore) -> Result<(), AppError> {
    for line in settings_report(cli, store) {
        println!("{}", line);
    }
    Ok(())
}

fn export_theme(cli: &Cli, preset: &str, name: &str) -> Result<(), AppError> {
    let colors = match preset.to_lowercase().as_str() {
        "light" => ThemeColorSet::light(),
        "dark" => ThemeColorSet::dark(),
        other => return Err(usage(format!("unknown preset: {} (expected light or dark)", other))),
    };
    let path = theme_loader::export_theme(&themes_dir(cli)?, name, &colors)?;
    println!("Theme written to {}", path.display());
    Ok(())
}

fn run_dialog(cli: &Cli, store: &JsonSettingsStore) -> Result<(), AppError> {
    let settings = store.load_or_default();
    let context = OptionsContext {
        screen_count: screen_count(cli),
        theme_files: discover_or_empty(cli),
        system_prefers_dark: SystemTheme.prefers_dark(),
    };

    let mut registrar: Box<dyn HotkeyRegistrar> = match GlobalHotkey::load(&settings) {
        Ok(hotkey) => Box::new(hotkey),
        Err(err) => {
            tracing::warn!(%err, "global hotkeys unavailable, changes are only saved");
            Box::new(OfflineHotkey::load(&settings))
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    // Modifier combinations such as Ctrl+Shift+K need the kitty protocol
    let enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
            )
        )?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = {
        let mut dialog = OptionsDialog::open(&settings, &mut *registrar, store, context);
        run_app(&mut terminal, &mut dialog)
    };

    // Restore terminal
    if enhanced {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, crossterm::cursor::Show)?;

    match result? {
        DialogExit::Saved(saved) => {
            println!("Settings saved to {}", store.path().display());
            if saved.enable_hotkey {
                println!("Activate with {}", saved.hotkey);
            }
        }
        _ => println!("No changes saved"),
    }
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    dialog: &mut OptionsDialog,
) -> Result<DialogExit, AppError> {
    loop {
        terminal.draw(|f| {
            let area = f.area();
            dialogs::draw_options_dialog(f, dialog, area);
        })?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                match dialogs::handle_options_input(dialog, key)? {
                    DialogExit::Open => {}
                    exit => return Ok(exit),
                }
            }
        }
    }
}
