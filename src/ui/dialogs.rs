use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::options::{ConfirmOutcome, Field, OptionsDialog, HOTKEY_IN_USE_TITLE};
use super::theme::{HelpLabel, ThemeColorSet};
use crate::config::Settings;
use crate::error::OptionsError;

// Dialog sizes
const DIALOG_MIN_WIDTH: u16 = 62;
const DIALOG_HEIGHT: u16 = 14;
const DROPDOWN_PREFIX_WIDTH: u16 = 20; // prompt + label + "< " + " >" + border
const WARNING_WIDTH: u16 = 48;

/// What the event loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogExit {
    Open,
    Saved(Settings),
    Cancelled,
}

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn dialog_width(dialog: &OptionsDialog) -> u16 {
    let longest = dialog
        .theme_options()
        .iter()
        .map(|o| o.label.width())
        .chain(dialog.placement_options().iter().map(|o| o.label.width()))
        .max()
        .unwrap_or(0);
    (longest as u16).saturating_add(DROPDOWN_PREFIX_WIDTH).max(DIALOG_MIN_WIDTH)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Drawing
// ═══════════════════════════════════════════════════════════════════════════════

/// Draw the options dialog, drawn in the colors of the theme currently
/// selected in it
pub fn draw_options_dialog(frame: &mut Frame, dialog: &OptionsDialog, area: Rect) {
    let colors = dialog.preview_colors();
    let rect = centered_rect(dialog_width(dialog), DIALOG_HEIGHT, area);
    frame.render_widget(Clear, rect);

    let block = Block::default()
        .title(" Swish Options ")
        .title_style(colors.normal_style().add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(colors.border_style())
        .style(colors.normal_style());

    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let theme_label = &dialog.theme_options()[dialog.theme_index()].label;
    let placement_label = &dialog.placement_options()[dialog.placement_index()].label;

    let lines = vec![
        checkbox_line(dialog, Field::HotkeyEnabled, "Activate with hotkey", dialog.hotkey_enabled(), colors),
        hotkey_line(dialog, colors),
        checkbox_line(dialog, Field::AltTabHook, "Activate with Alt+Tab", dialog.alt_tab_hook(), colors),
        checkbox_line(dialog, Field::AutoSwitch, "  Switch when Alt is released", dialog.auto_switch(), colors),
        checkbox_line(dialog, Field::RunAsAdmin, "Run as administrator", dialog.run_as_admin(), colors),
        Line::from(""),
        dropdown_line(dialog, Field::Theme, "Theme:     ", theme_label, colors),
        dropdown_line(dialog, Field::Placement, "Placement: ", placement_label, colors),
        Line::from(""),
        buttons_line(dialog, colors),
        Line::from(""),
        help_line(dialog, colors),
    ];
    frame.render_widget(Paragraph::new(lines), inner);

    if let Some(message) = dialog.warning() {
        draw_warning_popup(frame, message, area, colors);
    }
}

fn prompt(dialog: &OptionsDialog, field: Field) -> &'static str {
    if dialog.focus() == field {
        "> "
    } else {
        "  "
    }
}

fn field_style(dialog: &OptionsDialog, field: Field, colors: &ThemeColorSet) -> Style {
    if !dialog.is_field_enabled(field) {
        colors.disabled_style()
    } else if dialog.focus() == field {
        colors.selected_style()
    } else {
        colors.normal_style()
    }
}

fn checkbox_line<'a>(
    dialog: &OptionsDialog,
    field: Field,
    label: &'a str,
    checked: bool,
    colors: &ThemeColorSet,
) -> Line<'a> {
    let mark = if checked { "[x] " } else { "[ ] " };
    let style = field_style(dialog, field, colors);
    Line::from(vec![
        Span::styled(prompt(dialog, field), colors.normal_style()),
        Span::styled(mark, style),
        Span::styled(label, style),
    ])
}

fn hotkey_line(dialog: &OptionsDialog, colors: &ThemeColorSet) -> Line<'static> {
    let focused = dialog.focus() == Field::Hotkey;
    let value_style = if dialog.is_field_enabled(Field::Hotkey) {
        colors.input_style(focused)
    } else {
        colors.disabled_style()
    };

    let mut spans = vec![
        Span::styled(prompt(dialog, Field::Hotkey), colors.normal_style()),
        Span::styled("    Hotkey: ", colors.normal_style()),
        Span::styled("[", colors.input_border_style()),
        Span::styled(format!(" {} ", dialog.hotkey_preview()), value_style),
        Span::styled("]", colors.input_border_style()),
    ];
    if !dialog.chord().has_modifiers() {
        spans.push(Span::styled(" no modifier", colors.warning_style()));
    }
    if focused && !dialog.live_hotkey_enabled() {
        spans.push(Span::styled(" (paused)", colors.disabled_style()));
    }
    Line::from(spans)
}

fn dropdown_line<'a>(
    dialog: &OptionsDialog,
    field: Field,
    label: &'a str,
    value: &str,
    colors: &ThemeColorSet,
) -> Line<'a> {
    Line::from(vec![
        Span::styled(prompt(dialog, field), colors.normal_style()),
        Span::styled(label, colors.normal_style()),
        Span::styled(format!("< {} >", value), field_style(dialog, field, colors)),
    ])
}

fn buttons_line(dialog: &OptionsDialog, colors: &ThemeColorSet) -> Line<'static> {
    Line::from(vec![
        Span::styled(" OK ", field_style(dialog, Field::Ok, colors)),
        Span::styled("    ", colors.normal_style()),
        Span::styled(" Cancel ", field_style(dialog, Field::Cancel, colors)),
    ])
    .alignment(Alignment::Center)
}

fn help_line(dialog: &OptionsDialog, colors: &ThemeColorSet) -> Line<'static> {
    let text = colors.normal_style();
    if dialog.focus() == Field::Hotkey {
        return Line::from(vec![
            Span::styled("Press a shortcut  ", text),
            Span::styled("Tab", colors.help_style(HelpLabel::Navigation)),
            Span::styled(" Next field", text),
        ]);
    }
    Line::from(vec![
        Span::styled("Tab", colors.help_style(HelpLabel::Navigation)),
        Span::styled(" Next  ", text),
        Span::styled("Space", colors.help_style(HelpLabel::Search)),
        Span::styled(" Toggle  ", text),
        Span::styled("←→", colors.help_style(HelpLabel::Navigation)),
        Span::styled(" Change  ", text),
        Span::styled("Enter", colors.help_style(HelpLabel::FocusWindow)),
        Span::styled(" Save  ", text),
        Span::styled("Esc", colors.help_style(HelpLabel::CloseWindow)),
        Span::styled(" Cancel", text),
    ])
}

/// Modal warning with an OK button, wrapped to fit
fn draw_warning_popup(frame: &mut Frame, message: &str, area: Rect, colors: &ThemeColorSet) {
    let width = WARNING_WIDTH.min(area.width);
    let text_width = usize::from(width.saturating_sub(4)).max(10);
    let wrapped = textwrap::wrap(message, textwrap::Options::new(text_width));
    let height = wrapped.len() as u16 + 5;

    let rect = centered_rect(width, height, area);
    frame.render_widget(Clear, rect);

    let block = Block::default()
        .title(format!(" {} ", HOTKEY_IN_USE_TITLE))
        .title_style(colors.warning_style())
        .borders(Borders::ALL)
        .border_style(colors.warning_style())
        .style(colors.normal_style());
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let mut lines = vec![Line::from("")];
    lines.extend(wrapped.into_iter().map(|l| Line::styled(l.into_owned(), colors.normal_style())));
    lines.push(Line::from(""));
    lines.push(
        Line::from(vec![
            Span::styled(" OK ", colors.selected_style()),
            Span::styled("  ", colors.normal_style()),
            Span::styled("Enter", colors.help_style(HelpLabel::Dismiss)),
        ])
        .alignment(Alignment::Center),
    );

    let text_area = Rect::new(inner.x + 1, inner.y, inner.width.saturating_sub(2), inner.height);
    frame.render_widget(Paragraph::new(lines), text_area);
}

// ═══════════════════════════════════════════════════════════════════════════════
// Input
// ═══════════════════════════════════════════════════════════════════════════════

/// Handle one key event for the options dialog
pub fn handle_options_input(dialog: &mut OptionsDialog, key: KeyEvent) -> Result<DialogExit, OptionsError> {
    if key.kind == KeyEventKind::Release {
        return Ok(DialogExit::Open);
    }

    if dialog.warning().is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            dialog.dismiss_warning();
        }
        return Ok(DialogExit::Open);
    }

    // Every key in the capture field is a shortcut candidate
    if dialog.focus() == Field::Hotkey {
        dialog.handle_hotkey_key(&key);
        return Ok(DialogExit::Open);
    }

    match key.code {
        KeyCode::Esc => return Ok(cancel(dialog)),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Ok(cancel(dialog)),
        KeyCode::Tab | KeyCode::Down => dialog.focus_next(),
        KeyCode::BackTab | KeyCode::Up => dialog.focus_prev(),
        KeyCode::Left => {
            dialog.cycle_focused(false);
        }
        KeyCode::Right => {
            dialog.cycle_focused(true);
        }
        KeyCode::Char(' ') => match dialog.focus() {
            Field::Ok => return confirm(dialog),
            Field::Cancel => return Ok(cancel(dialog)),
            _ => {
                if !dialog.toggle_focused() {
                    dialog.cycle_focused(true);
                }
            }
        },
        KeyCode::Enter => {
            if dialog.focus() == Field::Cancel {
                return Ok(cancel(dialog));
            }
            return confirm(dialog);
        }
        _ => {}
    }
    Ok(DialogExit::Open)
}

fn confirm(dialog: &mut OptionsDialog) -> Result<DialogExit, OptionsError> {
    match dialog.confirm()? {
        ConfirmOutcome::Saved(settings) => Ok(DialogExit::Saved(settings)),
        ConfirmOutcome::HotkeyInUse => Ok(DialogExit::Open),
    }
}

fn cancel(dialog: &mut OptionsDialog) -> DialogExit {
    dialog.cancel();
    DialogExit::Cancelled
}
