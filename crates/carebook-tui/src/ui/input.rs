//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppState};
use crate::ui::fields::FieldKind;

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.state {
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Enter) {
                app.state = AppState::Editing;
            }
            Ok(false)
        }
        AppState::ConfirmingQuit => handle_quit_input(app, key),
        AppState::Submitted => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            Ok(false)
        }
        AppState::Quitting => Ok(true),
        AppState::Editing => {
            handle_form_input(app, key);
            Ok(false)
        }
    }
}

fn handle_quit_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Enter => {
            app.state = AppState::Quitting;
            return Ok(true);
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.state = AppState::Editing;
        }
        _ => {}
    }
    Ok(false)
}

fn handle_form_input(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => app.state = AppState::ConfirmingQuit,
        KeyCode::F(1) => app.state = AppState::ShowingHelp,
        KeyCode::F(2) => app.cycle_language(),

        KeyCode::Tab | KeyCode::Down => app.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.focus_prev(),
        KeyCode::Left => app.cycle_choice(false),
        KeyCode::Right => app.cycle_choice(true),

        KeyCode::Enter => app.next_step(),
        KeyCode::PageUp => app.prev_step(),
        KeyCode::PageDown => app.next_step(),

        KeyCode::Char('a') if ctrl => app.add_selection(),
        KeyCode::Char('d') if ctrl => app.remove_focused_selection(),

        KeyCode::Char(' ') if !focus_is_text(app) => app.toggle(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(c) if !ctrl => app.input_char(c),
        _ => {}
    }
}

fn focus_is_text(app: &App) -> bool {
    app.focused_field().is_some_and(|f| f.kind() == FieldKind::Text)
}
