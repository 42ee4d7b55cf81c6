//! Keyboard input handling.

use crate::app::{App, AppEvent};
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::loop_runner::Action;

/// Handle a key press.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Action::Quit;
    }

    let columns = app.grid_columns.max(1) as isize;
    match code {
        KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
        KeyCode::Left | KeyCode::Char('h') => app.move_selection(-1),
        KeyCode::Right | KeyCode::Char('l') => app.move_selection(1),
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-columns),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(columns),
        KeyCode::PageUp => app.move_selection(-columns * 4),
        KeyCode::PageDown => app.move_selection(columns * 4),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::Char('H') => app.toggle_health(event_tx),
        KeyCode::Char('c') => app.toggle_compare_offchain(),
        KeyCode::Char('t') => app.cycle_theme(),
        KeyCode::Char('r') => {
            if app.catalog.is_loading() {
                app.set_status("Already loading feeds");
            } else {
                tracing::info!("Reloading feed list");
                app.remount_listing();
            }
        }
        _ => {}
    }
    Action::Continue
}
