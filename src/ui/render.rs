//! Render functions for the TUI.
//!
//! Composes the listing tree from the current props on every draw and hands
//! it to the grid widget, with the status bar below.

use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    widgets::Paragraph,
    Frame,
};

use super::{grid, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = grid::MIN_ITEM_WIDTH;
pub(super) const MIN_HEIGHT: u16 = 10;

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    // Nothing meaningful fits in a zero-sized frame
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    app.grid_columns = grid::columns_for(chunks[0].width);

    let offset = {
        let props = app.listing_props();
        let tree = app.listing.compose(&props);
        grid::render(
            f,
            chunks[0],
            &tree,
            &app.health,
            &app.theme,
            app.selected,
            app.scroll_offset,
            app.spinner_frame,
        )
    };
    app.scroll_offset = offset;

    status::render(f, app, chunks[1]);
}
