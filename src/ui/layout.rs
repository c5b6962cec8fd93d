//! Layout helpers — split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Menu pane sized to the viewport, with a status bar underneath.
pub struct AppLayout {
    pub menu_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// `menu_rows` is the number of content rows; borders are added here.
    pub fn from_area(area: Rect, menu_rows: u16) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(menu_rows.saturating_add(2)),
                Constraint::Min(0),
                Constraint::Length(1), // status bar
            ])
            .split(area);

        Self {
            menu_area: chunks[0],
            status_area: chunks[2],
        }
    }
}
