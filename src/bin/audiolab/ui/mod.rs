//! TUI module for audiolab
//!
//! Transport bar on top, the current clip's piano roll beside the instrument
//! panel, and a help bar at the bottom.

mod panel;
mod roll;
mod transport;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

use panel::render_panel;
use roll::render_roll;
use transport::render_transport;

/// Screen regions the mouse handler needs from the last frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct Areas {
    /// Key names left of the grid; clicking one previews that row.
    pub strip: Rect,
    pub grid: Rect,
}

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) -> Areas {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Transport bar
            Constraint::Min(8),    // Piano roll + instrument
            Constraint::Length(1), // Help bar
        ])
        .split(area);

    render_transport(frame, chunks[0], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(34)])
        .split(chunks[1]);

    let areas = render_roll(frame, body[0], &app.studio);
    render_panel(frame, body[1], &app.studio, app.selected_parameter);

    let help = Paragraph::new(
        " [zsxdc..] Play  [Space] Clip  [Enter] Song  [Tab] Next  [a/r] Add/Del  [i] Preset  \
         [↑↓←→] Edit  [f/u] Filter  [k] Clear  [[ ]] Oct  [-=] Vol  [p] Panic  [Q] Quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[2]);

    areas
}
