// Title bar component
//
// Renders the app title with a busy indicator while calls are in flight.

use crate::tui::app::App;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the title bar at the top of the screen
///
/// Shows the app name, a spinner plus call count when anything is pending,
/// and the help hint on the right.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let pending = app.in_flight();
    let busy = match pending {
        0 => String::new(),
        1 => format!(" {} 1 call", app.spinner_char()),
        n => format!(" {} {} calls", app.spinner_char(), n),
    };

    let title = Paragraph::new(format!(" Forum{}", busy))
        .style(
            Style::default()
                .fg(app.theme.title)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.title))
                .title_top(Line::from(" ? ").right_aligned()),
        );

    f.render_widget(title, area);
}
