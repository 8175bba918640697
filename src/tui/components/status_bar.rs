// Status bar component
//
// Renders the connection state, endpoint, pending calls and the key hints
// for the focused panel.

use crate::tui::app::{App, Connection};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the status bar
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let (marker, marker_style) = match &app.connection {
        Connection::Connecting => (
            format!("{} connecting", app.spinner_char()),
            Style::default().fg(theme.muted),
        ),
        Connection::Connected => ("● connected".to_string(), Style::default().fg(theme.success)),
        Connection::Failed(_) => ("✗ disconnected".to_string(), theme.error_style()),
    };

    let hint = app
        .focus_hint()
        .unwrap_or("Tab:focus  ?:help  q:quit");

    let mut spans = vec![
        Span::raw(" "),
        Span::styled(marker, marker_style),
        Span::styled(
            format!(" │ {}", app.endpoint.describe()),
            Style::default().fg(theme.status_bar),
        ),
    ];
    let pending = app.in_flight();
    if pending > 0 {
        spans.push(Span::styled(
            format!(" │ {} in flight", pending),
            Style::default().fg(theme.highlight),
        ));
    }
    spans.push(Span::styled(format!(" │ {}", hint), Style::default().fg(theme.muted)));
    let line = Line::from(spans);

    let status = Paragraph::new(line).block(Block::default().borders(Borders::TOP));
    f.render_widget(status, area);
}
