// Modal overlay rendering
//
// Modals are rendered on top of the main content:
// - Help modal: keyboard shortcuts and current config
// - Record modal: full record JSON of one post

use crate::tui::app::App;
use crate::tui::modal::Modal;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Render a modal dialog as a centered overlay
pub fn render(f: &mut Frame, modal: &Modal, app: &App) {
    match modal {
        Modal::Help => render_help(f, app),
        Modal::Record {
            title,
            content,
            scroll,
        } => render_record(f, app, title, content, *scroll),
    }
}

/// Calculate centered rect for modal dialog
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Render the help modal overlay
fn render_help(f: &mut Frame, app: &App) {
    let key_style = Style::default().fg(app.theme.highlight);
    let desc_style = Style::default().fg(app.theme.foreground);
    let header_style = Style::default()
        .fg(app.theme.title)
        .add_modifier(Modifier::BOLD);
    let divider_style = Style::default().fg(app.theme.border);

    // "    key         description"
    let kb = |key: &str, desc: &str| -> Line {
        Line::from(vec![
            Span::raw("    "),
            Span::styled(format!("{:<12}", key), key_style),
            Span::styled(desc.to_string(), desc_style),
        ])
    };

    let content = Text::from(vec![
        Line::raw(""),
        Line::from(Span::styled("  Navigation", header_style)),
        kb("Tab", "Next field / panel"),
        kb("Shift+Tab", "Previous field / panel"),
        kb("↑/↓, j/k", "Select post"),
        kb("Home/End", "First / last post"),
        kb("Esc", "Leave form / cancel edit"),
        Line::raw(""),
        Line::from(Span::styled("  Posts", header_style)),
        kb("Ctrl+S", "Create / save"),
        kb("e", "Edit selected post"),
        kb("d", "Delete selected post"),
        kb("r", "Reload posts"),
        kb("Enter", "Show full record"),
        Line::raw(""),
        Line::from(Span::styled("  Clipboard", header_style)),
        kb("y", "Copy selected record"),
        kb("Y", "Copy logs"),
        Line::raw(""),
        Line::from(Span::styled("  General", header_style)),
        kb("L", "Toggle logs"),
        kb("?", "Toggle this help"),
        kb("q, Ctrl+C", "Quit"),
        Line::raw(""),
        Line::from(Span::styled(
            "  ──────────────────────────────────",
            divider_style,
        )),
        Line::from(vec![
            Span::styled("  Theme: ", desc_style),
            Span::styled(app.theme.name.clone(), key_style),
        ]),
    ]);

    let area = centered_rect(44, 30, f.area());
    f.render_widget(Clear, area);

    let paragraph = Paragraph::new(content)
        .style(Style::default().bg(app.theme.background))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.highlight))
                .title(" Help ")
                .title_bottom(Line::from(" Press ? or Esc to close ").centered()),
        );

    f.render_widget(paragraph, area);
}

/// Render the record modal (90% width, 85% height)
fn render_record(f: &mut Frame, app: &App, title: &str, content: &str, scroll: u16) {
    let screen = f.area();
    let area = centered_rect(screen.width * 9 / 10, screen.height * 85 / 100, screen);
    f.render_widget(Clear, area);

    let paragraph = Paragraph::new(content.to_string())
        .style(Style::default().fg(app.theme.foreground).bg(app.theme.background))
        .scroll((scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.highlight))
                .title(title.to_string())
                .title_bottom(Line::from(" ↑↓ scroll  y copy  Esc close ").centered()),
        );

    f.render_widget(paragraph, area);
}
