// Views module - screen-level rendering logic
//
// One screen: title bar, content (create form + post list, or the connection
// state before they exist), optional logs panel, status bar. Modal and toast
// are drawn on top.

mod modal;

use super::app::{App, Connection};
use super::layout;
use super::traits::Component;
use crate::tui::components;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

/// Rows taken by the logs panel when shown
const LOGS_HEIGHT: u16 = 10;

/// Main UI render function - called on every frame
pub fn draw(f: &mut Frame, app: &mut App) {
    let bg_block = Block::default().style(Style::default().bg(app.theme.background));
    f.render_widget(bg_block, f.area());

    let logs_height = if app.show_logs { LOGS_HEIGHT } else { 0 };
    let [title, content, logs, status] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(5),
        Constraint::Length(logs_height),
        Constraint::Length(2),
    ])
    .areas(f.area());

    components::render_title(f, title, app);
    render_content(f, content, app);
    if app.show_logs {
        app.logs.render(f, logs, &app.render_context());
    }
    components::render_status(f, status, app);

    if let Some(modal_state) = &app.modal {
        modal::render(f, modal_state, app);
    }

    if let Some(toast) = &app.toast {
        toast.render(f, f.area(), &app.theme);
    }

    app.clear_expired_toast();
}

fn render_content(f: &mut Frame, area: Rect, app: &App) {
    let ctx = app.render_context();
    match (&app.connection, &app.create, &app.list) {
        (Connection::Connected, Some(create), Some(list)) => {
            let (create_area, list_area) = layout::split_content(area, create.height());
            create.render(f, create_area, &ctx);
            list.render(f, list_area, &ctx);
        }
        (Connection::Failed(message), _, _) => {
            let text = vec![
                Line::styled(
                    format!("Could not connect to {}", app.endpoint.describe()),
                    app.theme.error_style(),
                ),
                Line::styled(message.clone(), app.theme.error_style()),
                Line::raw(""),
                Line::styled("Press r to retry", app.theme.muted_style()),
            ];
            render_centered(f, area, app, text);
        }
        _ => {
            let text = vec![Line::styled(
                format!("{} Connecting to {}…", app.spinner_char(), app.endpoint.describe()),
                app.theme.muted_style(),
            )];
            render_centered(f, area, app, text);
        }
    }
}

fn render_centered(f: &mut Frame, area: Rect, app: &App, text: Vec<Line<'static>>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let height = text.len() as u16;
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .areas(inner);
    f.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        middle,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{CallError, Endpoint, MemoryConductor};
    use crate::config::Config;
    use crate::logging::LogBuffer;
    use crate::posts::Post;
    use crate::tui::events::Message;
    use crate::tui::testing::render_text;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn app() -> (App, mpsc::UnboundedReceiver<Message>, MemoryConductor) {
        let conductor = MemoryConductor::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App::new(
            Config::default(),
            Endpoint::InMemory(conductor.clone()),
            LogBuffer::new(),
            tx,
        );
        (app, rx, conductor)
    }

    #[tokio::test]
    async fn test_connecting_screen() {
        let (mut app, _rx, _) = app();
        let text = render_text(80, 24, |f| draw(f, &mut app));
        assert!(text.contains("Connecting to in-memory (demo)"));
        assert!(text.contains("Forum"));
    }

    #[tokio::test]
    async fn test_failed_screen_offers_retry() {
        let (mut app, _rx, _) = app();
        app.update(Message::Connected(Err(CallError::Transport(
            "connection refused".to_string(),
        ))));
        let text = render_text(80, 24, |f| draw(f, &mut app));
        assert!(text.contains("connection refused"));
        assert!(text.contains("Press r to retry"));
        assert!(text.contains("disconnected"));
    }

    #[tokio::test]
    async fn test_connected_screen_shows_form_and_posts() {
        let (mut app, mut rx, conductor) = app();
        conductor.seed(&[Post::new("Welcome", "first post")]);
        app.connect();
        while let Ok(Some(msg)) = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await
        {
            app.update(msg);
        }

        let text = render_text(120, 40, |f| draw(f, &mut app));
        assert!(text.contains("Create Post"));
        assert!(text.contains("Welcome"));
        assert!(text.contains("connected"));
    }

    #[tokio::test]
    async fn test_help_modal_drawn_on_top() {
        let (mut app, _rx, _) = app();
        app.modal = Some(crate::tui::modal::Modal::help());
        let text = render_text(80, 40, |f| draw(f, &mut app));
        assert!(text.contains(" Help "));
        assert!(text.contains("Toggle this help"));
    }
}
