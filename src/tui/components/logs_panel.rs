//! Logs panel component
//!
//! Shows the most recent entries of the in-memory log buffer, newest at the
//! bottom. Toggled with `L`; never takes focus.

use crate::logging::{LogBuffer, LogEntry, LogLevel};
use crate::theme::Theme;
use crate::tui::traits::{Component, ComponentId, Copyable, RenderContext};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

pub struct LogsPanel {
    buffer: LogBuffer,
}

impl LogsPanel {
    pub fn new(buffer: LogBuffer) -> Self {
        Self { buffer }
    }

    fn level_style(theme: &Theme, level: LogLevel) -> Style {
        match level {
            LogLevel::Error => theme.error_style().add_modifier(Modifier::BOLD),
            LogLevel::Warn => Style::default().fg(theme.highlight),
            LogLevel::Info => Style::default().fg(theme.foreground),
            LogLevel::Debug | LogLevel::Trace => Style::default().fg(theme.muted),
        }
    }

    fn format_entry(entry: &LogEntry) -> String {
        format!(
            "{} {:5} {}",
            entry.timestamp.format("%H:%M:%S"),
            entry.level.as_str(),
            entry.message
        )
    }
}

impl Component for LogsPanel {
    fn id(&self) -> ComponentId {
        ComponentId::Logs
    }

    fn render(&self, f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let theme = ctx.theme;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.panel_border(self.id(), false)))
            .title(format!(" Logs ({}) ", self.buffer.len()));
        let visible = block.inner(area).height as usize;

        let items: Vec<ListItem> = self
            .buffer
            .tail(visible)
            .iter()
            .map(|entry| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{} ", entry.timestamp.format("%H:%M:%S")),
                        Style::default().fg(theme.muted),
                    ),
                    Span::styled(
                        format!("{:5} ", entry.level.as_str()),
                        Self::level_style(theme, entry.level),
                    ),
                    Span::raw(entry.message.clone()),
                ]))
            })
            .collect();

        f.render_widget(List::new(items).block(block), area);
    }
}

impl Copyable for LogsPanel {
    fn copy_text(&self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        Some(
            self.buffer
                .get_all()
                .iter()
                .map(Self::format_entry)
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }

    fn copy_description(&self) -> String {
        "logs".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::testing::render_text;
    use chrono::Utc;

    fn push(buffer: &LogBuffer, level: LogLevel, message: &str) {
        buffer.add(LogEntry {
            timestamp: Utc::now(),
            level,
            target: "forum".to_string(),
            message: message.to_string(),
        });
    }

    #[test]
    fn test_shows_most_recent_entries() {
        let buffer = LogBuffer::new();
        for i in 0..10 {
            push(&buffer, LogLevel::Info, &format!("entry {}", i));
        }
        let panel = LogsPanel::new(buffer);
        let theme = Theme::default();
        let ctx = RenderContext::new(&theme, ComponentId::AllPosts, 0);
        // 3 inner rows
        let text = render_text(50, 5, |f| panel.render(f, f.area(), &ctx));
        assert!(text.contains("entry 9"));
        assert!(text.contains("entry 7"));
        assert!(!text.contains("entry 6"));
        assert!(text.contains("Logs (10)"));
    }

    #[test]
    fn test_copy_joins_all_entries() {
        let buffer = LogBuffer::new();
        let panel = LogsPanel::new(buffer.clone());
        assert_eq!(panel.copy_text(), None);

        push(&buffer, LogLevel::Warn, "first");
        push(&buffer, LogLevel::Error, "second");
        let text = panel.copy_text().unwrap_or_default();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("WARN  first"));
        assert!(lines[1].ends_with("ERROR second"));
    }
}
