// Text field component
//
// A bordered single- or multi-line input. The value is `None` until the
// first keystroke: forms distinguish "never touched" from "emptied".

use crate::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

#[derive(Debug, Clone)]
pub struct TextField {
    label: &'static str,
    value: Option<String>,
    /// Cursor position in chars
    cursor: usize,
    multiline: bool,
}

impl TextField {
    pub fn new(label: &'static str, multiline: bool) -> Self {
        Self {
            label,
            value: None,
            cursor: 0,
            multiline,
        }
    }

    /// Field pre-filled with a value, cursor at the end
    pub fn with_value(label: &'static str, multiline: bool, value: Option<String>) -> Self {
        let cursor = value.as_deref().map_or(0, |v| v.chars().count());
        Self {
            label,
            value,
            cursor,
            multiline,
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Back to the untouched state
    pub fn clear(&mut self) {
        self.value = None;
        self.cursor = 0;
    }

    fn byte_index(text: &str, char_idx: usize) -> usize {
        text.char_indices()
            .nth(char_idx)
            .map_or(text.len(), |(i, _)| i)
    }

    fn insert(&mut self, c: char) {
        let text = self.value.get_or_insert_with(String::new);
        let at = Self::byte_index(text, self.cursor);
        text.insert(at, c);
        self.cursor += 1;
    }

    /// Apply an editing key; returns false for keys the field does not use
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return false;
        }

        let len = self.value.as_deref().map_or(0, |v| v.chars().count());
        match key.code {
            KeyCode::Char(c) => self.insert(c),
            KeyCode::Enter if self.multiline => self.insert('\n'),
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    if let Some(text) = self.value.as_mut() {
                        let at = Self::byte_index(text, self.cursor - 1);
                        text.remove(at);
                        self.cursor -= 1;
                    }
                } else {
                    // Touching the field still defines it
                    self.value.get_or_insert_with(String::new);
                }
            }
            KeyCode::Delete => {
                if let Some(text) = self.value.as_mut() {
                    if self.cursor < len {
                        let at = Self::byte_index(text, self.cursor);
                        text.remove(at);
                    }
                }
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(len),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = len,
            _ => return false,
        }
        true
    }

    /// Text lines with the cursor drawn as a reversed cell
    fn lines(&self, theme: &Theme, focused: bool) -> Vec<Line<'static>> {
        let text = self.value.as_deref().unwrap_or("");
        let cursor_style = Style::default().add_modifier(Modifier::REVERSED);
        let mut lines = Vec::new();
        let mut spans: Vec<Span<'static>> = Vec::new();
        let mut run = String::new();

        for (i, c) in text.chars().enumerate() {
            let at_cursor = focused && i == self.cursor;
            if at_cursor {
                spans.push(Span::raw(std::mem::take(&mut run)));
            }
            if c == '\n' {
                if at_cursor {
                    spans.push(Span::styled(" ", cursor_style));
                }
                spans.push(Span::raw(std::mem::take(&mut run)));
                lines.push(Line::from(std::mem::take(&mut spans)));
                continue;
            }
            if at_cursor {
                spans.push(Span::styled(c.to_string(), cursor_style));
            } else {
                run.push(c);
            }
        }
        spans.push(Span::raw(run));
        if focused && self.cursor >= text.chars().count() {
            spans.push(Span::styled(" ", cursor_style));
        }
        lines.push(Line::from(spans));

        if self.value.is_none() && !focused {
            return vec![Line::styled(
                format!("{}…", self.label),
                theme.muted_style(),
            )];
        }
        lines
    }

    /// Rows needed to show the field including borders
    pub fn height(&self) -> u16 {
        if self.multiline {
            let rows = self.value.as_deref().map_or(1, |v| v.lines().count().max(1));
            (rows as u16).clamp(3, 8) + 2
        } else {
            3
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme, focused: bool) {
        let border = if focused { theme.highlight } else { theme.border };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(format!(" {} ", self.label));

        let paragraph = Paragraph::new(self.lines(theme, focused))
            .style(Style::default().fg(theme.foreground))
            .wrap(Wrap { trim: false })
            .block(block);
        f.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(field: &mut TextField, s: &str) {
        for c in s.chars() {
            field.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_untouched_field_is_undefined() {
        let field = TextField::new("Title", false);
        assert_eq!(field.value(), None);
    }

    #[test]
    fn test_typing_and_editing() {
        let mut field = TextField::new("Title", false);
        type_str(&mut field, "héllo");
        assert_eq!(field.value(), Some("héllo"));

        field.handle_key(key(KeyCode::Left));
        field.handle_key(key(KeyCode::Backspace));
        assert_eq!(field.value(), Some("hélo"));

        field.handle_key(key(KeyCode::Home));
        field.handle_key(key(KeyCode::Delete));
        assert_eq!(field.value(), Some("élo"));
    }

    #[test]
    fn test_erasing_everything_leaves_empty_not_undefined() {
        let mut field = TextField::new("Title", false);
        type_str(&mut field, "a");
        field.handle_key(key(KeyCode::Backspace));
        assert_eq!(field.value(), Some(""));
    }

    #[test]
    fn test_enter_only_in_multiline() {
        let mut single = TextField::new("Title", false);
        assert!(!single.handle_key(key(KeyCode::Enter)));

        let mut multi = TextField::new("Content", true);
        type_str(&mut multi, "a");
        assert!(multi.handle_key(key(KeyCode::Enter)));
        type_str(&mut multi, "b");
        assert_eq!(multi.value(), Some("a\nb"));
    }

    #[test]
    fn test_control_chords_are_not_text() {
        let mut field = TextField::new("Title", false);
        let handled = field.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert!(!handled);
        assert_eq!(field.value(), None);
    }

    #[test]
    fn test_with_value_puts_cursor_at_end() {
        let mut field = TextField::with_value("Title", false, Some("ab".to_string()));
        type_str(&mut field, "c");
        assert_eq!(field.value(), Some("abc"));
    }
}
