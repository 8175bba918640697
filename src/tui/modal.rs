// Modal system for TUI overlays
//
// Self-contained modal dialogs that handle their own input and return actions.
// App just holds Option<Modal>, input routing acts on returned ModalAction.

use crate::posts::Record;
use crossterm::event::KeyCode;

/// Actions returned by modal input handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalAction {
    /// Input consumed, no state change needed
    None,
    /// Close the modal
    Close,
    /// Copy the modal content
    Copy,
}

/// Available modal types
#[derive(Debug, Clone)]
pub enum Modal {
    /// Help overlay - shows keyboard shortcuts
    Help,
    /// Full record of one post, pretty-printed JSON
    Record {
        title: String,
        content: String,
        scroll: u16,
    },
}

impl Modal {
    /// Create a help modal
    pub fn help() -> Self {
        Modal::Help
    }

    /// Create a record modal for the given record
    pub fn record(record: &Record) -> Self {
        let content = match serde_json::to_string_pretty(record) {
            Ok(json) => json,
            Err(e) => format!("Failed to render record: {}", e),
        };
        Modal::Record {
            title: format!(" Record {} ", record.action_hash().short()),
            content,
            scroll: 0,
        }
    }

    /// Text a copy action puts on the clipboard
    pub fn content(&self) -> Option<&str> {
        match self {
            Modal::Help => None,
            Modal::Record { content, .. } => Some(content),
        }
    }

    /// Handle keyboard input, return action for caller to execute
    pub fn handle_input(&mut self, key: KeyCode) -> ModalAction {
        match self {
            Modal::Help => match key {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => ModalAction::Close,
                _ => ModalAction::None,
            },
            Modal::Record {
                content, scroll, ..
            } => {
                let max = content.lines().count().saturating_sub(1) as u16;
                match key {
                    KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => ModalAction::Close,
                    KeyCode::Up | KeyCode::Char('k') => {
                        *scroll = scroll.saturating_sub(1);
                        ModalAction::None
                    }
                    KeyCode::Down | KeyCode::Char('j') => {
                        *scroll = (*scroll + 1).min(max);
                        ModalAction::None
                    }
                    KeyCode::PageUp => {
                        *scroll = scroll.saturating_sub(10);
                        ModalAction::None
                    }
                    KeyCode::PageDown => {
                        *scroll = (*scroll + 10).min(max);
                        ModalAction::None
                    }
                    KeyCode::Home => {
                        *scroll = 0;
                        ModalAction::None
                    }
                    KeyCode::End => {
                        *scroll = max;
                        ModalAction::None
                    }
                    KeyCode::Char('y') => ModalAction::Copy,
                    _ => ModalAction::None,
                }
            }
        }
    }
}
