//! Interactive trait for components that handle keyboard input
//!
//! Components that can receive and process keyboard events implement
//! this trait. The App routes input to the focused component.

use super::Component;
use crate::tui::events::ForumEvent;
use crossterm::event::KeyEvent;

/// Result of handling a key event
///
/// Tells the parent whether the component consumed the event, if it should
/// bubble up for global handling, or if it produced an event for ancestors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handled {
    /// Event was consumed by the component
    Yes,
    /// Event was not handled, should bubble up
    No,
    /// Event was consumed and the component signals its ancestors
    Emit(ForumEvent),
}

impl Handled {
    /// Create from a boolean (true = handled)
    pub fn from_bool(handled: bool) -> Self {
        if handled {
            Self::Yes
        } else {
            Self::No
        }
    }
}

impl From<bool> for Handled {
    fn from(handled: bool) -> Self {
        Self::from_bool(handled)
    }
}

/// Trait for components that handle keyboard input
///
/// # Event Flow
///
/// ```text
/// KeyEvent
///    │
///    ▼
/// App (modal open? Ctrl+C?)
///    │
///    ▼
/// Focused Component (via Interactive trait)
///    │
///    │ returns Handled::Yes / No / Emit(event)
///    ▼
/// App (global handlers: Tab, ?, L, q)
/// ```
///
/// Components go first so text fields can capture plain characters.
pub trait Interactive: Component {
    /// Handle a key event
    fn handle_key(&mut self, key: KeyEvent) -> Handled;

    /// Whether the component is currently capturing text input
    ///
    /// While true the App does not treat plain characters as shortcuts.
    fn captures_text(&self) -> bool {
        false
    }

    /// Hint text for status bar when this component is focused
    fn focus_hint(&self) -> Option<&'static str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bool() {
        assert_eq!(Handled::from(true), Handled::Yes);
        assert_eq!(Handled::from(false), Handled::No);
    }
}
