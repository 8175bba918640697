//! Copyable trait for components that provide clipboard content

use super::Component;

/// Trait for components that can provide content for the clipboard
///
/// When the user presses `y`, the focused component's `Copyable`
/// implementation determines what gets copied.
pub trait Copyable: Component {
    /// Text for the clipboard, `None` if there is nothing to copy
    fn copy_text(&self) -> Option<String>;

    /// What will be copied (for toast messages)
    fn copy_description(&self) -> String {
        format!("{:?}", self.id())
    }
}

/// Result of a copy operation
#[derive(Debug, Clone, PartialEq)]
pub enum CopyResult {
    /// Successfully copied content
    Success {
        /// What was copied (for toast message)
        description: String,
        /// Number of characters copied
        length: usize,
    },
    /// Nothing to copy (empty selection, no content)
    Empty,
    /// Clipboard access failed
    Error(String),
}

impl CopyResult {
    /// Get a toast message for this result
    pub fn toast_message(&self) -> String {
        match self {
            Self::Success { description, .. } => format!("✓ Copied {}", description),
            Self::Empty => "Nothing to copy".to_string(),
            Self::Error(msg) => format!("✗ {}", msg),
        }
    }
}

/// Copy a component's content to the system clipboard
pub fn copy_from(component: &dyn Copyable) -> CopyResult {
    let Some(text) = component.copy_text() else {
        return CopyResult::Empty;
    };
    let length = text.chars().count();
    match crate::tui::clipboard::set_text(&text) {
        Ok(()) => CopyResult::Success {
            description: component.copy_description(),
            length,
        },
        Err(e) => {
            tracing::warn!("copy failed: {:#}", e);
            CopyResult::Error(e.to_string())
        }
    }
}
