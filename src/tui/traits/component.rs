//! Core component trait - the foundation of the UI system
//!
//! Every UI element that can be rendered implements `Component`.
//! This trait provides identity and rendering capability.

use crate::theme::Theme;
use ratatui::{layout::Rect, Frame};

/// Unique identifier for a component
///
/// Used for focus tracking, panel border colors and status bar hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    /// Create form
    CreatePost,
    /// Post list
    AllPosts,
    /// One post inside the list (non-focusable on its own)
    PostDetail,
    /// Edit form embedded in a post
    EditPost,
    /// System logs panel
    Logs,
}

impl ComponentId {
    /// Cycle to next focusable component (Tab behavior)
    pub fn next_focus(self) -> Self {
        match self {
            Self::CreatePost => Self::AllPosts,
            Self::AllPosts => Self::CreatePost,
            Self::PostDetail | Self::EditPost => Self::CreatePost,
            other => other, // Non-focusable stays put
        }
    }

    /// Cycle to previous focusable component (Shift+Tab behavior)
    ///
    /// With two focus targets this is the same cycle; kept separate so the
    /// key handler reads symmetrically.
    pub fn prev_focus(self) -> Self {
        match self {
            Self::CreatePost => Self::AllPosts,
            Self::AllPosts => Self::CreatePost,
            Self::PostDetail | Self::EditPost => Self::AllPosts,
            other => other,
        }
    }
}

/// Immutable context passed to components during rendering
///
/// Components only see what they need - no access to mutable app state.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    /// Color theme for styling
    pub theme: &'a Theme,

    /// Which component currently has focus
    pub focus: ComponentId,

    /// Animation frame counter (for spinners, blinking cursors)
    pub animation_frame: usize,
}

impl<'a> RenderContext<'a> {
    pub fn new(theme: &'a Theme, focus: ComponentId, animation_frame: usize) -> Self {
        Self {
            theme,
            focus,
            animation_frame,
        }
    }

    /// Check if a component is currently focused
    pub fn is_focused(&self, id: ComponentId) -> bool {
        self.focus == id
    }

    /// Same context with focus moved (used when a parent hands focus to a child)
    pub fn with_focus(&self, focus: ComponentId) -> Self {
        Self {
            focus,
            ..self.clone()
        }
    }

    /// Get spinner character for current animation frame
    pub fn spinner_char(&self) -> char {
        const SPINNER: [char; 4] = ['◐', '◓', '◑', '◒'];
        SPINNER[self.animation_frame % SPINNER.len()]
    }
}

/// Base trait for all UI components
///
/// A component is anything that can render itself to the terminal.
/// Rendering never mutates state; everything a frame shows was decided in
/// `update`/`handle_key`.
pub trait Component {
    /// Unique identifier for this component
    fn id(&self) -> ComponentId;

    /// Render the component to the given area
    fn render(&self, f: &mut Frame, area: Rect, ctx: &RenderContext);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_cycles_between_form_and_list() {
        assert_eq!(ComponentId::CreatePost.next_focus(), ComponentId::AllPosts);
        assert_eq!(ComponentId::AllPosts.next_focus(), ComponentId::CreatePost);
        assert_eq!(ComponentId::Logs.next_focus(), ComponentId::Logs);
    }

    #[test]
    fn test_spinner_wraps() {
        let theme = Theme::default();
        let ctx = RenderContext::new(&theme, ComponentId::AllPosts, 5);
        assert_eq!(ctx.spinner_char(), '◓');
    }
}
