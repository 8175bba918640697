/// Responsive layout for the forum screen.
///
/// Single source of truth for width thresholds - no magic numbers scattered in render code.
use ratatui::layout::{Constraint, Layout, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breakpoint {
    /// < 100 cols: create form stacked above the list
    Stacked,
    /// 100+ cols: create form beside the list
    SideBySide,
}

impl Breakpoint {
    pub fn from_width(width: u16) -> Self {
        match width {
            0..=99 => Breakpoint::Stacked,
            _ => Breakpoint::SideBySide,
        }
    }
}

/// Split the content area into (create form, post list)
///
/// `create_height` is what the form needs when stacked; beside the list it
/// keeps that height and leaves the rest of its column empty.
pub fn split_content(area: Rect, create_height: u16) -> (Rect, Rect) {
    match Breakpoint::from_width(area.width) {
        Breakpoint::Stacked => {
            let [create, list] =
                Layout::vertical([Constraint::Length(create_height), Constraint::Min(3)])
                    .areas(area);
            (create, list)
        }
        Breakpoint::SideBySide => {
            let [left, list] =
                Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
                    .areas(area);
            let [create, _] =
                Layout::vertical([Constraint::Length(create_height), Constraint::Min(0)])
                    .areas(left);
            (create, list)
        }
    }
}
