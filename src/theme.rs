// Color themes for the TUI
//
// "holo" is the forum's own dark palette (true color); "terminal" uses the
// terminal's ANSI palette for terminals without RGB support.

use ratatui::style::{Color, Modifier, Style};

use crate::tui::traits::ComponentId;

/// Color palette for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // Base colors
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub border: Color,

    // Accents
    pub title: Color,
    pub highlight: Color,
    pub selection: Color,
    pub selection_fg: Color,
    pub status_bar: Color,

    // Action colors
    pub error: Color,
    pub success: Color,
    pub danger: Color,
    pub primary: Color,

    // Panel identity colors (used when focused)
    pub panel_create: Color,
    pub panel_posts: Color,
    pub panel_logs: Color,
}

impl Theme {
    /// Load theme by name
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "terminal" | "auto" => Self::terminal(),
            _ => Self::holo(), // "holo" or unknown
        }
    }

    /// Holo theme - slate text on charcoal, muted red for destructive actions
    pub fn holo() -> Self {
        Self {
            name: "holo".to_string(),
            background: Color::Rgb(0x3d, 0x3d, 0x3d),
            foreground: Color::Rgb(0xb3, 0xbd, 0xd6), // slate
            muted: Color::Rgb(0x60, 0x65, 0x72),
            border: Color::Rgb(0x60, 0x65, 0x72),
            title: Color::Rgb(0xb3, 0xbd, 0xd6),
            highlight: Color::Rgb(0xb3, 0xbd, 0xd6),
            selection: Color::Rgb(0x1a, 0x2b, 0x42), // navy
            selection_fg: Color::Rgb(0xe0, 0xe6, 0xf2),
            status_bar: Color::Rgb(0x8c, 0xa0, 0xd0),
            error: Color::Rgb(0xd0, 0x5a, 0x5d),
            success: Color::Rgb(0x7f, 0xb0, 0x8a),
            danger: Color::Rgb(0x9d, 0x34, 0x37), // delete button
            primary: Color::Rgb(0x3a, 0x55, 0x99), // save button
            panel_create: Color::Rgb(0xb3, 0xbd, 0xd6),
            panel_posts: Color::Rgb(0x8c, 0xa0, 0xd0),
            panel_logs: Color::Rgb(0x60, 0x65, 0x72),
        }
    }

    /// Terminal theme - uses terminal's ANSI palette
    pub fn terminal() -> Self {
        Self {
            name: "terminal".to_string(),
            background: Color::Reset,
            foreground: Color::Reset,
            muted: Color::DarkGray,
            border: Color::White,
            title: Color::Cyan,
            highlight: Color::Yellow,
            selection: Color::Blue,
            selection_fg: Color::White,
            status_bar: Color::Green,
            error: Color::Red,
            success: Color::Green,
            danger: Color::Red,
            primary: Color::Blue,
            panel_create: Color::Cyan,
            panel_posts: Color::Yellow,
            panel_logs: Color::DarkGray,
        }
    }

    /// Border color for a panel based on focus state
    pub fn panel_border(&self, panel: ComponentId, focused: bool) -> Color {
        if !focused {
            return self.border;
        }
        match panel {
            ComponentId::CreatePost => self.panel_create,
            ComponentId::AllPosts | ComponentId::PostDetail | ComponentId::EditPost => {
                self.panel_posts
            }
            ComponentId::Logs => self.panel_logs,
        }
    }

    /// Base style for panel bodies
    pub fn base(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn heading(&self) -> Style {
        Style::default()
            .fg(self.title)
            .add_modifier(Modifier::BOLD)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::holo()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name_falls_back_to_holo() {
        assert_eq!(Theme::by_name("terminal").name, "terminal");
        assert_eq!(Theme::by_name("TERMINAL").name, "terminal");
        assert_eq!(Theme::by_name("nope").name, "holo");
    }

    #[test]
    fn test_unfocused_panels_use_border_color() {
        let theme = Theme::holo();
        assert_eq!(theme.panel_border(ComponentId::AllPosts, false), theme.border);
        assert_eq!(
            theme.panel_border(ComponentId::CreatePost, true),
            theme.panel_create
        );
    }
}
