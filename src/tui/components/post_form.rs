// Title + content field pair shared by the create and edit forms

use super::text_field::TextField;
use crate::posts::Post;
use crate::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Content,
}

#[derive(Debug, Clone)]
pub struct PostForm {
    title: TextField,
    content: TextField,
    active: Field,
}

impl PostForm {
    pub fn new() -> Self {
        Self {
            title: TextField::new("Title", false),
            content: TextField::new("Content", true),
            active: Field::Title,
        }
    }

    /// Form pre-filled from an existing post
    pub fn seeded(post: Option<Post>) -> Self {
        let (title, content) = match post {
            Some(post) => (Some(post.title), Some(post.content)),
            None => (None, None),
        };
        Self {
            title: TextField::with_value("Title", false, title),
            content: TextField::with_value("Content", true, content),
            active: Field::Title,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.title.value()
    }

    pub fn content(&self) -> Option<&str> {
        self.content.value()
    }

    pub fn active(&self) -> Field {
        self.active
    }

    /// Both fields as a post, if both are defined
    pub fn post(&self) -> Option<Post> {
        Some(Post::new(self.title()?, self.content()?))
    }

    pub fn focus(&mut self, field: Field) {
        self.active = field;
    }

    pub fn clear(&mut self) {
        self.title.clear();
        self.content.clear();
        self.active = Field::Title;
    }

    /// Route a key to the active field
    ///
    /// Tab/Shift+Tab move between the two fields and return false when they
    /// would leave the form, so the parent can move focus on.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match (key.code, self.active) {
            (KeyCode::Tab, Field::Title) => {
                self.active = Field::Content;
                true
            }
            (KeyCode::BackTab, Field::Content) => {
                self.active = Field::Title;
                true
            }
            (KeyCode::Tab | KeyCode::BackTab, _) => false,
            (_, Field::Title) => self.title.handle_key(key),
            (_, Field::Content) => self.content.handle_key(key),
        }
    }

    pub fn height(&self) -> u16 {
        self.title.height() + self.content.height()
    }

    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme, focused: bool) {
        let chunks = Layout::vertical([
            Constraint::Length(self.title.height()),
            Constraint::Length(self.content.height()),
        ])
        .split(area);

        self.title
            .render(f, chunks[0], theme, focused && self.active == Field::Title);
        self.content
            .render(f, chunks[1], theme, focused && self.active == Field::Content);
    }
}

impl Default for PostForm {
    fn default() -> Self {
        Self::new()
    }
}
