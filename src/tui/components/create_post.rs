// Create form
//
// Title + content; submittable once both are non-empty. A successful submit
// emits PostCreated, which the App relays to the post list.

use super::post_form::{Field, PostForm};
use crate::tui::events::{CreateMsg, ForumEvent};
use crate::tui::task::Remote;
use crate::tui::traits::{Component, ComponentId, Handled, Interactive, RenderContext};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub struct CreatePost {
    remote: Remote<CreateMsg>,
    form: PostForm,
    submitting: bool,
    error: Option<String>,
    clear_on_success: bool,
}

impl CreatePost {
    pub fn new(remote: Remote<CreateMsg>, clear_on_success: bool) -> Self {
        Self {
            remote,
            form: PostForm::new(),
            submitting: false,
            error: None,
            clear_on_success,
        }
    }

    /// Both fields defined and non-empty
    pub fn is_valid(&self) -> bool {
        matches!(
            (self.form.title(), self.form.content()),
            (Some(title), Some(content)) if !title.is_empty() && !content.is_empty()
        )
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn form(&self) -> &PostForm {
        &self.form
    }

    /// Focus lands on the first field when entering with Tab, the last with Shift+Tab
    pub fn enter(&mut self, backwards: bool) {
        self.form.focus(if backwards {
            Field::Content
        } else {
            Field::Title
        });
    }

    /// Issue `create_post`; returns false if the form is not submittable
    pub fn submit(&mut self) -> bool {
        if self.submitting || !self.is_valid() {
            return false;
        }
        let Some(post) = self.form.post() else {
            return false;
        };

        self.submitting = true;
        self.error = None;
        tracing::debug!("creating post '{}'", post.title);
        self.remote.call(
            |zome| async move { zome.create_post(&post).await },
            CreateMsg::Created,
        );
        true
    }

    pub fn update(&mut self, msg: CreateMsg) -> Option<ForumEvent> {
        match msg {
            CreateMsg::Created(result) => {
                self.submitting = false;
                match result {
                    Ok(record) => {
                        let post_hash = record.action_hash().clone();
                        tracing::info!("post created: {}", post_hash);
                        if self.clear_on_success {
                            self.form.clear();
                        }
                        Some(ForumEvent::PostCreated { post_hash })
                    }
                    Err(e) => {
                        self.error = Some(format!("Error creating the post: {}", e.message()));
                        None
                    }
                }
            }
        }
    }

    pub fn height(&self) -> u16 {
        // fields + button row + error row + borders
        self.form.height() + 4
    }
}

impl Component for CreatePost {
    fn id(&self) -> ComponentId {
        ComponentId::CreatePost
    }

    fn render(&self, f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let theme = ctx.theme;
        let focused = ctx.is_focused(self.id());
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.panel_border(self.id(), focused)))
            .title(" Create Post ")
            .style(theme.base());
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::vertical([
            Constraint::Length(self.form.height()),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

        self.form.render(f, chunks[0], theme, focused);

        let button = if self.submitting {
            Span::styled(
                format!(" {} Creating… ", ctx.spinner_char()),
                Style::default().fg(theme.muted),
            )
        } else if self.is_valid() {
            Span::styled(
                " Create Post (Ctrl+S) ",
                Style::default()
                    .fg(theme.selection_fg)
                    .bg(theme.primary)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(" Create Post ", theme.muted_style())
        };
        f.render_widget(Paragraph::new(Line::from(button)), chunks[1]);

        if let Some(error) = &self.error {
            f.render_widget(
                Paragraph::new(error.as_str())
                    .style(theme.error_style())
                    .wrap(Wrap { trim: true }),
                chunks[2],
            );
        }
    }
}

impl Interactive for CreatePost {
    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            self.submit();
            return Handled::Yes;
        }
        self.form.handle_key(key).into()
    }

    fn captures_text(&self) -> bool {
        true
    }

    fn focus_hint(&self) -> Option<&'static str> {
        Some("Tab:next field  Ctrl+S:create  Esc:leave form")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posts::Post;
    use crate::theme::Theme;
    use crate::tui::events::Message;
    use crate::tui::testing::{ctrl, key, render_text, type_str, Harness};

    fn form(harness: &Harness, clear: bool) -> CreatePost {
        CreatePost::new(harness.remote.map(Message::Create), clear)
    }

    fn fill(view: &mut CreatePost, title: &str, content: &str) {
        type_str(view, title);
        view.handle_key(key(KeyCode::Tab));
        type_str(view, content);
    }

    async fn finish(harness: &mut Harness, view: &mut CreatePost) -> Option<ForumEvent> {
        match harness.next().await {
            Message::Create(msg) => view.update(msg),
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_submit_disabled_until_both_fields_non_empty() {
        let mut harness = Harness::new();
        let mut view = form(&harness, false);
        assert!(!view.is_valid());
        assert!(!view.submit());

        type_str(&mut view, "Hello");
        assert!(!view.is_valid());

        view.handle_key(key(KeyCode::Tab));
        view.handle_key(key(KeyCode::Backspace)); // defined but empty
        assert!(!view.is_valid());

        type_str(&mut view, "W");
        assert!(view.is_valid());

        view.handle_key(key(KeyCode::Backspace));
        assert!(!view.is_valid());
        assert!(harness.quiet());
        assert_eq!(harness.conductor.calls("create_post"), 0);
    }

    #[tokio::test]
    async fn test_create_emits_post_created() {
        let mut harness = Harness::new();
        let mut view = form(&harness, false);
        fill(&mut view, "Hello", "World");

        assert_eq!(view.handle_key(ctrl('s')), Handled::Yes);
        assert!(view.is_submitting());

        let event = finish(&mut harness, &mut view).await;
        let hashes = harness.conductor.post_hashes();
        assert_eq!(
            event,
            Some(ForumEvent::PostCreated {
                post_hash: hashes[0].clone()
            })
        );
        assert!(!view.is_submitting());
        // Fields are kept by default
        assert_eq!(view.form().post(), Some(Post::new("Hello", "World")));
    }

    #[tokio::test]
    async fn test_clear_on_success_when_configured() {
        let mut harness = Harness::new();
        let mut view = form(&harness, true);
        fill(&mut view, "a", "b");
        view.submit();
        finish(&mut harness, &mut view).await;
        assert_eq!(view.form().title(), None);
        assert_eq!(view.form().content(), None);
    }

    #[tokio::test]
    async fn test_failure_shows_inline_error_and_allows_retry() {
        let mut harness = Harness::new();
        harness.conductor.fail_next("create_post", "title too long");
        let mut view = form(&harness, false);
        fill(&mut view, "a", "b");

        view.submit();
        assert_eq!(finish(&mut harness, &mut view).await, None);
        assert_eq!(view.error(), Some("Error creating the post: title too long"));

        let theme = Theme::default();
        let ctx = RenderContext::new(&theme, ComponentId::CreatePost, 0);
        let text = render_text(60, view.height(), |f| view.render(f, f.area(), &ctx));
        assert!(text.contains("Error creating the post: title too long"));

        assert!(view.submit());
        assert!(matches!(
            finish(&mut harness, &mut view).await,
            Some(ForumEvent::PostCreated { .. })
        ));
        assert_eq!(view.error(), None);
    }

    #[tokio::test]
    async fn test_double_submit_is_ignored() {
        let mut harness = Harness::new();
        let mut view = form(&harness, false);
        fill(&mut view, "a", "b");
        assert!(view.submit());
        assert!(!view.submit());
        finish(&mut harness, &mut view).await;
        assert_eq!(harness.conductor.calls("create_post"), 1);
    }
}
