// Edit form, embedded in a post while editing
//
// Seeded from the record the post currently shows. The update always names
// that record as the previous version, so a concurrent edit elsewhere is
// detected by the backend rather than silently overwritten.

use super::post_form::PostForm;
use crate::posts::{ActionHash, Post, Record, UpdatePostInput};
use crate::tui::events::{EditMsg, ForumEvent};
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
use tokio::task::AbortHandle;

pub struct EditPost {
    remote: Remote<EditMsg>,
    original_post_hash: ActionHash,
    current_record: Record,
    form: PostForm,
    submission: Option<AbortHandle>,
    error: Option<String>,
}

impl EditPost {
    pub fn new(remote: Remote<EditMsg>, original_post_hash: ActionHash, current_record: Record) -> Self {
        let post = match current_record.decode_entry::<Post>() {
            Ok(post) => Some(post),
            Err(e) => {
                tracing::warn!("editing a record without a readable post: {}", e);
                None
            }
        };
        Self {
            remote,
            original_post_hash,
            current_record,
            form: PostForm::seeded(post),
            submission: None,
            error: None,
        }
    }

    /// Both fields defined; empty strings are accepted here
    pub fn is_valid(&self) -> bool {
        self.form.post().is_some()
    }

    pub fn is_submitting(&self) -> bool {
        self.submission.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Issue `update_post`; returns false if the form is not submittable
    pub fn submit(&mut self) -> bool {
        if self.is_submitting() {
            return false;
        }
        let Some(updated_post) = self.form.post() else {
            return false;
        };

        let input = UpdatePostInput {
            original_post_hash: self.original_post_hash.clone(),
            previous_post_hash: self.current_record.action_hash().clone(),
            updated_post,
        };
        self.error = None;
        tracing::debug!(
            "updating post {} (previous {})",
            input.original_post_hash,
            input.previous_post_hash
        );
        let handle = self.remote.call(
            |zome| async move { zome.update_post(&input).await },
            EditMsg::Updated,
        );
        self.submission = Some(handle);
        true
    }

    /// Abort an outstanding update; the form is being thrown away
    pub fn abandon(&mut self) {
        if let Some(handle) = self.submission.take() {
            handle.abort();
        }
    }

    pub fn update(&mut self, msg: EditMsg) -> Option<ForumEvent> {
        match msg {
            EditMsg::Updated(result) => {
                self.submission = None;
                match result {
                    Ok(record) => Some(ForumEvent::PostUpdated {
                        original_post_hash: self.original_post_hash.clone(),
                        previous_post_hash: self.current_record.action_hash().clone(),
                        updated_post_hash: record.action_hash().clone(),
                    }),
                    Err(e) => {
                        self.error = Some(format!("Error updating the post: {}", e.message()));
                        None
                    }
                }
            }
        }
    }

    pub fn height(&self) -> u16 {
        self.form.height() + 4
    }
}

impl Component for EditPost {
    fn id(&self) -> ComponentId {
        ComponentId::EditPost
    }

    fn render(&self, f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let theme = ctx.theme;
        let focused = ctx.is_focused(self.id());
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.foreground))
            .title(" Edit ");
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::vertical([
            Constraint::Length(self.form.height()),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

        self.form.render(f, chunks[0], theme, focused);

        let cancel = Span::styled(
            " Cancel (Esc) ",
            Style::default().fg(theme.selection_fg).bg(theme.danger),
        );
        let save = if self.is_submitting() {
            Span::styled(
                format!(" {} Saving… ", ctx.spinner_char()),
                theme.muted_style(),
            )
        } else if self.is_valid() {
            Span::styled(
                " Save (Ctrl+S) ",
                Style::default()
                    .fg(theme.selection_fg)
                    .bg(theme.primary)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(" Save ", theme.muted_style())
        };
        f.render_widget(
            Paragraph::new(Line::from(vec![cancel, Span::raw("  "), save])),
            chunks[1],
        );

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

impl Interactive for EditPost {
    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        match key.code {
            // Canceling mid-submit would orphan the response
            KeyCode::Esc if self.is_submitting() => Handled::Yes,
            KeyCode::Esc => Handled::Emit(ForumEvent::EditCanceled),
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.submit();
                Handled::Yes
            }
            _ => self.form.handle_key(key).into(),
        }
    }

    fn captures_text(&self) -> bool {
        true
    }

    fn focus_hint(&self) -> Option<&'static str> {
        Some("Tab:next field  Ctrl+S:save  Esc:cancel")
    }
}
