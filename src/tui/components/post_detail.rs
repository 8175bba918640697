// Post detail
//
// Shows the latest version of one post. States:
//
//   fetch:   pending → error | not found | found
//   delete:  idle → deleting → { PostDeleted + refetch | inline error } → idle
//   edit:    off → EditPost embedded → { PostUpdated + refetch | canceled } → off
//
// The list keeps one of these per post identifier and hands it keys while
// the post is selected. A view can be pointed at another identifier; calls
// issued for the old one are then dropped by generation (delete) or by edit
// session (update).

use super::edit_post::EditPost;
use crate::posts::{ActionHash, Post, Record};
use crate::tui::events::{DetailMsg, ForumEvent, ViewId};
use crate::tui::task::{Remote, Task, TaskStatus};
use crate::tui::traits::{Component, ComponentId, Copyable, Handled, Interactive, RenderContext};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub struct PostDetail {
    view: ViewId,
    remote: Remote<DetailMsg>,
    post_hash: ActionHash,
    fetch: Task<Option<Record>>,
    delete: Task<()>,
    delete_error: Option<String>,
    editing: Option<EditPost>,
    /// Bumped by every `start_edit`; update results from older sessions are stale
    edit_session: u64,
}

impl PostDetail {
    /// Create the view and issue its first `get_post`
    pub fn mount(view: ViewId, remote: Remote<DetailMsg>, post_hash: ActionHash) -> Self {
        let mut detail = Self {
            view,
            remote,
            post_hash,
            fetch: Task::new(),
            delete: Task::new(),
            delete_error: None,
            editing: None,
            edit_session: 0,
        };
        detail.fetch();
        detail
    }

    pub fn view_id(&self) -> ViewId {
        self.view
    }

    pub fn post_hash(&self) -> &ActionHash {
        &self.post_hash
    }

    pub fn status(&self) -> &TaskStatus<Option<Record>> {
        self.fetch.status()
    }

    /// Record currently displayed, if the post was found
    pub fn record(&self) -> Option<&Record> {
        self.fetch.value().and_then(|r| r.as_ref())
    }

    pub fn post(&self) -> Option<Post> {
        self.record().and_then(|r| r.decode_entry().ok())
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn is_deleting(&self) -> bool {
        self.delete.is_pending()
    }

    pub fn delete_error(&self) -> Option<&str> {
        self.delete_error.as_deref()
    }

    /// (Re)issue `get_post`, superseding any outstanding fetch
    pub fn fetch(&mut self) {
        let generation = self.fetch.begin();
        let post_hash = self.post_hash.clone();
        let handle = self.remote.call(
            |zome| async move { zome.get_post(&post_hash).await },
            move |result| DetailMsg::Fetched { generation, result },
        );
        self.fetch.track(handle);
    }

    /// Point this view at another post; refetches and leaves edit mode
    pub fn set_post_hash(&mut self, post_hash: ActionHash) {
        if post_hash == self.post_hash {
            return;
        }
        tracing::debug!("detail {} now shows {}", self.view, post_hash);
        self.post_hash = post_hash;
        self.abandon_calls();
        self.delete_error = None;
        self.fetch();
    }

    /// Stop caring about outstanding calls (view removed from the list)
    pub fn unmount(&mut self) {
        self.fetch.cancel();
        self.abandon_calls();
    }

    /// Drop the edit form and invalidate delete/update calls for the current post
    fn abandon_calls(&mut self) {
        self.delete.cancel();
        if let Some(mut edit) = self.editing.take() {
            edit.abandon();
        }
    }

    /// Switch to the edit form, seeded with the displayed record
    pub fn start_edit(&mut self) -> bool {
        if self.editing.is_some() || self.is_deleting() {
            return false;
        }
        let Some(record) = self.record().cloned() else {
            return false;
        };
        self.edit_session += 1;
        let session = self.edit_session;
        self.editing = Some(EditPost::new(
            self.remote.map(move |msg| DetailMsg::Edit { session, msg }),
            self.post_hash.clone(),
            record,
        ));
        true
    }

    /// Issue `delete_post`; ignored while a delete is outstanding
    pub fn delete(&mut self) -> bool {
        if self.is_deleting() || self.editing.is_some() || self.record().is_none() {
            return false;
        }
        self.delete_error = None;
        let generation = self.delete.begin();
        let post_hash = self.post_hash.clone();
        let handle = self.remote.call(
            |zome| async move { zome.delete_post(&post_hash).await },
            move |result| DetailMsg::Deleted { generation, result },
        );
        self.delete.track(handle);
        true
    }

    pub fn update(&mut self, msg: DetailMsg) -> Option<ForumEvent> {
        match msg {
            DetailMsg::Fetched { generation, result } => {
                self.fetch.resolve(generation, result);
                None
            }
            DetailMsg::Deleted { generation, result } => {
                let error = result.as_ref().err().map(|e| e.message().to_string());
                if !self.delete.resolve(generation, result) {
                    return None;
                }
                if let Some(message) = error {
                    self.delete_error = Some(format!("Error deleting the post: {}", message));
                    return None;
                }
                tracing::info!("post deleted: {}", self.post_hash);
                let post_hash = self.post_hash.clone();
                self.fetch();
                Some(ForumEvent::PostDeleted { post_hash })
            }
            DetailMsg::Edit { session, msg } => {
                if session != self.edit_session {
                    tracing::debug!("update from an earlier edit of detail {} dropped", self.view);
                    return None;
                }
                let Some(edit) = self.editing.as_mut() else {
                    tracing::debug!("edit result for detail {} arrived after edit mode ended", self.view);
                    return None;
                };
                let event = edit.update(msg);
                if let Some(ForumEvent::PostUpdated { .. }) = &event {
                    self.editing = None;
                    self.fetch();
                }
                event
            }
        }
    }

    /// Rows needed at the given width
    pub fn height(&self, width: u16) -> u16 {
        if let Some(edit) = &self.editing {
            return edit.height();
        }
        let Some(post) = self.post() else {
            return 3;
        };
        let text_width = usize::from(width.saturating_sub(2));
        let error_rows = usize::from(self.delete_error.is_some());
        let rows = 2
            + wrapped_rows(&post.title, text_width)
            + wrapped_rows(&post.content, text_width)
            + 1
            + error_rows;
        u16::try_from(rows).unwrap_or(u16::MAX)
    }

    fn render_found(&self, f: &mut Frame, area: Rect, ctx: &RenderContext, record: &Record) {
        let theme = ctx.theme;
        let selected = ctx.is_focused(ComponentId::PostDetail);
        let border = if selected { theme.highlight } else { theme.border };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(Line::from(format!(" {} ", record.action_hash().short())).right_aligned());
        let inner = block.inner(area);
        f.render_widget(block, area);

        let post = match record.decode_entry::<Post>() {
            Ok(post) => post,
            Err(e) => {
                f.render_widget(
                    Paragraph::new(e.to_string()).style(theme.error_style()),
                    inner,
                );
                return;
            }
        };

        let title_rows = u16::try_from(wrapped_rows(&post.title, usize::from(inner.width)))
            .unwrap_or(u16::MAX);
        let chunks = Layout::vertical([
            Constraint::Length(title_rows),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(u16::from(self.delete_error.is_some())),
        ])
        .split(inner);

        f.render_widget(
            Paragraph::new(post.title.as_str())
                .style(theme.heading())
                .wrap(Wrap { trim: false }),
            chunks[0],
        );
        f.render_widget(
            Paragraph::new(post.content.as_str())
                .style(Style::default().fg(theme.foreground))
                .wrap(Wrap { trim: false }),
            chunks[1],
        );

        let actions = if self.is_deleting() {
            Line::from(Span::styled(
                format!("{} deleting…", ctx.spinner_char()),
                theme.muted_style(),
            ))
        } else if selected {
            Line::from(vec![
                Span::styled("e", Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD)),
                Span::styled(":edit  ", theme.muted_style()),
                Span::styled("d", Style::default().fg(theme.danger).add_modifier(Modifier::BOLD)),
                Span::styled(":delete  ", theme.muted_style()),
                Span::styled("y", Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD)),
                Span::styled(":copy", theme.muted_style()),
            ])
        } else {
            Line::default()
        };
        f.render_widget(Paragraph::new(actions), chunks[2]);

        if let Some(error) = &self.delete_error {
            f.render_widget(
                Paragraph::new(error.as_str()).style(theme.error_style()),
                chunks[3],
            );
        }
    }
}

/// Rows `text` needs when word-wrapped into `width` columns
///
/// Follows `Wrap { trim: false }`: a word that does not fit moves to the next
/// row whole, a word wider than the row is broken between characters, and
/// wide (CJK, emoji) characters take two columns.
fn wrapped_rows(text: &str, width: usize) -> usize {
    let width = width.max(1);
    text.split('\n').map(|line| line_rows(line, width)).sum()
}

fn line_rows(line: &str, width: usize) -> usize {
    let mut rows = 1;
    let mut used = 0;
    for word in line.split_inclusive(' ') {
        let word_width = word.trim_end_matches(' ').width();
        if used > 0 && used + word_width > width {
            rows += 1;
            used = 0;
        }
        for c in word.chars() {
            let char_width = c.width().unwrap_or(0);
            if used + char_width > width && c == ' ' {
                continue;
            }
            if used > 0 && used + char_width > width {
                rows += 1;
                used = 0;
            }
            used += char_width;
        }
    }
    rows
}

impl Component for PostDetail {
    fn id(&self) -> ComponentId {
        ComponentId::PostDetail
    }

    fn render(&self, f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let theme = ctx.theme;

        if let Some(edit) = &self.editing {
            let focus = if ctx.is_focused(ComponentId::PostDetail) {
                ComponentId::EditPost
            } else {
                ctx.focus
            };
            edit.render(f, area, &ctx.with_focus(focus));
            return;
        }

        let message = match self.fetch.status() {
            TaskStatus::Initial | TaskStatus::Pending => {
                Line::styled(format!("{} ", ctx.spinner_char()), theme.muted_style())
            }
            TaskStatus::Error(e) => Line::styled(
                format!("Error fetching the post: {}", e.message()),
                theme.error_style(),
            ),
            TaskStatus::Complete(None) => Line::styled(
                "The requested post was not found.",
                Style::default().fg(theme.foreground),
            ),
            TaskStatus::Complete(Some(record)) => {
                self.render_found(f, area, ctx, record);
                return;
            }
        };

        let border = if ctx.is_focused(ComponentId::PostDetail) {
            theme.highlight
        } else {
            theme.border
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border));
        f.render_widget(Paragraph::new(message).block(block), area);
    }
}

impl Interactive for PostDetail {
    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        if let Some(edit) = self.editing.as_mut() {
            return match edit.handle_key(key) {
                Handled::Emit(ForumEvent::EditCanceled) => {
                    self.editing = None;
                    Handled::Yes
                }
                other => other,
            };
        }

        match key.code {
            KeyCode::Char('e') => {
                self.start_edit();
                Handled::Yes
            }
            KeyCode::Char('d') => {
                // Repeated presses while deleting are swallowed
                self.delete();
                Handled::Yes
            }
            _ => Handled::No,
        }
    }

    fn captures_text(&self) -> bool {
        self.editing.is_some()
    }

    fn focus_hint(&self) -> Option<&'static str> {
        match &self.editing {
            Some(edit) => edit.focus_hint(),
            None => Some("e:edit  d:delete  y:copy  Enter:record"),
        }
    }
}

impl Copyable for PostDetail {
    fn copy_text(&self) -> Option<String> {
        self.record()
            .and_then(|record| serde_json::to_string_pretty(record).ok())
    }

    fn copy_description(&self) -> String {
        format!("post {}", self.post_hash.short())
    }
}
