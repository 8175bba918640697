// Post list
//
// Fetches the identifier list and renders one PostDetail per identifier, in
// the backend's order. Refetches when a child reports a delete and when the
// App relays a create. Details survive refetches: an identifier that is still
// present keeps its view (and any edit in progress); views whose post vanished
// are pointed at new identifiers instead of being rebuilt.

use super::post_detail::PostDetail;
use crate::posts::{ActionHash, Record};
use crate::tui::events::{DetailMsg, ForumEvent, ListMsg, ViewId};
use crate::tui::task::{Remote, Task, TaskStatus};
use crate::tui::traits::{Component, ComponentId, Copyable, Handled, Interactive, RenderContext};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub struct AllPosts {
    remote: Remote<ListMsg>,
    fetch: Task<Vec<ActionHash>>,
    /// A fetch has succeeded at least once
    loaded: bool,
    details: Vec<PostDetail>,
    next_view: ViewId,
    selected: usize,
}

impl AllPosts {
    /// Create the view and issue its first `get_all_posts`
    pub fn mount(remote: Remote<ListMsg>) -> Self {
        let mut list = Self {
            remote,
            fetch: Task::new(),
            loaded: false,
            details: Vec::new(),
            next_view: 1,
            selected: 0,
        };
        list.fetch();
        list
    }

    pub fn status(&self) -> &TaskStatus<Vec<ActionHash>> {
        self.fetch.status()
    }

    /// Identifiers currently rendered, in display order
    pub fn hashes(&self) -> Vec<&ActionHash> {
        self.details.iter().map(PostDetail::post_hash).collect()
    }

    pub fn details(&self) -> &[PostDetail] {
        &self.details
    }

    pub fn selected(&self) -> Option<&PostDetail> {
        self.details.get(self.selected)
    }

    fn selected_mut(&mut self) -> Option<&mut PostDetail> {
        self.details.get_mut(self.selected)
    }

    pub fn selected_record(&self) -> Option<&Record> {
        self.selected().and_then(PostDetail::record)
    }

    pub fn is_editing(&self) -> bool {
        self.selected().is_some_and(PostDetail::is_editing)
    }

    /// (Re)issue `get_all_posts`, superseding any outstanding listing
    pub fn fetch(&mut self) {
        let generation = self.fetch.begin();
        let handle = self.remote.call(
            |zome| async move { zome.get_all_posts().await },
            move |result| ListMsg::Fetched { generation, result },
        );
        self.fetch.track(handle);
    }

    /// Relayed by the App when the create form reports a new post
    pub fn on_post_created(&mut self) {
        self.fetch();
    }

    pub fn update(&mut self, msg: ListMsg) -> Option<ForumEvent> {
        match msg {
            ListMsg::Fetched { generation, result } => {
                if !self.fetch.resolve(generation, result) {
                    return None;
                }
                match self.fetch.status() {
                    TaskStatus::Complete(hashes) => {
                        let hashes = hashes.clone();
                        self.loaded = true;
                        self.reconcile(&hashes);
                    }
                    TaskStatus::Error(e) => {
                        tracing::warn!("listing posts failed: {}", e);
                    }
                    _ => {}
                }
                None
            }
            ListMsg::Detail { view, msg } => {
                let Some(detail) = self.details.iter_mut().find(|d| d.view_id() == view) else {
                    tracing::debug!("message for unmounted detail {} dropped", view);
                    return None;
                };
                let event = detail.update(msg);
                if let Some(ForumEvent::PostDeleted { .. }) = &event {
                    self.fetch();
                }
                event
            }
        }
    }

    /// Make the rendered details match `hashes`, reusing views where possible
    fn reconcile(&mut self, hashes: &[ActionHash]) {
        let selected_hash = self.selected().map(|d| d.post_hash().clone());
        let mut previous = std::mem::take(&mut self.details);

        let slots: Vec<Result<PostDetail, ActionHash>> = hashes
            .iter()
            .map(|hash| {
                match previous.iter().position(|d| d.post_hash() == hash) {
                    Some(pos) => Ok(previous.remove(pos)),
                    None => Err(hash.clone()),
                }
            })
            .collect();

        let mut details = Vec::with_capacity(slots.len());
        for slot in slots {
            let detail = match slot {
                Ok(detail) => detail,
                Err(hash) => match previous.pop() {
                    Some(mut recycled) => {
                        recycled.set_post_hash(hash);
                        recycled
                    }
                    None => self.mount_detail(hash),
                },
            };
            details.push(detail);
        }

        for mut leftover in previous {
            leftover.unmount();
        }

        self.details = details;
        self.selected = selected_hash
            .and_then(|hash| self.details.iter().position(|d| d.post_hash() == &hash))
            .unwrap_or(self.selected)
            .min(self.details.len().saturating_sub(1));
    }

    fn mount_detail(&mut self, post_hash: ActionHash) -> PostDetail {
        let view = self.next_view;
        self.next_view += 1;
        let remote: Remote<DetailMsg> = self.remote.map(move |msg| ListMsg::Detail { view, msg });
        PostDetail::mount(view, remote, post_hash)
    }

    fn select_next(&mut self) {
        if self.selected + 1 < self.details.len() {
            self.selected += 1;
        }
    }

    fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Header line: spinner while refetching, error if the last listing failed
    fn header(&self, ctx: &RenderContext) -> Option<Line<'static>> {
        match self.fetch.status() {
            TaskStatus::Pending if self.loaded => Some(Line::styled(
                format!("{} refreshing…", ctx.spinner_char()),
                ctx.theme.muted_style(),
            )),
            TaskStatus::Error(e) if self.loaded => Some(Line::styled(
                format!("Error fetching the posts: {}.", e.message()),
                ctx.theme.error_style(),
            )),
            _ => None,
        }
    }

    fn render_centered(&self, f: &mut Frame, area: Rect, line: Line<'static>) {
        let y = area.y + area.height / 2;
        let row = Rect::new(area.x, y.min(area.bottom().saturating_sub(1)), area.width, 1);
        f.render_widget(
            Paragraph::new(line)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            row,
        );
    }

    fn render_details(&self, f: &mut Frame, area: Rect, ctx: &RenderContext, list_focused: bool) {
        if area.height == 0 {
            return;
        }
        let heights: Vec<u16> = self.details.iter().map(|d| d.height(area.width)).collect();

        // First visible detail: scroll just enough to keep the selection on screen
        let mut start = 0;
        while start < self.selected {
            let needed: usize = heights[start..=self.selected].iter().map(|&h| usize::from(h)).sum();
            if needed <= usize::from(area.height) {
                break;
            }
            start += 1;
        }

        let mut y = area.y;
        for (index, detail) in self.details.iter().enumerate().skip(start) {
            if y >= area.bottom() {
                break;
            }
            let height = heights[index].min(area.bottom() - y);
            let focus = if list_focused && index == self.selected {
                ComponentId::PostDetail
            } else {
                ctx.focus
            };
            detail.render(f, Rect::new(area.x, y, area.width, height), &ctx.with_focus(focus));
            y += height;
        }
    }
}

impl Component for AllPosts {
    fn id(&self) -> ComponentId {
        ComponentId::AllPosts
    }

    fn render(&self, f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let theme = ctx.theme;
        let focused = ctx.is_focused(self.id());
        let title = if self.loaded {
            format!(" Posts ({}) ", self.details.len())
        } else {
            " Posts ".to_string()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.panel_border(self.id(), focused)))
            .title(title)
            .style(theme.base());
        let inner = block.inner(area);
        f.render_widget(block, area);

        if !self.loaded {
            let line = match self.fetch.status() {
                TaskStatus::Error(e) => Line::styled(
                    format!("Error fetching the posts: {}.", e.message()),
                    theme.error_style(),
                ),
                _ => Line::styled(ctx.spinner_char().to_string(), theme.muted_style()),
            };
            self.render_centered(f, inner, line);
            return;
        }

        let mut body = inner;
        if let Some(header) = self.header(ctx) {
            f.render_widget(Paragraph::new(header), Rect::new(inner.x, inner.y, inner.width, 1));
            body = Rect::new(
                inner.x,
                inner.y.saturating_add(1),
                inner.width,
                inner.height.saturating_sub(1),
            );
        }

        if self.details.is_empty() {
            self.render_centered(
                f,
                body,
                Line::styled("No posts found.", Style::default().fg(theme.foreground)),
            );
            return;
        }

        self.render_details(f, body, ctx, focused);
    }
}

impl Interactive for AllPosts {
    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        if self.is_editing() {
            if let Some(detail) = self.selected_mut() {
                return detail.handle_key(key);
            }
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_previous();
                Handled::Yes
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
                Handled::Yes
            }
            KeyCode::Home => {
                self.selected = 0;
                Handled::Yes
            }
            KeyCode::End => {
                self.selected = self.details.len().saturating_sub(1);
                Handled::Yes
            }
            KeyCode::Char('r') => {
                self.fetch();
                Handled::Yes
            }
            _ => match self.selected_mut() {
                Some(detail) => detail.handle_key(key),
                None => Handled::No,
            },
        }
    }

    fn captures_text(&self) -> bool {
        self.is_editing()
    }

    fn focus_hint(&self) -> Option<&'static str> {
        match self.selected() {
            Some(detail) if detail.is_editing() => detail.focus_hint(),
            Some(_) => Some("↑↓:select  e:edit  d:delete  y:copy  Enter:record  r:reload"),
            None => Some("r:reload"),
        }
    }
}

impl Copyable for AllPosts {
    fn copy_text(&self) -> Option<String> {
        self.selected().and_then(Copyable::copy_text)
    }

    fn copy_description(&self) -> String {
        match self.selected() {
            Some(detail) => detail.copy_description(),
            None => "post".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posts::{Post, PostsZome};
    use crate::theme::Theme;
    use crate::tui::events::Message;
    use crate::tui::testing::{key, render_text, Harness};
    use std::collections::BTreeSet;
    use std::sync::Arc;

    fn mount(harness: &Harness) -> AllPosts {
        AllPosts::mount(harness.remote.map(Message::List))
    }

    /// Deliver messages until none arrive for a moment; returns emitted events
    async fn settle(harness: &mut Harness, list: &mut AllPosts) -> Vec<ForumEvent> {
        let mut events = Vec::new();
        loop {
            let next = tokio::time::timeout(
                std::time::Duration::from_millis(100),
                harness.rx.recv(),
            )
            .await;
            match next {
                Ok(Some(Message::List(msg))) => events.extend(list.update(msg)),
                Ok(Some(other)) => panic!("unexpected message: {:?}", other),
                Ok(None) | Err(_) => return events,
            }
        }
    }

    fn screen(list: &AllPosts) -> String {
        let theme = Theme::default();
        let ctx = RenderContext::new(&theme, ComponentId::AllPosts, 0);
        render_text(60, 30, |f| list.render(f, f.area(), &ctx))
    }

    fn zome(harness: &Harness) -> PostsZome {
        PostsZome::new(Arc::new(harness.conductor.clone()), "forum", "posts")
    }

    #[tokio::test]
    async fn test_empty_state() {
        let mut harness = Harness::new();
        let mut list = mount(&harness);
        assert!(screen(&list).contains('◐'));
        settle(&mut harness, &mut list).await;
        assert!(screen(&list).contains("No posts found."));
    }

    #[tokio::test]
    async fn test_renders_posts_in_backend_order() {
        let mut harness = Harness::new();
        let seeded = harness
            .conductor
            .seed(&[Post::new("first", "1"), Post::new("second", "2")]);
        let mut list = mount(&harness);
        settle(&mut harness, &mut list).await;

        assert_eq!(list.hashes(), seeded.iter().collect::<Vec<_>>());
        let text = screen(&list);
        let first = text.find("first").unwrap();
        let second = text.find("second").unwrap();
        assert!(first < second);
    }

    #[tokio::test]
    async fn test_initial_failure_message() {
        let mut harness = Harness::new();
        harness.conductor.fail_next("get_all_posts", "conductor unreachable");
        let mut list = mount(&harness);
        settle(&mut harness, &mut list).await;
        assert!(screen(&list).contains("Error fetching the posts: conductor unreachable."));
    }

    #[tokio::test]
    async fn test_refetch_failure_keeps_details() {
        let mut harness = Harness::new();
        harness.conductor.seed(&[Post::new("kept", "body")]);
        let mut list = mount(&harness);
        settle(&mut harness, &mut list).await;

        harness.conductor.fail_next("get_all_posts", "flaky");
        list.fetch();
        settle(&mut harness, &mut list).await;

        let text = screen(&list);
        assert!(text.contains("Error fetching the posts: flaky."));
        assert!(text.contains("kept"));
    }

    #[tokio::test]
    async fn test_delete_refetches_and_emits_once() {
        let mut harness = Harness::new();
        let seeded = harness
            .conductor
            .seed(&[Post::new("a", "1"), Post::new("b", "2")]);
        let mut list = mount(&harness);
        settle(&mut harness, &mut list).await;

        list.handle_key(key(KeyCode::Char('d')));
        let events = settle(&mut harness, &mut list).await;

        assert_eq!(
            events,
            vec![ForumEvent::PostDeleted {
                post_hash: seeded[0].clone()
            }]
        );
        assert_eq!(list.hashes(), vec![&seeded[1]]);
        assert_eq!(harness.conductor.calls("get_all_posts"), 2);
    }

    #[tokio::test]
    async fn test_identifier_set_tracks_backend() {
        let mut harness = Harness::new();
        let zome = zome(&harness);
        let mut list = mount(&harness);
        settle(&mut harness, &mut list).await;

        let a = zome.create_post(&Post::new("a", "1")).await.unwrap();
        list.on_post_created();
        settle(&mut harness, &mut list).await;
        let b = zome.create_post(&Post::new("b", "2")).await.unwrap();
        list.on_post_created();
        settle(&mut harness, &mut list).await;
        zome.delete_post(a.action_hash()).await.unwrap();
        list.fetch();
        settle(&mut harness, &mut list).await;

        let shown: BTreeSet<_> = list.hashes().into_iter().cloned().collect();
        let backend: BTreeSet<_> = harness.conductor.post_hashes().into_iter().collect();
        assert_eq!(shown, backend);
        assert_eq!(list.hashes(), vec![b.action_hash()]);
    }

    #[tokio::test]
    async fn test_surviving_views_are_reused() {
        let mut harness = Harness::new();
        let zome = zome(&harness);
        let seeded = harness
            .conductor
            .seed(&[Post::new("a", "1"), Post::new("b", "2")]);
        let mut list = mount(&harness);
        settle(&mut harness, &mut list).await;
        let view_of_b = list.details()[1].view_id();

        // Edit in progress on b survives a refetch
        list.handle_key(key(KeyCode::Down));
        list.handle_key(key(KeyCode::Char('e')));
        assert!(list.is_editing());

        zome.create_post(&Post::new("c", "3")).await.unwrap();
        list.on_post_created();
        settle(&mut harness, &mut list).await;

        assert_eq!(list.details()[1].view_id(), view_of_b);
        assert_eq!(list.details()[1].post_hash(), &seeded[1]);
        assert!(list.is_editing());
        assert_eq!(list.hashes().len(), 3);
    }

    #[tokio::test]
    async fn test_vanished_view_is_recycled() {
        let mut harness = Harness::new();
        let zome = zome(&harness);
        let seeded = harness.conductor.seed(&[Post::new("a", "1")]);
        let mut list = mount(&harness);
        settle(&mut harness, &mut list).await;
        let view = list.details()[0].view_id();

        zome.delete_post(&seeded[0]).await.unwrap();
        let c = zome.create_post(&Post::new("c", "3")).await.unwrap();
        list.fetch();
        settle(&mut harness, &mut list).await;

        assert_eq!(list.details()[0].view_id(), view);
        assert_eq!(list.details()[0].post_hash(), c.action_hash());
        assert_eq!(list.details()[0].post().map(|p| p.title), Some("c".to_string()));
    }

    #[tokio::test]
    async fn test_update_keeps_identifier_and_shows_new_values() {
        let mut harness = Harness::new();
        let seeded = harness.conductor.seed(&[Post::new("t", "c")]);
        let mut list = mount(&harness);
        settle(&mut harness, &mut list).await;

        list.handle_key(key(KeyCode::Char('e')));
        list.handle_key(key(KeyCode::Char('!')));
        list.handle_key(crate::tui::testing::ctrl('s'));
        let events = settle(&mut harness, &mut list).await;

        assert!(matches!(events.as_slice(), [ForumEvent::PostUpdated { .. }]));
        assert!(!list.is_editing());
        assert_eq!(list.hashes(), vec![&seeded[0]]);
        assert_eq!(list.details()[0].post(), Some(Post::new("t!", "c")));
        assert!(screen(&list).contains("t!"));
    }

    #[tokio::test]
    async fn test_stale_listing_is_dropped() {
        let mut harness = Harness::new();
        harness.conductor.seed(&[Post::new("a", "1")]);
        let mut list = mount(&harness);
        list.fetch(); // supersedes the mount fetch
        settle(&mut harness, &mut list).await;
        assert_eq!(list.hashes().len(), 1);

        // The first fetch's answer shows up late and must not empty the list
        let event = list.update(ListMsg::Fetched {
            generation: 1,
            result: Ok(vec![]),
        });
        assert_eq!(event, None);
        assert_eq!(list.hashes().len(), 1);
        assert!(matches!(list.status(), TaskStatus::Complete(hashes) if hashes.len() == 1));
    }

    #[tokio::test]
    async fn test_huge_post_does_not_break_scrolling() {
        let mut harness = Harness::new();
        harness.conductor.seed(&[
            Post::new("huge", "\n".repeat(70_000)),
            Post::new("huge too", "\n".repeat(70_000)),
            Post::new("small", "last"),
        ]);
        let mut list = mount(&harness);
        settle(&mut harness, &mut list).await;

        list.handle_key(key(KeyCode::End));
        let text = screen(&list);
        assert!(text.contains("small"));
        assert!(!text.contains("huge"));
    }

    #[tokio::test]
    async fn test_selection_moves_and_clamps() {
        let mut harness = Harness::new();
        harness
            .conductor
            .seed(&[Post::new("a", "1"), Post::new("b", "2")]);
        let mut list = mount(&harness);
        settle(&mut harness, &mut list).await;

        list.handle_key(key(KeyCode::Char('j')));
        list.handle_key(key(KeyCode::Char('j')));
        assert_eq!(list.selected().map(|d| d.post().unwrap().title), Some("b".to_string()));
        list.handle_key(key(KeyCode::Char('k')));
        assert_eq!(list.selected().map(|d| d.post().unwrap().title), Some("a".to_string()));
    }
}
