// TUI application state
//
// The App is the shell around the forum views. It owns the connection, the
// two top-level views (create form and post list), focus, the modal and the
// toast. Finished calls arrive as Messages and are routed down by update();
// ForumEvents returned by the views are relayed here.

use super::components::{AllPosts, CreatePost, LogsPanel, Toast};
use super::events::{ForumEvent, Message};
use super::modal::{Modal, ModalAction};
use super::task::{InFlight, Remote};
use super::traits::{copy_from, ComponentId, Handled, Interactive, RenderContext};
use crate::client::{AppClient, CallError, Endpoint};
use crate::config::Config;
use crate::logging::LogBuffer;
use crate::posts::PostsZome;
use crate::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::Arc;
use tokio::sync::mpsc;

/// State of the conductor connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connection {
    Connecting,
    Connected,
    Failed(String),
}

/// Main application state for the TUI
pub struct App {
    pub config: Config,

    /// Where the handshake goes
    pub endpoint: Endpoint,

    /// Current color theme
    pub theme: Theme,

    pub connection: Connection,

    /// Which top-level view receives keys
    pub focused: ComponentId,

    /// Create form (mounted once connected)
    pub create: Option<CreatePost>,

    /// Post list (mounted once connected)
    pub list: Option<AllPosts>,

    /// System logs, shown at the bottom when toggled
    pub logs: LogsPanel,
    pub show_logs: bool,

    /// Modal overlay capturing all input
    pub modal: Option<Modal>,

    /// Transient notification
    pub toast: Option<Toast>,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Animation frame counter for spinners
    animation_frame: usize,

    tx: mpsc::UnboundedSender<Message>,
    in_flight: InFlight,
}

impl App {
    pub fn new(
        config: Config,
        endpoint: Endpoint,
        log_buffer: LogBuffer,
        tx: mpsc::UnboundedSender<Message>,
    ) -> Self {
        let theme = Theme::by_name(&config.theme);
        Self {
            config,
            endpoint,
            theme,
            connection: Connection::Connecting,
            focused: ComponentId::AllPosts,
            create: None,
            list: None,
            logs: LogsPanel::new(log_buffer),
            show_logs: false,
            modal: None,
            toast: None,
            should_quit: false,
            animation_frame: 0,
            tx,
            in_flight: InFlight::default(),
        }
    }

    /// Start the handshake; the result arrives as `Message::Connected`
    pub fn connect(&mut self) {
        self.connection = Connection::Connecting;
        tracing::info!("connecting to {}", self.endpoint.describe());

        let endpoint = self.endpoint.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = endpoint.connect().await;
            let _ = tx.send(Message::Connected(result));
        });
    }

    /// Route a finished call to the view that issued it
    pub fn update(&mut self, msg: Message) {
        match msg {
            Message::Connected(result) => self.on_connected(result),
            Message::List(msg) => {
                let event = self.list.as_mut().and_then(|list| list.update(msg));
                if let Some(event) = event {
                    self.relay(event);
                }
            }
            Message::Create(msg) => {
                let event = self.create.as_mut().and_then(|create| create.update(msg));
                if let Some(event) = event {
                    self.relay(event);
                }
            }
        }
    }

    fn on_connected(&mut self, result: Result<Arc<dyn AppClient>, CallError>) {
        match result {
            Ok(client) => {
                tracing::info!("connected ({})", client.name());
                let zome = PostsZome::new(client, &self.config.role_name, &self.config.zome_name);
                let remote = Remote::root(zome, self.tx.clone(), self.in_flight.clone());

                self.create = Some(CreatePost::new(
                    remote.map(Message::Create),
                    self.config.ui.clear_create_form_on_success,
                ));
                self.list = Some(AllPosts::mount(remote.map(Message::List)));
                self.connection = Connection::Connected;
            }
            Err(e) => {
                tracing::error!("connection failed: {}", e);
                self.connection = Connection::Failed(e.message().to_string());
            }
        }
    }

    /// React to an upward signal from a view
    fn relay(&mut self, event: ForumEvent) {
        if let Some(notice) = event.notice() {
            self.show_toast(notice);
        }
        if let ForumEvent::PostCreated { .. } = event {
            if let Some(list) = self.list.as_mut() {
                list.on_post_created();
            }
        }
    }

    /// Handle keyboard input
    /// Layered dispatch: Modal → Ctrl+C → Focused component → Global
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.modal.is_some() {
            self.handle_modal_key(key.code);
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.dispatch_to_focused(key) {
            Handled::Yes => return,
            Handled::Emit(event) => {
                self.relay(event);
                return;
            }
            Handled::No => {}
        }

        self.handle_global_key(key);
    }

    fn handle_modal_key(&mut self, code: KeyCode) {
        let Some(modal) = self.modal.as_mut() else {
            return;
        };
        match modal.handle_input(code) {
            ModalAction::None => {}
            ModalAction::Close => self.modal = None,
            ModalAction::Copy => {
                let text = modal.content().map(str::to_string);
                match text {
                    Some(text) => match super::clipboard::set_text(&text) {
                        Ok(()) => self.show_toast("✓ Copied record"),
                        Err(e) => self.show_toast(format!("✗ {}", e)),
                    },
                    None => self.show_toast("Nothing to copy"),
                }
            }
        }
    }

    fn dispatch_to_focused(&mut self, key: KeyEvent) -> Handled {
        let handled = match self.focused {
            ComponentId::CreatePost => self.create.as_mut().map(|c| c.handle_key(key)),
            ComponentId::AllPosts => self.list.as_mut().map(|l| l.handle_key(key)),
            _ => None,
        };
        handled.unwrap_or(Handled::No)
    }

    fn focused_captures_text(&self) -> bool {
        match self.focused {
            ComponentId::CreatePost => self.create.as_ref().is_some_and(|c| c.captures_text()),
            ComponentId::AllPosts => self.list.as_ref().is_some_and(|l| l.captures_text()),
            _ => false,
        }
    }

    fn handle_global_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => self.move_focus(false),
            KeyCode::BackTab => self.move_focus(true),
            KeyCode::Esc if self.focused == ComponentId::CreatePost => {
                self.focused = ComponentId::AllPosts;
            }
            _ if self.focused_captures_text() => {}
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.modal = Some(Modal::help()),
            KeyCode::Char('L') => self.show_logs = !self.show_logs,
            KeyCode::Char('Y') => {
                let result = copy_from(&self.logs);
                self.show_toast(result.toast_message());
            }
            KeyCode::Char('y') if self.focused == ComponentId::AllPosts => {
                if let Some(list) = self.list.as_ref() {
                    let result = copy_from(list);
                    self.show_toast(result.toast_message());
                }
            }
            KeyCode::Enter if self.focused == ComponentId::AllPosts => {
                if let Some(record) = self.list.as_ref().and_then(AllPosts::selected_record) {
                    self.modal = Some(Modal::record(record));
                }
            }
            KeyCode::Char('r') if matches!(self.connection, Connection::Failed(_)) => {
                self.connect();
            }
            _ => {}
        }
    }

    /// Tab/Shift+Tab between the create form and the list
    fn move_focus(&mut self, backwards: bool) {
        if self.connection != Connection::Connected {
            return;
        }
        self.focused = if backwards {
            self.focused.prev_focus()
        } else {
            self.focused.next_focus()
        };
        if self.focused == ComponentId::CreatePost {
            if let Some(create) = self.create.as_mut() {
                create.enter(backwards);
            }
        }
    }

    /// Advance animations and expire the toast
    pub fn tick(&mut self) {
        self.animation_frame = self.animation_frame.wrapping_add(1);
        self.clear_expired_toast();
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast::new(message));
    }

    pub fn clear_expired_toast(&mut self) {
        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        }
    }

    /// Number of zome calls currently outstanding
    pub fn in_flight(&self) -> usize {
        self.in_flight.count()
    }

    pub fn spinner_char(&self) -> char {
        self.render_context().spinner_char()
    }

    pub fn render_context(&self) -> RenderContext<'_> {
        RenderContext::new(&self.theme, self.focused, self.animation_frame)
    }

    /// Key hints for the status bar
    pub fn focus_hint(&self) -> Option<&'static str> {
        match &self.connection {
            Connection::Connecting => Some("q:quit"),
            Connection::Failed(_) => Some("r:retry  L:logs  q:quit"),
            Connection::Connected => match self.focused {
                ComponentId::CreatePost => self.create.as_ref().and_then(|c| c.focus_hint()),
                ComponentId::AllPosts => self.list.as_ref().and_then(|l| l.focus_hint()),
                _ => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MemoryConductor;
    use crate::posts::Post;
    use crate::tui::testing::{ctrl, key};
    use std::time::Duration;

    struct Shell {
        app: App,
        rx: mpsc::UnboundedReceiver<Message>,
        conductor: MemoryConductor,
    }

    impl Shell {
        async fn connected(posts: &[Post]) -> Self {
            let conductor = MemoryConductor::new();
            conductor.seed(posts);
            let (tx, rx) = mpsc::unbounded_channel();
            let app = App::new(
                Config::default(),
                Endpoint::InMemory(conductor.clone()),
                LogBuffer::new(),
                tx,
            );
            let mut shell = Self { app, rx, conductor };
            shell.app.connect();
            shell.settle().await;
            assert_eq!(shell.app.connection, Connection::Connected);
            shell
        }

        /// Deliver messages until none arrive for a moment
        async fn settle(&mut self) {
            while let Ok(Some(msg)) =
                tokio::time::timeout(Duration::from_millis(100), self.rx.recv()).await
            {
                self.app.update(msg);
            }
        }

        fn press(&mut self, code: KeyCode) {
            self.app.handle_key(key(code));
        }

        fn type_str(&mut self, text: &str) {
            for c in text.chars() {
                self.press(KeyCode::Char(c));
            }
        }

        fn toast(&self) -> Option<&str> {
            self.app.toast.as_ref().map(|t| t.message.as_str())
        }
    }

    #[tokio::test]
    async fn test_connect_mounts_views_and_loads_posts() {
        let shell = Shell::connected(&[Post::new("a", "1"), Post::new("b", "2")]).await;
        let list = shell.app.list.as_ref().expect("list mounted");
        assert_eq!(list.hashes().len(), 2);
        assert!(shell.app.create.is_some());
        assert_eq!(shell.app.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_failed_connection_offers_retry() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = App::new(
            Config::default(),
            Endpoint::InMemory(MemoryConductor::new()),
            LogBuffer::new(),
            tx,
        );
        app.update(Message::Connected(Err(CallError::Transport(
            "connection refused".to_string(),
        ))));
        assert_eq!(
            app.connection,
            Connection::Failed("connection refused".to_string())
        );
        assert!(app.list.is_none());

        // Tab does nothing without views
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focused, ComponentId::AllPosts);

        app.handle_key(key(KeyCode::Char('r')));
        assert_eq!(app.connection, Connection::Connecting);
        let msg = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("handshake finished")
            .expect("channel open");
        app.update(msg);
        assert_eq!(app.connection, Connection::Connected);
    }

    #[tokio::test]
    async fn test_create_refreshes_list_and_toasts() {
        let mut shell = Shell::connected(&[Post::new("a", "1")]).await;
        let listings = shell.conductor.calls("get_all_posts");

        shell.press(KeyCode::Tab);
        assert_eq!(shell.app.focused, ComponentId::CreatePost);
        shell.type_str("Hello");
        shell.press(KeyCode::Tab);
        shell.type_str("World");
        shell.app.handle_key(ctrl('s'));
        shell.settle().await;

        assert_eq!(shell.toast(), Some("✓ Post created"));
        assert_eq!(shell.conductor.calls("get_all_posts"), listings + 1);
        assert_eq!(shell.app.list.as_ref().map(|l| l.hashes().len()), Some(2));
    }

    #[tokio::test]
    async fn test_typing_in_form_does_not_trigger_shortcuts() {
        let mut shell = Shell::connected(&[]).await;
        shell.press(KeyCode::Tab);
        shell.type_str("q?L");
        assert!(!shell.app.should_quit);
        assert!(shell.app.modal.is_none());
        assert!(!shell.app.show_logs);
        assert_eq!(
            shell.app.create.as_ref().and_then(|c| c.form().title()),
            Some("q?L")
        );

        // Esc leaves the form, then q quits
        shell.press(KeyCode::Esc);
        assert_eq!(shell.app.focused, ComponentId::AllPosts);
        shell.press(KeyCode::Char('q'));
        assert!(shell.app.should_quit);
    }

    #[tokio::test]
    async fn test_tab_walks_form_fields_then_returns_to_list() {
        let mut shell = Shell::connected(&[]).await;
        shell.press(KeyCode::Tab); // list → title
        shell.press(KeyCode::Tab); // title → content
        assert_eq!(shell.app.focused, ComponentId::CreatePost);
        shell.press(KeyCode::Tab); // content → list
        assert_eq!(shell.app.focused, ComponentId::AllPosts);

        shell.press(KeyCode::BackTab); // list → content
        assert_eq!(shell.app.focused, ComponentId::CreatePost);
        assert_eq!(
            shell.app.create.as_ref().map(|c| c.form().active()),
            Some(crate::tui::components::post_form::Field::Content)
        );
    }

    #[tokio::test]
    async fn test_enter_opens_record_modal() {
        let mut shell = Shell::connected(&[Post::new("a", "1")]).await;
        shell.press(KeyCode::Enter);
        match &shell.app.modal {
            Some(Modal::Record { content, .. }) => assert!(content.contains("signed_action")),
            other => panic!("expected record modal, got {:?}", other),
        }

        // Modal swallows q
        shell.press(KeyCode::Char('q'));
        assert!(shell.app.modal.is_none());
        assert!(!shell.app.should_quit);
    }

    #[tokio::test]
    async fn test_delete_shows_toast_and_drops_post() {
        let mut shell = Shell::connected(&[Post::new("a", "1"), Post::new("b", "2")]).await;
        shell.press(KeyCode::Char('d'));
        shell.settle().await;
        assert_eq!(shell.toast(), Some("✓ Post deleted"));
        assert_eq!(shell.app.list.as_ref().map(|l| l.hashes().len()), Some(1));
    }

    #[tokio::test]
    async fn test_help_and_logs_toggles() {
        let mut shell = Shell::connected(&[]).await;
        shell.press(KeyCode::Char('?'));
        assert!(matches!(shell.app.modal, Some(Modal::Help)));
        shell.press(KeyCode::Esc);
        assert!(shell.app.modal.is_none());

        shell.press(KeyCode::Char('L'));
        assert!(shell.app.show_logs);
    }

    #[tokio::test]
    async fn test_ctrl_c_quits_from_form() {
        let mut shell = Shell::connected(&[]).await;
        shell.press(KeyCode::Tab);
        shell.app.handle_key(ctrl('c'));
        assert!(shell.app.should_quit);
    }
}
