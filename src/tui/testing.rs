// Test helpers shared by the view tests

use super::events::Message;
use super::task::{InFlight, Remote};
use super::traits::Interactive;
use crate::client::MemoryConductor;
use crate::posts::PostsZome;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::TestBackend, Frame, Terminal};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// A memory conductor wired to a root Remote, with the receiving end exposed
pub struct Harness {
    pub conductor: MemoryConductor,
    pub remote: Remote<Message>,
    pub rx: mpsc::UnboundedReceiver<Message>,
    pub in_flight: InFlight,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_conductor(MemoryConductor::new())
    }

    pub fn with_conductor(conductor: MemoryConductor) -> Self {
        let zome = PostsZome::new(Arc::new(conductor.clone()), "forum", "posts");
        let (tx, rx) = mpsc::unbounded_channel();
        let in_flight = InFlight::default();
        let remote = Remote::root(zome, tx, in_flight.clone());
        Self {
            conductor,
            remote,
            rx,
            in_flight,
        }
    }

    /// Next finished call; panics if nothing arrives within two seconds
    pub async fn next(&mut self) -> Message {
        match tokio::time::timeout(Duration::from_secs(2), self.rx.recv()).await {
            Ok(Some(msg)) => msg,
            Ok(None) => panic!("message channel closed"),
            Err(_) => panic!("no message within 2s"),
        }
    }

    /// True if no message is queued
    pub fn quiet(&mut self) -> bool {
        self.rx.try_recv().is_err()
    }
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

pub fn type_str(view: &mut dyn Interactive, text: &str) {
    for c in text.chars() {
        view.handle_key(key(KeyCode::Char(c)));
    }
}

/// Draw into an off-screen buffer and return its text, one line per row
pub fn render_text(width: u16, height: u16, draw: impl FnOnce(&mut Frame)) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("test terminal");
    terminal.draw(draw).expect("draw");
    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}
