// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard input, timer ticks, finished backend calls)
// - Rendering the UI

pub mod app;
pub mod clipboard;
pub mod components;
pub mod events;
pub mod layout;
pub mod modal;
pub mod task;
pub mod traits;
pub mod views;

#[cfg(test)]
pub(crate) mod testing;

use crate::client::Endpoint;
use crate::config::Config;
use crate::logging::LogBuffer;
use anyhow::{Context, Result};
use app::App;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use events::Message;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

/// Run the TUI
///
/// Sets up the terminal, starts the connection handshake, runs the event
/// loop and restores the terminal when done.
pub async fn run_tui(config: Config, endpoint: Endpoint, log_buffer: LogBuffer) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let tick = Duration::from_millis(config.ui.tick_ms);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = App::new(config, endpoint, log_buffer, tx);
    app.connect();

    let result = run_event_loop(&mut terminal, &mut app, &mut rx, tick).await;

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// This loop handles three types of events:
/// 1. Keyboard/mouse input
/// 2. Timer ticks (spinners, toast expiry)
/// 3. Finished backend calls, routed to the view that issued them
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    rx: &mut mpsc::UnboundedReceiver<Message>,
    tick: Duration,
) -> Result<()> {
    let mut tick_interval = tokio::time::interval(tick);

    loop {
        terminal
            .draw(|f| views::draw(f, app))
            .context("Failed to draw terminal")?;

        tokio::select! {
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key_event)) => app.handle_key(key_event),
                        Ok(Event::Mouse(mouse_event)) => handle_mouse_event(app, mouse_event),
                        _ => {}
                    }
                }
            } => {}

            _ = tick_interval.tick() => {
                app.tick();
            }

            Some(msg) = rx.recv() => {
                app.update(msg);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Mouse wheel scrolls like the arrow keys
fn handle_mouse_event(app: &mut App, mouse_event: MouseEvent) {
    let code = match mouse_event.kind {
        MouseEventKind::ScrollUp => KeyCode::Up,
        MouseEventKind::ScrollDown => KeyCode::Down,
        _ => return,
    };
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
}
