//! System clipboard access (`arboard`)
//!
//! A fresh handle per copy; nothing is held between presses of `y`.

use anyhow::{Context, Result};
use arboard::Clipboard;

/// Put `text` on the system clipboard
///
/// Fails on headless Linux (no display server) and similar environments.
pub fn set_text(text: &str) -> Result<()> {
    Clipboard::new()
        .context("Failed to access clipboard")?
        .set_text(text)
        .context("Failed to set clipboard text")?;
    tracing::debug!("copied {} chars to clipboard", text.chars().count());
    Ok(())
}
