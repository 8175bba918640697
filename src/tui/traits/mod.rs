//! Component trait system for the forum TUI
//!
//! Views declare their own capabilities through traits instead of the App
//! knowing how to render or drive each of them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         App                                 │
//! │  (connection, focus, modal, toast; routes keys & messages)  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!              ┌───────────────┴───────────────┐
//!              ▼                               ▼
//!        ┌────────────┐                 ┌────────────┐
//!        │ CreatePost │                 │  AllPosts  │
//!        └────────────┘                 └────────────┘
//!                                              │ one per post
//!                                              ▼
//!                                       ┌────────────┐
//!                                       │ PostDetail │
//!                                       └────────────┘
//!                                              │ while editing
//!                                              ▼
//!                                       ┌────────────┐
//!                                       │  EditPost  │
//!                                       └────────────┘
//! ```
//!
//! # Traits Overview
//!
//! - [`Component`] - Base trait: render + identity
//! - [`Interactive`] - Components that handle keyboard input; may emit a
//!   [`ForumEvent`](crate::tui::events::ForumEvent) upward
//! - [`Copyable`] - Components that provide clipboard content

mod component;
mod copyable;
mod interactive;

pub use component::{Component, ComponentId, RenderContext};
pub use copyable::{copy_from, CopyResult, Copyable};
pub use interactive::{Handled, Interactive};
