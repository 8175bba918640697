// Messages and events flowing through the TUI
//
// Two directions, two types:
// - Message: the result of a finished backend call, delivered by the event
//   loop back to the view that issued it. Nested enums mirror the view
//   hierarchy (shell → list → detail → edit form), so routing is a match.
// - ForumEvent: a one-shot upward signal from a child view to its ancestors
//   ("a post was created/updated/deleted", "editing was canceled"). Views
//   return these from update()/handle_key(); the nearest interested ancestor
//   reacts to them.

use crate::client::{AppClient, CallError};
use crate::posts::{ActionHash, Record};
use std::sync::Arc;

/// Stable identity of a detail view inside the list
///
/// Detail views are keyed by post identifier, but the backend may return the
/// same identifier twice; results are routed by view id instead.
pub type ViewId = u64;

/// Result of a finished call, addressed to the view that issued it
#[derive(Debug)]
pub enum Message {
    /// Connection handshake finished
    Connected(Result<Arc<dyn AppClient>, CallError>),
    /// For the post list (or one of its detail views)
    List(ListMsg),
    /// For the create form
    Create(CreateMsg),
}

#[derive(Debug)]
pub enum ListMsg {
    /// `get_all_posts` finished
    Fetched {
        generation: u64,
        result: Result<Vec<ActionHash>, CallError>,
    },
    /// For one detail view
    Detail { view: ViewId, msg: DetailMsg },
}

#[derive(Debug)]
pub enum DetailMsg {
    /// `get_post` finished
    Fetched {
        generation: u64,
        result: Result<Option<Record>, CallError>,
    },
    /// `delete_post` finished
    Deleted {
        generation: u64,
        result: Result<(), CallError>,
    },
    /// For the embedded edit form; `session` names the edit it was issued from
    Edit { session: u64, msg: EditMsg },
}

#[derive(Debug)]
pub enum EditMsg {
    /// `update_post` finished
    Updated(Result<Record, CallError>),
}

#[derive(Debug)]
pub enum CreateMsg {
    /// `create_post` finished
    Created(Result<Record, CallError>),
}

/// Upward signal from a child view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForumEvent {
    PostCreated {
        post_hash: ActionHash,
    },
    PostUpdated {
        original_post_hash: ActionHash,
        previous_post_hash: ActionHash,
        updated_post_hash: ActionHash,
    },
    PostDeleted {
        post_hash: ActionHash,
    },
    EditCanceled,
}

impl ForumEvent {
    /// Toast text shown by the shell, if any
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            ForumEvent::PostCreated { .. } => Some("✓ Post created"),
            ForumEvent::PostUpdated { .. } => Some("✓ Post updated"),
            ForumEvent::PostDeleted { .. } => Some("✓ Post deleted"),
            ForumEvent::EditCanceled => None,
        }
    }
}
