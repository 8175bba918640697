// Demo mode: an in-memory conductor seeded with a few posts
//
// Lets the TUI run without a conductor. Every call is delayed a little so the
// pending states (spinners, disabled buttons) are visible.
//
// Run with: FORUM_DEMO=1 cargo run --release   (or: forum --demo)

use crate::client::{Endpoint, MemoryConductor};
use crate::posts::Post;
use std::time::Duration;

/// Artificial latency per call
const DEMO_LATENCY: Duration = Duration::from_millis(350);

fn demo_posts() -> Vec<Post> {
    vec![
        Post::new(
            "Welcome to the forum",
            "This is a demo backend running in-process. Posts live only as long as the app does.",
        ),
        Post::new(
            "Keyboard basics",
            "Tab moves between the create form and the list. Ctrl+S submits, e edits, d deletes.",
        ),
        Post::new(
            "Concurrent edits",
            "Updates name the version they were made from. Editing a post that changed in the meantime is rejected.",
        ),
        Post::new("Empty content is fine when editing", ""),
    ]
}

/// The seeded demo backend
pub fn conductor() -> MemoryConductor {
    let conductor = MemoryConductor::new().with_latency(DEMO_LATENCY);
    let hashes = conductor.seed(&demo_posts());
    tracing::info!("demo backend seeded with {} posts", hashes.len());
    conductor
}

pub fn endpoint() -> Endpoint {
    Endpoint::InMemory(conductor())
}
