// Components module - UI building blocks
//
// Forum views (stateful, talk to the backend through a Remote):
// - Create post: the create form
// - All posts: the list, owning one post detail per identifier
// - Post detail: one post, with edit/delete
// - Edit post: the edit form embedded in a post detail
//
// Widgets shared by the forms:
// - Post form / text field
//
// Shell components rendered around the views:
// - Title bar, status bar, logs panel, toast

pub mod all_posts;
pub mod create_post;
pub mod edit_post;
pub mod logs_panel;
pub mod post_detail;
pub mod post_form;
pub mod status_bar;
pub mod text_field;
pub mod title_bar;
pub mod toast;

pub use all_posts::AllPosts;
pub use create_post::CreatePost;
pub use logs_panel::LogsPanel;
pub use toast::Toast;

use crate::tui::app::App;
use ratatui::{layout::Rect, Frame};

/// Render the title bar (convenience wrapper)
pub fn render_title(f: &mut Frame, area: Rect, app: &App) {
    title_bar::render(f, area, app);
}

/// Render the status bar (convenience wrapper)
pub fn render_status(f: &mut Frame, area: Rect, app: &App) {
    status_bar::render(f, area, app);
}
