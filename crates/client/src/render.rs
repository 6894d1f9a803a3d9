//! Presentation capability implemented outside the core.

use std::time::Duration;

use stockmesh_inventory::PageResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Warning,
}

/// A transient status message. The adapter dismisses it after `ttl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub ttl: Duration,
}

/// What the client needs from a presentation adapter.
///
/// Calls arrive from inside operation cycles and must not block on IO other
/// than the user's answer in [`Renderer::confirm`].
pub trait Renderer: Send + Sync {
    /// Replace the visible list with a non-empty page.
    fn render_page(&self, page: &PageResult);

    /// Show the "no items" view; pagination controls are hidden.
    fn render_empty(&self);

    /// Replace the loading indicator with an error view.
    fn render_error(&self, message: &str);

    /// Show the loading indicator in place of the list.
    fn show_loading(&self);

    fn show_notice(&self, notice: &Notice);

    /// Clear the "add item" form after a successful create.
    fn reset_form(&self);

    /// Ask the user a yes/no question.
    fn confirm(&self, prompt: &str) -> bool;
}
