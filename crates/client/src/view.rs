//! Display helpers shared by presentation adapters.

use std::time::Instant;

use chrono::{DateTime, Utc};

use stockmesh_inventory::PageResult;

use crate::render::Notice;

/// State of the previous/next controls for a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationControls {
    pub visible: bool,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub label: String,
}

impl PaginationControls {
    /// Controls are only shown when there is more than one page.
    pub fn for_page(page: &PageResult) -> Self {
        Self {
            visible: page.total_pages > 1,
            prev_enabled: page.page > 1,
            next_enabled: page.page < page.total_pages,
            label: format!("Page {} of {}", page.page, page.total_pages),
        }
    }
}

/// "1 item", "42 items". Uses the server total, or the page length when the
/// server sent none.
pub fn item_count_label(page: &PageResult) -> String {
    let total = if page.total_count > 0 {
        page.total_count
    } else {
        page.items.len() as u64
    };
    let plural = if total == 1 { "" } else { "s" };
    format!("{total} item{plural}")
}

/// e.g. `Jan 5, 2024, 02:30 PM`
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%b %-d, %Y, %I:%M %p").to_string()
}

/// The notice currently on screen, dismissed once its `ttl` has passed.
#[derive(Debug, Default)]
pub struct NoticeSlot {
    current: Option<(Notice, Instant)>,
}

impl NoticeSlot {
    /// Replace whatever was showing.
    pub fn show(&mut self, notice: Notice, now: Instant) {
        self.current = Some((notice, now));
    }

    pub fn current(&self, now: Instant) -> Option<&Notice> {
        self.current
            .as_ref()
            .filter(|(notice, shown_at)| now.saturating_duration_since(*shown_at) < notice.ttl)
            .map(|(notice, _)| notice)
    }
}
