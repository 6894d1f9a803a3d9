//! The inventory client: guarded operation cycles over a gateway.
//!
//! Every entry point goes through one gate. While a cycle is in flight, any
//! other trigger (user action or refresh tick) is dropped, not queued. A
//! create or delete reloads the list inside its own cycle, so the reload can
//! never be dropped by the gate it holds.

use std::time::Duration;

use tracing::Instrument;

use stockmesh_inventory::{ItemDraft, ItemId, ListQuery, validate};

use crate::config::ClientConfig;
use crate::gateway::InventoryGateway;
use crate::render::{Notice, NoticeKind, Renderer};
use crate::state::{Begin, ClientState, CycleGuard, StateCell};

const CREATED: &str = "Item added successfully!";
const CREATE_FAILED: &str = "Failed to add item";
const CREATE_UNREACHABLE: &str = "Network error. Check service mesh connectivity.";
const DELETE_FAILED: &str = "Failed to delete item";
const DELETE_UNREACHABLE: &str = "Network error during deletion";
const LIST_FAILED: &str = "Failed to load inventory";
const LIST_UNREACHABLE: &str = "Failed to load inventory through the service mesh";
const EDIT_PLACEHOLDER: &str = "Edit functionality coming soon!";

/// How an operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Completed,
    /// The gateway call failed; the failure has been shown to the user.
    Failed,
    /// Dropped: another cycle was in flight.
    Busy,
    /// The form did not validate; nothing was sent.
    Invalid,
    /// The user declined the confirmation prompt.
    Declined,
    /// The page step would leave `[1, total_pages]`.
    OutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStep {
    Previous,
    Next,
}

pub struct InventoryClient<G, R> {
    gateway: G,
    renderer: R,
    state: StateCell,
    notice_ttl: Duration,
}

impl<G, R> InventoryClient<G, R>
where
    G: InventoryGateway,
    R: Renderer,
{
    pub fn new(gateway: G, renderer: R, config: &ClientConfig) -> Self {
        Self {
            gateway,
            renderer,
            state: StateCell::default(),
            notice_ttl: config.notice_ttl,
        }
    }

    pub fn state(&self) -> ClientState {
        self.state.snapshot()
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Fetch the current page. `interactive` shows the loading indicator and,
    /// on failure, an error view; a silent load keeps whatever is on screen.
    pub async fn load_list(&self, interactive: bool) -> CycleOutcome {
        let cycle = match self.state.begin(|_| true) {
            Begin::Started(cycle) => cycle,
            _ => return self.dropped("load_list"),
        };
        let span = tracing::info_span!("cycle", op = "load_list", cycle_id = %cycle.cycle_id());
        self.fetch_and_render(&cycle, interactive).instrument(span).await
    }

    /// Filter by `term` (blank clears the filter) starting from page 1.
    pub async fn search(&self, term: &str) -> CycleOutcome {
        let term = term.trim();
        let cycle = match self.state.begin(|s| {
            s.search_term = (!term.is_empty()).then(|| term.to_string());
            s.current_page = 1;
            true
        }) {
            Begin::Started(cycle) => cycle,
            _ => return self.dropped("search"),
        };
        let span = tracing::info_span!("cycle", op = "search", cycle_id = %cycle.cycle_id());
        self.fetch_and_render(&cycle, true).instrument(span).await
    }

    /// Clear the filter and go back to page 1.
    pub async fn refresh(&self) -> CycleOutcome {
        let cycle = match self.state.begin(|s| {
            s.search_term = None;
            s.current_page = 1;
            true
        }) {
            Begin::Started(cycle) => cycle,
            _ => return self.dropped("refresh"),
        };
        let span = tracing::info_span!("cycle", op = "refresh", cycle_id = %cycle.cycle_id());
        self.fetch_and_render(&cycle, true).instrument(span).await
    }

    /// Move one page back or forward. Out-of-range steps change nothing.
    pub async fn go_to_page(&self, step: PageStep) -> CycleOutcome {
        let cycle = match self.state.begin(|s| {
            let target = match step {
                PageStep::Previous => s.current_page.saturating_sub(1),
                PageStep::Next => s.current_page.saturating_add(1),
            };
            if target < 1 || target > s.total_pages {
                return false;
            }
            s.current_page = target;
            true
        }) {
            Begin::Started(cycle) => cycle,
            Begin::Busy => return self.dropped("go_to_page"),
            Begin::Refused => {
                tracing::debug!(?step, "page step out of range");
                return CycleOutcome::OutOfRange;
            }
        };
        let span = tracing::info_span!("cycle", op = "go_to_page", cycle_id = %cycle.cycle_id());
        self.fetch_and_render(&cycle, true).instrument(span).await
    }

    /// Called by the background timer.
    pub async fn periodic_refresh(&self) -> CycleOutcome {
        self.load_list(false).await
    }

    /// Validate and submit the "add item" form, then reload the list.
    pub async fn submit_create(&self, draft: &ItemDraft) -> CycleOutcome {
        let cycle = match self.state.begin(|_| true) {
            Begin::Started(cycle) => cycle,
            _ => return self.dropped("submit_create"),
        };

        let item = match validate(draft) {
            Ok(item) => item,
            Err(err) => {
                tracing::debug!(error = %err, "create form rejected");
                self.notify(NoticeKind::Error, err.to_string());
                return CycleOutcome::Invalid;
            }
        };

        let span = tracing::info_span!("cycle", op = "create", cycle_id = %cycle.cycle_id());
        async {
            match self.gateway.create(cycle.cycle_id(), &item).await {
                Ok(created) => {
                    match &created {
                        Some(created) => tracing::info!(code = %created.code, id = %created.id, "item created"),
                        None => tracing::info!(code = %item.code, "item created; no item in response"),
                    }
                    self.notify(NoticeKind::Success, CREATED);
                    self.renderer.reset_form();
                    self.fetch_and_render(&cycle, true).await;
                    CycleOutcome::Completed
                }
                Err(err) => {
                    tracing::warn!(error = %err, code = %item.code, "create failed");
                    self.notify(
                        NoticeKind::Error,
                        err.user_message(CREATE_FAILED, CREATE_UNREACHABLE),
                    );
                    CycleOutcome::Failed
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Delete after explicit confirmation, then reload the list.
    ///
    /// On failure the rendered list is left exactly as it was.
    pub async fn delete_item(&self, id: &ItemId, display_code: &str) -> CycleOutcome {
        let prompt = format!("Are you sure you want to delete item \"{display_code}\"?");
        if !self.renderer.confirm(&prompt) {
            return CycleOutcome::Declined;
        }

        let cycle = match self.state.begin(|_| true) {
            Begin::Started(cycle) => cycle,
            _ => return self.dropped("delete_item"),
        };

        let span = tracing::info_span!("cycle", op = "delete", cycle_id = %cycle.cycle_id(), %id);
        async {
            match self.gateway.delete(cycle.cycle_id(), id).await {
                Ok(()) => {
                    tracing::info!(code = display_code, "item deleted");
                    self.notify(
                        NoticeKind::Success,
                        format!("Item \"{display_code}\" deleted successfully!"),
                    );
                    self.fetch_and_render(&cycle, true).await;
                    CycleOutcome::Completed
                }
                Err(err) => {
                    tracing::warn!(error = %err, "delete failed");
                    self.notify(
                        NoticeKind::Error,
                        err.user_message(DELETE_FAILED, DELETE_UNREACHABLE),
                    );
                    CycleOutcome::Failed
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Editing is not supported; shows a placeholder notice.
    pub fn edit_item(&self, id: &ItemId) {
        tracing::debug!(%id, "edit requested");
        self.notify(NoticeKind::Warning, EDIT_PLACEHOLDER);
    }

    /// The list request shared by every cycle. Requires an open cycle.
    async fn fetch_and_render(&self, cycle: &CycleGuard<'_>, interactive: bool) -> CycleOutcome {
        if interactive {
            self.renderer.show_loading();
        }

        let query = self
            .state
            .update(|s| ListQuery::new(s.current_page, s.search_term.as_deref()));

        match self.gateway.list(cycle.cycle_id(), &query).await {
            Ok(page) => {
                // The server's page numbers win over what we asked for.
                self.state.update(|s| {
                    s.current_page = page.page;
                    s.total_pages = page.total_pages;
                });
                tracing::info!(
                    page = page.page,
                    total_pages = page.total_pages,
                    items = page.items.len(),
                    "inventory loaded"
                );
                if page.is_empty() {
                    self.renderer.render_empty();
                } else {
                    self.renderer.render_page(&page);
                }
                CycleOutcome::Completed
            }
            Err(err) => {
                tracing::warn!(error = %err, interactive, "failed to load inventory");
                if interactive {
                    self.renderer
                        .render_error(&err.user_message(LIST_FAILED, LIST_UNREACHABLE));
                }
                CycleOutcome::Failed
            }
        }
    }

    fn notify(&self, kind: NoticeKind, message: impl Into<String>) {
        self.renderer.show_notice(&Notice {
            kind,
            message: message.into(),
            ttl: self.notice_ttl,
        });
    }

    fn dropped(&self, op: &'static str) -> CycleOutcome {
        tracing::debug!(op, "cycle already in flight; dropping trigger");
        CycleOutcome::Busy
    }
}
