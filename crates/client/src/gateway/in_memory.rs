//! In-process gateway with the backend's list/create/delete semantics.
//!
//! Used by the test suite and by the console's `memory:` demo mode. Besides
//! storing items it records every call, can fail the next call of a given
//! kind, and can hold a call pending until released.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Notify;
use uuid::Uuid;

use stockmesh_inventory::{Item, ItemId, ListQuery, NewItem, PageResult};

use super::InventoryGateway;
use crate::error::GatewayError;

/// Kind of gateway call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    List,
    Create,
    Delete,
}

/// A recorded gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub op: Op,
    pub request_id: Uuid,
    pub query: Option<ListQuery>,
}

#[derive(Debug, Default)]
struct Store {
    /// `(numeric id, item)`; the numeric id breaks `created_at` ties.
    items: Vec<(u64, Item)>,
    next_id: u64,
}

#[derive(Debug, Default)]
struct Hold {
    armed: AtomicBool,
    arrived: Notify,
    release: Notify,
}

#[derive(Debug, Default)]
pub struct InMemoryGateway {
    store: Mutex<Store>,
    faults: Mutex<VecDeque<(Op, GatewayError)>>,
    calls: Mutex<Vec<Call>>,
    hold: Hold,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item directly, bypassing the call log.
    pub fn seed(&self, item: NewItem) -> Item {
        let mut store = lock(&self.store);
        store.next_id += 1;
        let id = store.next_id;
        let item = Item {
            id: ItemId::from(id),
            code: item.code.to_string(),
            name: item.name,
            quantity: item.quantity,
            created_at: Utc::now(),
        };
        store.items.push((id, item.clone()));
        item
    }

    /// Current items, newest first.
    pub fn items(&self) -> Vec<Item> {
        let store = lock(&self.store);
        let mut items: Vec<_> = store.items.iter().collect();
        items.sort_by(|a, b| (b.1.created_at, b.0).cmp(&(a.1.created_at, a.0)));
        items.into_iter().map(|(_, item)| item.clone()).collect()
    }

    /// Make the next call of kind `op` fail with `err` instead of running.
    pub fn fail_next(&self, op: Op, err: GatewayError) {
        lock(&self.faults).push_back((op, err));
    }

    /// Hold the next call (of any kind) pending until [`Self::release`].
    pub fn hold_next(&self) {
        self.hold.armed.store(true, Ordering::SeqCst);
    }

    /// Resolves once a held call has arrived.
    pub async fn wait_until_held(&self) {
        self.hold.arrived.notified().await;
    }

    pub fn release(&self) {
        self.hold.release.notify_one();
    }

    pub fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    /// Drain the call log.
    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut *lock(&self.calls))
    }

    pub fn call_count(&self, op: Op) -> usize {
        lock(&self.calls).iter().filter(|c| c.op == op).count()
    }

    async fn enter(&self, call: Call) -> Result<(), GatewayError> {
        let op = call.op;
        lock(&self.calls).push(call);

        if self.hold.armed.swap(false, Ordering::SeqCst) {
            self.hold.arrived.notify_one();
            self.hold.release.notified().await;
        }

        let mut faults = lock(&self.faults);
        if let Some(pos) = faults.iter().position(|(o, _)| *o == op) {
            if let Some((_, err)) = faults.remove(pos) {
                return Err(err);
            }
        }
        Ok(())
    }

    fn page(&self, query: &ListQuery) -> PageResult {
        let needle = query.search.as_deref().map(str::to_lowercase);
        let matching: Vec<Item> = self
            .items()
            .into_iter()
            .filter(|item| match &needle {
                Some(n) => item.code.to_lowercase().contains(n) || item.name.to_lowercase().contains(n),
                None => true,
            })
            .collect();

        let per_page = query.per_page() as usize;
        let total = matching.len();
        let pages = total.div_ceil(per_page);
        let offset = (query.page as usize).saturating_sub(1) * per_page;
        let items = matching.into_iter().skip(offset).take(per_page).collect();

        PageResult {
            items,
            page: query.page,
            total_pages: (pages as u32).max(1),
            total_count: total as u64,
        }
    }
}

#[async_trait]
impl InventoryGateway for InMemoryGateway {
    async fn list(&self, request_id: Uuid, query: &ListQuery) -> Result<PageResult, GatewayError> {
        self.enter(Call {
            op: Op::List,
            request_id,
            query: Some(query.clone()),
        })
        .await?;
        Ok(self.page(query))
    }

    async fn create(&self, request_id: Uuid, item: &NewItem) -> Result<Option<Item>, GatewayError> {
        self.enter(Call {
            op: Op::Create,
            request_id,
            query: None,
        })
        .await?;

        let exists = lock(&self.store)
            .items
            .iter()
            .any(|(_, existing)| existing.code == item.code.as_str());
        if exists {
            return Err(GatewayError::api(
                409,
                format!("Item with code {} already exists", item.code),
            ));
        }
        Ok(Some(self.seed(item.clone())))
    }

    async fn delete(&self, request_id: Uuid, id: &ItemId) -> Result<(), GatewayError> {
        self.enter(Call {
            op: Op::Delete,
            request_id,
            query: None,
        })
        .await?;

        let mut store = lock(&self.store);
        let before = store.items.len();
        store.items.retain(|(_, item)| &item.id != id);
        if store.items.len() == before {
            return Err(GatewayError::api(404, "Not found"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockmesh_inventory::{ItemDraft, validate};

    fn new_item(code: &str, name: &str) -> NewItem {
        validate(&ItemDraft::from_form(code, name, "1")).unwrap()
    }

    #[tokio::test]
    async fn list_filters_by_code_or_name_case_insensitively() {
        let gw = InMemoryGateway::new();
        gw.seed(new_item("AB1234", "Widget"));
        gw.seed(new_item("CD5678", "Gadget abacus"));
        gw.seed(new_item("EF9012", "Sprocket"));

        let page = gw
            .list(Uuid::now_v7(), &ListQuery::new(1, Some("ab")))
            .await
            .unwrap();
        let codes: Vec<_> = page.items.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, vec!["CD5678", "AB1234"]);
        assert_eq!(page.total_count, 2);
        assert_eq!(page.total_pages, 1);
    }

    #[tokio::test]
    async fn list_paginates_newest_first() {
        let gw = InMemoryGateway::new();
        for n in 0..45 {
            gw.seed(new_item(&format!("A{n:05}"), "Bulk"));
        }

        let first = gw.list(Uuid::now_v7(), &ListQuery::new(1, None)).await.unwrap();
        assert_eq!(first.items.len(), 20);
        assert_eq!(first.items[0].code, "A00044");
        assert_eq!(first.total_pages, 3);

        let last = gw.list(Uuid::now_v7(), &ListQuery::new(3, None)).await.unwrap();
        assert_eq!(last.items.len(), 5);
        assert_eq!(last.page, 3);
        assert_eq!(last.items[4].code, "A00000");
    }

    #[tokio::test]
    async fn create_rejects_duplicate_code() {
        let gw = InMemoryGateway::new();
        gw.create(Uuid::now_v7(), &new_item("AB1234", "Widget")).await.unwrap();
        let err = gw
            .create(Uuid::now_v7(), &new_item("AB1234", "Other"))
            .await
            .unwrap_err();
        assert_eq!(err, GatewayError::api(409, "Item with code AB1234 already exists"));
        assert_eq!(gw.items().len(), 1);
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found() {
        let gw = InMemoryGateway::new();
        let err = gw.delete(Uuid::now_v7(), &ItemId::new("99")).await.unwrap_err();
        assert_eq!(err, GatewayError::api(404, "Not found"));
    }

    #[tokio::test]
    async fn injected_fault_applies_once_to_matching_op() {
        let gw = InMemoryGateway::new();
        gw.fail_next(Op::Delete, GatewayError::transport("boom"));

        // Other kinds are unaffected.
        assert!(gw.list(Uuid::now_v7(), &ListQuery::new(1, None)).await.is_ok());

        let id = gw.seed(new_item("AB1234", "Widget")).id;
        assert!(gw.delete(Uuid::now_v7(), &id).await.is_err());
        assert!(gw.delete(Uuid::now_v7(), &id).await.is_ok());
        assert_eq!(gw.call_count(Op::Delete), 2);
    }
}
