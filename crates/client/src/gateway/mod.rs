//! The seam between the client and the inventory backend.

use async_trait::async_trait;
use uuid::Uuid;

use stockmesh_inventory::{Item, ItemId, ListQuery, NewItem, PageResult};

use crate::error::GatewayError;

pub mod http;
pub mod in_memory;

pub use http::HttpGateway;
pub use in_memory::InMemoryGateway;

/// Passthrough marker carried by every request. Nothing branches on it.
pub const MESH_HEADER: &str = "x-service-mesh";
pub const MESH_HEADER_VALUE: &str = "true";

/// Per-request correlation id, set to the operation cycle's id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Backend operations used by the client.
///
/// `request_id` identifies the operation cycle the call belongs to; a create
/// or delete and the reload that follows it share one id.
#[async_trait]
pub trait InventoryGateway: Send + Sync {
    /// `GET /inventory`
    async fn list(&self, request_id: Uuid, query: &ListQuery) -> Result<PageResult, GatewayError>;

    /// `POST /inventory`
    ///
    /// `Ok(None)` means the server accepted the item but did not send it back
    /// in a readable form.
    async fn create(&self, request_id: Uuid, item: &NewItem) -> Result<Option<Item>, GatewayError>;

    /// `DELETE /inventory/{id}`
    async fn delete(&self, request_id: Uuid, id: &ItemId) -> Result<(), GatewayError>;
}

#[async_trait]
impl<G: InventoryGateway + ?Sized> InventoryGateway for std::sync::Arc<G> {
    async fn list(&self, request_id: Uuid, query: &ListQuery) -> Result<PageResult, GatewayError> {
        (**self).list(request_id, query).await
    }

    async fn create(&self, request_id: Uuid, item: &NewItem) -> Result<Option<Item>, GatewayError> {
        (**self).create(request_id, item).await
    }

    async fn delete(&self, request_id: Uuid, id: &ItemId) -> Result<(), GatewayError> {
        (**self).delete(request_id, id).await
    }
}
