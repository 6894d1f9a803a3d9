//! REST gateway over `reqwest`.

use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use uuid::Uuid;

use stockmesh_inventory::{Item, ItemId, ListQuery, ListResponse, NewItem, PageResult};

use super::{InventoryGateway, MESH_HEADER, MESH_HEADER_VALUE, REQUEST_ID_HEADER};
use crate::config::ClientConfig;
use crate::error::GatewayError;

/// Error body returned by the backend on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Gateway that talks to the inventory REST API.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    api_root: Url,
}

impl HttpGateway {
    pub fn new(config: &ClientConfig) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::new();
        headers.insert(MESH_HEADER, HeaderValue::from_static(MESH_HEADER_VALUE));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(transport)?;

        let api_root = Url::parse(config.api_root.trim_end_matches('/'))
            .map_err(|e| GatewayError::InvalidRequest(format!("API root {:?}: {e}", config.api_root)))?;
        if api_root.cannot_be_a_base() {
            return Err(GatewayError::InvalidRequest(format!(
                "API root {:?} cannot take a path",
                config.api_root
            )));
        }

        Ok(Self { client, api_root })
    }

    pub fn api_root(&self) -> &str {
        self.api_root.as_str()
    }

    /// The API root with `segments` appended, each percent-encoded as a
    /// single path segment.
    fn url(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(GatewayError::InvalidRequest(format!("unusable path segment {bad:?}")));
        }
        let mut url = self.api_root.clone();
        url.path_segments_mut()
            .map_err(|()| GatewayError::InvalidRequest(format!("API root {} cannot take a path", self.api_root)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Pass 2xx responses through; turn anything else into `GatewayError::Api`.
    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let message = resp
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error)
            .filter(|m| !m.trim().is_empty());

        tracing::debug!(status = status.as_u16(), ?message, "inventory API returned an error");

        Err(GatewayError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

fn transport(err: reqwest::Error) -> GatewayError {
    GatewayError::Transport(err.to_string())
}

#[async_trait]
impl InventoryGateway for HttpGateway {
    async fn list(&self, request_id: Uuid, query: &ListQuery) -> Result<PageResult, GatewayError> {
        let resp = self
            .client
            .get(self.url(&["inventory"])?)
            .query(&query.to_pairs())
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .send()
            .await
            .map_err(transport)?;

        let body: ListResponse = Self::check(resp).await?.json().await.map_err(transport)?;
        Ok(body.into())
    }

    async fn create(&self, request_id: Uuid, item: &NewItem) -> Result<Option<Item>, GatewayError> {
        let resp = self
            .client
            .post(self.url(&["inventory"])?)
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .json(item)
            .send()
            .await
            .map_err(transport)?;

        match Self::check(resp).await?.json::<Item>().await {
            Ok(created) => Ok(Some(created)),
            Err(e) => {
                tracing::warn!(error = %e, "item accepted but the response body is not an item");
                Ok(None)
            }
        }
    }

    async fn delete(&self, request_id: Uuid, id: &ItemId) -> Result<(), GatewayError> {
        let resp = self
            .client
            .delete(self.url(&["inventory", id.as_str()])?)
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .send()
            .await
            .map_err(transport)?;

        Self::check(resp).await?;
        Ok(())
    }
}
