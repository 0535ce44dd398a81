//! Elasticsearch connection and raw document access.

use std::time::Duration;

use elasticsearch::{
    cluster::ClusterHealthParts,
    http::response::Response,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    CountParts, Elasticsearch, GetParts, SearchParts,
};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::DEFAULT_MAX_RESULT_WINDOW;
use crate::error::{PoiError, Result};
use crate::models::Poi;

/// Read-only handle on one POI index.
///
/// Cheap to clone; every clone shares the same connection pool.
#[derive(Clone)]
pub struct EsClient {
    client: Elasticsearch,
    pub index_name: String,
    /// Deepest `from + size` the index will serve; pages past it are empty
    pub max_result_window: u64,
}

impl EsClient {
    /// Connect to a single node. `timeout` bounds every request; the query
    /// core itself never retries or times out.
    pub fn new(es_url: &str, index_name: &str, timeout: Duration) -> anyhow::Result<Self> {
        let url = Url::parse(es_url)?;
        let conn_pool = SingleNodeConnectionPool::new(url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client: Elasticsearch::new(transport),
            index_name: index_name.to_string(),
            max_result_window: DEFAULT_MAX_RESULT_WINDOW,
        })
    }

    /// Match the index's `index.max_result_window` setting
    pub fn with_max_result_window(mut self, max_result_window: u64) -> Self {
        self.max_result_window = max_result_window;
        self
    }

    /// Whether the cluster answers its health endpoint. Failures count as
    /// unhealthy rather than erroring.
    pub async fn health_check(&self) -> bool {
        match self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
        {
            Ok(response) => response.status_code().is_success(),
            Err(e) => {
                warn!("Elasticsearch health check failed: {}", e);
                false
            }
        }
    }

    pub async fn doc_count(&self) -> Result<u64> {
        let response = self
            .client
            .count(CountParts::Index(&[&self.index_name]))
            .send()
            .await?;

        let body = ensure_success(response, "count").await?.json::<Value>().await?;
        Ok(body["count"].as_u64().unwrap_or(0))
    }

    /// Run a search body and decode every hit's `_source` as a POI
    pub async fn search_documents(&self, body: Value) -> Result<Vec<Poi>> {
        debug!("Search query: {}", body);

        let response = self
            .client
            .search(SearchParts::Index(&[&self.index_name]))
            .body(body)
            .send()
            .await?;

        let body = ensure_success(response, "search").await?.json::<Value>().await?;
        super::queries::parse_hits(&body)
    }

    /// Fetch one document by `_id`; `None` on 404
    pub async fn fetch_document(&self, id: &str) -> Result<Option<Poi>> {
        let response = self
            .client
            .get(GetParts::IndexId(&self.index_name, id))
            .send()
            .await?;

        if response.status_code().as_u16() == 404 {
            return Ok(None);
        }

        let body = ensure_success(response, "get").await?.json::<Value>().await?;
        if body["found"].as_bool() == Some(false) {
            return Ok(None);
        }

        serde_json::from_value(body["_source"].clone())
            .map(Some)
            .map_err(|e| PoiError::storage(format!("undecodable POI document {}: {}", id, e)))
    }
}

/// Turn a non-2xx response into `StorageUnavailable`, keeping the body text
async fn ensure_success(response: Response, operation: &str) -> Result<Response> {
    let status = response.status_code();
    if status.is_success() {
        return Ok(response);
    }

    let error_body = response.text().await.unwrap_or_default();
    Err(PoiError::storage(format!(
        "{} failed with status {}: {}",
        operation,
        status.as_u16(),
        error_body
    )))
}
