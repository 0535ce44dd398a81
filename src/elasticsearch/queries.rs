//! POI query bodies and the storage trait impls for [`EsClient`].
//!
//! Documents are expected to carry the flat POI fields plus the indexed
//! rectangle as `min_lat`, `min_lon`, `max_lat` and `max_lon` (equal pairs
//! for a point) and a `country` keyword. Text search covers the same fields
//! as [`crate::store::MemoryStore`]; they should share one analyzer so
//! `cross_fields` treats them as a single blended field.
//!
//! Elasticsearch rejects any search whose `from + size` passes the index's
//! `max_result_window`. Such windows can only be empty pages, so they are
//! answered locally without a request.

use serde_json::{json, Value};
use tracing::debug;

use super::EsClient;
use crate::error::{PoiError, Result};
use crate::models::{BoundingBox, Poi};
use crate::pagination::PageWindow;
use crate::store::{PoiStore, SpatialIndex, TextIndex};

/// Strict rectangle containment, paged in `_doc` order
fn spatial_query(bbox: &BoundingBox, window: PageWindow) -> Value {
    json!({
        "query": {
            "bool": {
                "filter": [
                    { "range": { "min_lat": { "gt": bbox.min_lat } } },
                    { "range": { "min_lon": { "gt": bbox.min_lon } } },
                    { "range": { "max_lat": { "lt": bbox.max_lat } } },
                    { "range": { "max_lon": { "lt": bbox.max_lon } } }
                ]
            }
        },
        "sort": ["_doc"],
        "from": window.offset,
        "size": window.limit
    })
}

/// Fields searched by `text_query`
const TEXT_FIELDS: [&str; 5] = ["name", "main_category", "address", "locality", "region"];

/// Every term must appear in at least one text field, optionally pinned to a
/// country
fn text_query(query: &str, country: Option<&str>, window: PageWindow) -> Value {
    let mut bool_query = json!({
        "must": {
            "multi_match": {
                "query": query,
                "fields": TEXT_FIELDS,
                "type": "cross_fields",
                "operator": "and"
            }
        }
    });

    if let Some(country) = country {
        bool_query["filter"] = json!([{
            "term": { "country": country }
        }]);
    }

    json!({
        "query": { "bool": bool_query },
        "from": window.offset,
        "size": window.limit
    })
}

/// Decode `hits.hits[]._source`. A document that does not decode is an error.
pub(super) fn parse_hits(body: &Value) -> Result<Vec<Poi>> {
    let Some(hits) = body["hits"]["hits"].as_array() else {
        return Err(PoiError::storage("search response has no hits array"));
    };

    hits.iter()
        .map(|hit| {
            serde_json::from_value(hit["_source"].clone())
                .map_err(|e| PoiError::storage(format!("undecodable POI document: {}", e)))
        })
        .collect()
}

/// Whether `window` reaches past the deepest result the index will serve
fn beyond_result_window(window: PageWindow, max_result_window: u64) -> bool {
    window.offset.saturating_add(u64::from(window.limit)) > max_result_window
}

impl SpatialIndex for EsClient {
    async fn within(&self, bbox: &BoundingBox, window: PageWindow) -> Result<Vec<Poi>> {
        if beyond_result_window(window, self.max_result_window) {
            debug!("Window {:?} past max_result_window, empty page", window);
            return Ok(Vec::new());
        }
        self.search_documents(spatial_query(bbox, window)).await
    }
}

impl TextIndex for EsClient {
    async fn matching(
        &self,
        query: &str,
        country: Option<&str>,
        window: PageWindow,
    ) -> Result<Vec<Poi>> {
        if beyond_result_window(window, self.max_result_window) {
            debug!("Window {:?} past max_result_window, empty page", window);
            return Ok(Vec::new());
        }
        self.search_documents(text_query(query, country, window)).await
    }
}

impl PoiStore for EsClient {
    async fn get(&self, id: &str) -> Result<Option<Poi>> {
        self.fetch_document(id).await
    }
}
