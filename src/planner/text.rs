//! Text search within a country.

use tracing::debug;

use crate::error::{PoiError, Result};
use crate::models::Poi;
use crate::pagination::{resolve_page, DEFAULT_PAGE_SIZE};
use crate::store::TextIndex;

/// Text search parameters
#[derive(Debug, Clone)]
pub struct TextSearchParams {
    pub query: String,
    /// Exact country value to filter on; `None` or empty matches all
    pub country: Option<String>,
    pub page: i64,
    pub page_size: u32,
}

impl TextSearchParams {
    pub fn new(query: impl Into<String>, country: Option<String>, page: i64) -> Self {
        Self {
            query: query.into(),
            country,
            page,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Search POIs by text, filtered to a country.
///
/// Ordering is whatever the text index reports; results are only filtered
/// and paged, never re-ranked.
pub async fn search_by_text<T: TextIndex>(
    index: &T,
    params: &TextSearchParams,
) -> Result<Vec<Poi>> {
    let query = params.query.trim();
    if query.is_empty() {
        return Err(PoiError::invalid("search query must not be empty"));
    }

    let country = params
        .country
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());
    let window = resolve_page(params.page, params.page_size);

    debug!(
        "Text query {:?} country={:?} window={:?}",
        query, country, window
    );

    let results = index.matching(query, country, window).await?;

    debug!("Text query returned {} results", results.len());
    Ok(results)
}
