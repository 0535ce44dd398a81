//! Storage contracts consumed by the query planners.
//!
//! The planners only ever issue read-only queries through these traits. A
//! backend handle is passed into each planner call, so several backends (or
//! several test fixtures) can be used side by side.

mod memory;

use std::future::Future;

use crate::error::Result;
use crate::models::{BoundingBox, Poi};
use crate::pagination::PageWindow;

pub use memory::MemoryStore;

/// Range queries over indexed POI rectangles.
pub trait SpatialIndex: Send + Sync {
    /// POIs whose indexed rectangle lies strictly inside `bbox`, in index
    /// order, restricted to `window`.
    fn within(
        &self,
        bbox: &BoundingBox,
        window: PageWindow,
    ) -> impl Future<Output = Result<Vec<Poi>>> + Send;
}

/// Full-text match queries joined with a country filter.
pub trait TextIndex: Send + Sync {
    /// POIs whose indexed text matches `query`, optionally restricted to
    /// `country`, in the index's own relevance order, restricted to `window`.
    fn matching(
        &self,
        query: &str,
        country: Option<&str>,
        window: PageWindow,
    ) -> impl Future<Output = Result<Vec<Poi>>> + Send;
}

/// Single-record lookup.
pub trait PoiStore: Send + Sync {
    /// Fetch a POI by identifier; `None` when no record exists.
    fn get(&self, id: &str) -> impl Future<Output = Result<Option<Poi>>> + Send;
}
