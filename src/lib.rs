//! Poi Polloi - nearby and text search over a static POI collection
//!
//! This library provides the geo math, paging and query planners used by
//! the query server, plus the storage backends they run against.

pub mod config;
pub mod elasticsearch;
pub mod error;
pub mod geo;
pub mod models;
pub mod pagination;
pub mod planner;
pub mod store;

pub use error::{PoiError, Result};
pub use models::{BoundingBox, GeoPoint, Poi, RankedPoi};
pub use pagination::{resolve_page, PageWindow, DEFAULT_PAGE_SIZE};
pub use planner::{find_nearby, search_by_text, NearbyParams, TextSearchParams};
