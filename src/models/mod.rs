//! Core data models for POI queries.

pub mod poi;
pub mod point;

pub use poi::{Poi, RankedPoi};
pub use point::{BoundingBox, GeoPoint};
