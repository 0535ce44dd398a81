//! Proximity search: bounding box prefilter, then exact-distance ranking.

use tracing::debug;

use crate::error::Result;
use crate::geo::{bounding_box, distance};
use crate::models::{GeoPoint, RankedPoi};
use crate::pagination::{resolve_page, DEFAULT_PAGE_SIZE};
use crate::store::SpatialIndex;

/// Proximity search parameters
#[derive(Debug, Clone)]
pub struct NearbyParams {
    pub center: GeoPoint,
    pub radius_meters: f64,
    /// 1-based page number; values below 1 mean the first page
    pub page: i64,
    pub page_size: u32,
}

impl NearbyParams {
    pub fn new(center: GeoPoint, radius_meters: f64, page: i64) -> Self {
        Self {
            center,
            radius_meters,
            page,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Find POIs around a point, closest first.
///
/// The page window is applied by the spatial index to its own (unranked)
/// candidate order; only the rows of that page are then sorted by
/// haversine distance. A POI that is closer than everything on page 1 can
/// therefore show up on a later page. Candidates are those whose indexed
/// rectangle sits strictly inside the bounding box, not within a true
/// circle of `radius_meters`.
pub async fn find_nearby<S: SpatialIndex>(
    index: &S,
    params: &NearbyParams,
) -> Result<Vec<RankedPoi>> {
    let bbox = bounding_box(params.center, params.radius_meters)?;
    let window = resolve_page(params.page, params.page_size);

    debug!(
        "Nearby query around ({}, {}): bbox={:?}, window={:?}",
        params.center.lat(),
        params.center.lon(),
        bbox,
        window
    );

    let candidates = index.within(&bbox, window).await?;

    let mut ranked: Vec<RankedPoi> = candidates
        .into_iter()
        .map(|poi| RankedPoi {
            distance_meters: distance(params.center, poi.location()),
            poi,
        })
        .collect();

    // Stable: equal distances keep index order
    ranked.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));

    debug!("Nearby query returned {} results", ranked.len());
    Ok(ranked)
}
