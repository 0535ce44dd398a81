//! Coordinate and bounding box value types.

use serde::{Deserialize, Serialize};

use crate::error::{PoiError, Result};

/// Geographic point (lat/lon) in degrees.
///
/// Constructed through [`GeoPoint::new`], which range-checks both axes, so
/// downstream geo math never sees an out-of-domain coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(PoiError::invalid(format!(
                "latitude {} outside [-90, 90]",
                lat
            )));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(PoiError::invalid(format!(
                "longitude {} outside [-180, 180]",
                lon
            )));
        }
        Ok(Self { lat, lon })
    }

    /// Build a point from a stored record. Storage is trusted, so no checks.
    pub(crate) fn from_record(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

impl<'de> Deserialize<'de> for GeoPoint {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            lat: f64,
            lon: f64,
        }

        let raw = Raw::deserialize(deserializer)?;
        GeoPoint::new(raw.lat, raw.lon).map_err(serde::de::Error::custom)
    }
}

/// Axis-aligned rectangle in degrees approximating a circular search radius.
///
/// `min_* <= max_*` holds for every box that does not cross the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// True when the rectangle `[min, max]` lies strictly inside this box.
    ///
    /// Every bound is compared with a strict inequality, so a rectangle that
    /// touches an edge is rejected.
    pub fn strictly_contains(
        &self,
        min_lat: f64,
        min_lon: f64,
        max_lat: f64,
        max_lon: f64,
    ) -> bool {
        min_lat > self.min_lat
            && min_lon > self.min_lon
            && max_lat < self.max_lat
            && max_lon < self.max_lon
    }

    /// Whether a single point lies strictly inside the box.
    pub fn strictly_contains_point(&self, point: &GeoPoint) -> bool {
        self.strictly_contains(point.lat, point.lon, point.lat, point.lon)
    }
}
