//! Point-of-interest record as returned by index lookups.

use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// A point of interest.
///
/// Owned by the storage layer; the query core only reads these. Serializes
/// as a flat record so a result list is a plain JSON array of objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    /// Storage identifier
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub name: String,
    /// Primary category, e.g. "coffee_shop"
    #[serde(default)]
    pub main_category: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    /// Social media handle or profile URL
    #[serde(default)]
    pub social: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Street address line
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    /// ISO country code, e.g. "US"
    #[serde(default)]
    pub country: Option<String>,
}

impl Poi {
    /// Create a record with only the required fields set
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            id: id.into(),
            latitude,
            longitude,
            name: name.into(),
            main_category: None,
            website: None,
            social: None,
            phone: None,
            address: None,
            locality: None,
            postcode: None,
            region: None,
            country: None,
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.main_category = Some(category.into());
        self
    }

    pub fn location(&self) -> GeoPoint {
        GeoPoint::from_record(self.latitude, self.longitude)
    }

    /// Whether this record belongs to `country`. Comparison is exact.
    pub fn in_country(&self, country: &str) -> bool {
        self.country.as_deref() == Some(country)
    }
}

/// A POI annotated with its distance from the query point.
///
/// Only lives inside the proximity planner's result; never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedPoi {
    pub poi: Poi,
    pub distance_meters: f64,
}
