//! Bounding box and great-circle distance math.
//!
//! Everything here is a pure function of its numeric inputs.

use crate::error::{PoiError, Result};
use crate::models::{BoundingBox, GeoPoint};

/// Mean Earth radius in meters
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

const RADIANS_TO_DEGREES: f64 = 180.0 / std::f64::consts::PI;

/// Compute the box around `center` that spans `radius_meters` in each
/// cardinal direction.
///
/// The longitude delta is widened by `1 / cos(lat)` because a degree of
/// longitude shrinks toward the poles. Fails for a non-positive radius or a
/// polar center, where that factor is undefined.
pub fn bounding_box(center: GeoPoint, radius_meters: f64) -> Result<BoundingBox> {
    if !radius_meters.is_finite() || radius_meters <= 0.0 {
        return Err(PoiError::invalid(format!(
            "radius must be positive, got {}",
            radius_meters
        )));
    }
    if center.lat().abs() >= 90.0 {
        return Err(PoiError::invalid(format!(
            "cannot build a bounding box around polar latitude {}",
            center.lat()
        )));
    }

    let lat_delta = radius_meters / EARTH_RADIUS_METERS * RADIANS_TO_DEGREES;
    let meters_per_lon_radian = EARTH_RADIUS_METERS * center.lat().to_radians().cos();
    let lon_delta = radius_meters / meters_per_lon_radian * RADIANS_TO_DEGREES;

    Ok(BoundingBox {
        min_lat: center.lat() - lat_delta,
        min_lon: center.lon() - lon_delta,
        max_lat: center.lat() + lat_delta,
        max_lon: center.lon() + lon_delta,
    })
}

/// Haversine distance between two points in meters.
///
/// Deltas are taken as absolute values so the result is bit-for-bit
/// symmetric in its arguments.
pub fn distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();
    let delta_lat = (b.lat() - a.lat()).abs().to_radians();
    let delta_lon = (b.lon() - a.lon()).abs().to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1 for antipodal points
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn test_distance_san_francisco_to_los_angeles() {
        let sf = point(37.7749, -122.4194);
        let la = point(34.0522, -118.2437);

        let d = distance(sf, la);
        assert!((d - 559_000.0).abs() < 2_000.0, "got {}", d);
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        for p in [point(0.0, 0.0), point(-33.86, 151.21), point(89.9, -179.9)] {
            assert!(distance(p, p).abs() < 1e-6);
        }
    }

    #[test]
    fn test_distance_is_symmetric_and_non_negative() {
        let pairs = [
            (point(37.7749, -122.4194), point(34.0522, -118.2437)),
            (point(51.5074, -0.1278), point(48.8566, 2.3522)),
            (point(-45.0, 170.0), point(45.0, -170.0)),
            (point(0.0, 0.0), point(0.0, 180.0)),
        ];

        for (a, b) in pairs {
            assert_eq!(distance(a, b), distance(b, a));
            assert!(distance(a, b) >= 0.0);
        }
    }

    #[test]
    fn test_distance_grows_with_separation() {
        let origin = point(10.0, 10.0);
        let near = distance(origin, point(10.0, 10.01));
        let mid = distance(origin, point(10.0, 10.1));
        let far = distance(origin, point(10.0, 11.0));

        assert!(near < mid);
        assert!(mid < far);
    }

    #[test]
    fn test_distance_antipodal_is_half_circumference() {
        let d = distance(point(0.0, 0.0), point(0.0, 180.0));
        let half = std::f64::consts::PI * EARTH_RADIUS_METERS;
        assert!((d - half).abs() < 1.0);
    }

    #[test]
    fn test_bounding_box_around_oakland() {
        let center = point(37.76258607908846, -122.24423429364207);
        let bbox = bounding_box(center, 100.0).unwrap();

        assert!(bbox.min_lat < center.lat() && center.lat() < bbox.max_lat);
        assert!(bbox.min_lon < center.lon() && center.lon() < bbox.max_lon);

        // ~0.0009 degrees each side of the center, ~200 m north to south
        let half_span = (bbox.max_lat - bbox.min_lat) / 2.0;
        assert!((half_span - 0.0009).abs() < 0.00001, "got {}", half_span);

        let south = point(bbox.min_lat, center.lon());
        let north = point(bbox.max_lat, center.lon());
        assert!((distance(south, north) - 200.0).abs() < 0.5);

        // Longitude span is wider than latitude span away from the equator
        assert!(bbox.max_lon - bbox.min_lon > bbox.max_lat - bbox.min_lat);
    }

    #[test]
    fn test_bounding_box_at_equator_is_square() {
        let bbox = bounding_box(point(0.0, 0.0), 1_000.0).unwrap();
        let lat_span = bbox.max_lat - bbox.min_lat;
        let lon_span = bbox.max_lon - bbox.min_lon;
        assert!((lat_span - lon_span).abs() < 1e-12);
    }

    #[test]
    fn test_bounding_box_is_deterministic() {
        let center = point(48.8566, 2.3522);
        assert_eq!(
            bounding_box(center, 250.0).unwrap(),
            bounding_box(center, 250.0).unwrap()
        );
    }

    #[test]
    fn test_bounding_box_rejects_bad_radius() {
        let center = point(10.0, 10.0);
        for radius in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                bounding_box(center, radius),
                Err(PoiError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_bounding_box_rejects_poles() {
        assert!(matches!(
            bounding_box(point(90.0, 0.0), 100.0),
            Err(PoiError::InvalidInput(_))
        ));
        assert!(matches!(
            bounding_box(point(-90.0, 45.0), 100.0),
            Err(PoiError::InvalidInput(_))
        ));
        assert!(bounding_box(point(89.99, 0.0), 100.0).is_ok());
    }
}
