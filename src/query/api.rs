//! Request parsing and endpoint logic, independent of the storage backend.

use axum::http::StatusCode;
use serde::Deserialize;

use poi_polloi::config::Config;
use poi_polloi::store::{PoiStore, SpatialIndex, TextIndex};
use poi_polloi::{
    find_nearby, search_by_text, GeoPoint, NearbyParams, Poi, PoiError, TextSearchParams,
};

/// Error half of every endpoint: status plus a plain-text message
pub type ApiError = (StatusCode, String);

/// Raw query string for `/poi`
#[derive(Debug, Default, Deserialize)]
pub struct PoiQueryParams {
    pub id: Option<String>,
}

/// Raw query string for `/nearby`. Numbers stay strings until
/// [`lenient_f64`]/[`lenient_i64`] so a typo never rejects the request.
#[derive(Debug, Default, Deserialize)]
pub struct NearbyQueryParams {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub page: Option<String>,
}

/// Raw query string for `/search`
#[derive(Debug, Default, Deserialize)]
pub struct SearchQueryParams {
    pub query: Option<String>,
    pub page: Option<String>,
    pub country: Option<String>,
}

/// Parse a float, defaulting to 0 when absent or malformed.
pub fn lenient_f64(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Parse an integer, defaulting to 0 when absent or malformed.
///
/// Accepts an optional sign, digits and an optional `.digits` fraction,
/// which is truncated. Exponents and anything else are malformed. Values
/// beyond the `i64` range saturate.
pub fn lenient_i64(raw: Option<&str>) -> i64 {
    let Some(s) = raw.map(str::trim) else {
        return 0;
    };
    let (negative, unsigned) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if whole.is_empty() || !all_digits(whole) || !all_digits(fraction) {
        return 0;
    }

    match whole.parse::<i64>() {
        Ok(v) if negative => -v,
        Ok(v) => v,
        Err(_) if negative => i64::MIN,
        Err(_) => i64::MAX,
    }
}

/// Map a core error onto an HTTP status
pub fn error_response(err: PoiError) -> ApiError {
    match &err {
        PoiError::InvalidInput(_) => {
            tracing::debug!("Rejected request: {}", err);
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        PoiError::StorageUnavailable(_) => {
            tracing::error!("Storage call failed: {}", err);
            (StatusCode::SERVICE_UNAVAILABLE, err.to_string())
        }
    }
}

pub async fn get_poi<S: PoiStore>(store: &S, params: PoiQueryParams) -> Result<Poi, ApiError> {
    let id = params.id.unwrap_or_default();
    if id.trim().is_empty() {
        return Err(error_response(PoiError::invalid("id must not be empty")));
    }

    match store.get(&id).await.map_err(error_response)? {
        Some(poi) => Ok(poi),
        None => Err((StatusCode::NOT_FOUND, format!("no POI with id {}", id))),
    }
}

pub async fn nearby<S: SpatialIndex>(
    index: &S,
    config: &Config,
    params: NearbyQueryParams,
) -> Result<Vec<Poi>, ApiError> {
    let lat = lenient_f64(params.lat.as_deref());
    let lon = lenient_f64(params.lon.as_deref());
    let center = GeoPoint::new(lat, lon).map_err(error_response)?;

    let nearby_params = NearbyParams {
        center,
        radius_meters: config.nearby_radius_meters,
        page: lenient_i64(params.page.as_deref()),
        page_size: config.page_size,
    };

    let ranked = find_nearby(index, &nearby_params)
        .await
        .map_err(error_response)?;

    Ok(ranked.into_iter().map(|r| r.poi).collect())
}

pub async fn search<T: TextIndex>(
    index: &T,
    config: &Config,
    params: SearchQueryParams,
) -> Result<Vec<Poi>, ApiError> {
    let search_params = TextSearchParams {
        query: params.query.unwrap_or_default(),
        country: params.country,
        page: lenient_i64(params.page.as_deref()),
        page_size: config.page_size,
    };

    search_by_text(index, &search_params)
        .await
        .map_err(error_response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use poi_polloi::store::MemoryStore;

    fn store() -> MemoryStore {
        MemoryStore::build(vec![
            Poi::new("cafe-1", "Lake Merritt Cafe", 37.7626, -122.2442).with_country("US"),
            Poi::new("cafe-2", "Grand Lake Cafe", 37.7630, -122.2443).with_country("US"),
            Poi::new("cafe-3", "Cafe de Flore", 48.8540, 2.3325).with_country("FR"),
        ])
    }

    #[test]
    fn test_lenient_f64() {
        assert_eq!(lenient_f64(Some("37.5")), 37.5);
        assert_eq!(lenient_f64(Some(" -122.25 ")), -122.25);
        assert_eq!(lenient_f64(Some("abc")), 0.0);
        assert_eq!(lenient_f64(Some("NaN")), 0.0);
        assert_eq!(lenient_f64(Some("")), 0.0);
        assert_eq!(lenient_f64(None), 0.0);
    }

    #[test]
    fn test_lenient_i64() {
        assert_eq!(lenient_i64(Some("3")), 3);
        assert_eq!(lenient_i64(Some("2.9")), 2);
        assert_eq!(lenient_i64(Some("-4")), -4);
        assert_eq!(lenient_i64(Some("two")), 0);
        assert_eq!(lenient_i64(None), 0);
    }

    #[test]
    fn test_lenient_i64_rejects_exponents_and_junk() {
        assert_eq!(lenient_i64(Some("1e3")), 0);
        assert_eq!(lenient_i64(Some("2.5e1")), 0);
        assert_eq!(lenient_i64(Some("inf")), 0);
        assert_eq!(lenient_i64(Some("NaN")), 0);
        assert_eq!(lenient_i64(Some(".5")), 0);
        assert_eq!(lenient_i64(Some("-")), 0);
        assert_eq!(lenient_i64(Some("1.2.3")), 0);
        assert_eq!(lenient_i64(Some("")), 0);
    }

    #[test]
    fn test_lenient_i64_edges() {
        assert_eq!(lenient_i64(Some(" +7 ")), 7);
        assert_eq!(lenient_i64(Some("5.")), 5);
        assert_eq!(lenient_i64(Some("-3.9")), -3);
        assert_eq!(lenient_i64(Some("99999999999999999999")), i64::MAX);
        assert_eq!(lenient_i64(Some("-99999999999999999999")), i64::MIN);
    }

    #[test]
    fn test_error_statuses() {
        assert_eq!(
            error_response(PoiError::invalid("x")).0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_response(PoiError::storage("x")).0,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn test_get_poi() {
        let store = store();

        let found = get_poi(
            &store,
            PoiQueryParams {
                id: Some("cafe-3".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(found.name, "Cafe de Flore");

        let missing = get_poi(
            &store,
            PoiQueryParams {
                id: Some("nope".to_string()),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(missing.0, StatusCode::NOT_FOUND);

        let empty = get_poi(&store, PoiQueryParams::default()).await.unwrap_err();
        assert_eq!(empty.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_nearby_orders_by_distance() {
        let params = NearbyQueryParams {
            lat: Some("37.76258607908846".to_string()),
            lon: Some("-122.24423429364207".to_string()),
            page: Some("junk".to_string()),
        };

        let results = nearby(&store(), &Config::default(), params).await.unwrap();
        let ids: Vec<&str> = results.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["cafe-1", "cafe-2"]);
    }

    #[tokio::test]
    async fn test_nearby_malformed_coordinates_default_to_zero() {
        let params = NearbyQueryParams {
            lat: Some("north".to_string()),
            lon: None,
            page: None,
        };

        // (0, 0) is a valid point with nothing around it
        let results = nearby(&store(), &Config::default(), params).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_nearby_rejects_out_of_range_and_polar() {
        for lat in ["91", "90"] {
            let params = NearbyQueryParams {
                lat: Some(lat.to_string()),
                lon: Some("0".to_string()),
                page: None,
            };
            let err = nearby(&store(), &Config::default(), params)
                .await
                .unwrap_err();
            assert_eq!(err.0, StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_search() {
        let params = SearchQueryParams {
            query: Some("cafe".to_string()),
            page: Some("1".to_string()),
            country: Some("FR".to_string()),
        };
        let results = search(&store(), &Config::default(), params).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "cafe-3");

        let all = SearchQueryParams {
            query: Some("cafe".to_string()),
            page: None,
            country: None,
        };
        assert_eq!(
            search(&store(), &Config::default(), all).await.unwrap().len(),
            3
        );
    }

    #[tokio::test]
    async fn test_search_without_query_is_bad_request() {
        let err = search(&store(), &Config::default(), SearchQueryParams::default())
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }
}
