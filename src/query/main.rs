//! Query server for POI lookups.
//!
//! Provides an HTTP API for single-record lookup, nearby search around a
//! coordinate and text search within a country.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use clap::Parser;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use poi_polloi::config::Config;
use poi_polloi::elasticsearch::EsClient;
use poi_polloi::Poi;

mod api;
use api::{ApiError, NearbyQueryParams, PoiQueryParams, SearchQueryParams};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "query")]
#[command(about = "POI query server")]
struct Args {
    /// TOML config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address
    #[arg(short, long)]
    listen: Option<String>,

    /// Elasticsearch URL
    #[arg(long)]
    es_url: Option<String>,

    /// Elasticsearch index name
    #[arg(long)]
    index: Option<String>,

    /// Results per page
    #[arg(long)]
    page_size: Option<u32>,

    /// Search radius for /nearby in meters
    #[arg(long)]
    radius: Option<f64>,

    /// Elasticsearch request timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Deepest result the index serves (Elasticsearch max_result_window)
    #[arg(long)]
    max_result_window: Option<u64>,
}

impl Args {
    /// Defaults, then the config file, then flags
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(listen) = self.listen {
            config.listen = listen;
        }
        if let Some(es_url) = self.es_url {
            config.es_url = es_url;
        }
        if let Some(index) = self.index {
            config.index = index;
        }
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        if let Some(radius) = self.radius {
            config.nearby_radius_meters = radius;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.request_timeout_ms = timeout_ms;
        }
        if let Some(max_result_window) = self.max_result_window {
            config.max_result_window = max_result_window;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Application state shared across handlers
struct AppState {
    es_client: EsClient,
    config: Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Args::parse().into_config()?;

    info!("Poi Polloi Query Server");
    info!("Connecting to Elasticsearch at {}", config.es_url);

    let es_client = EsClient::new(&config.es_url, &config.index, config.request_timeout())
        .context("Failed to connect to Elasticsearch")?
        .with_max_result_window(config.max_result_window);

    if !es_client.health_check().await {
        anyhow::bail!("Elasticsearch cluster is not healthy");
    }

    let doc_count = es_client.doc_count().await?;
    info!(
        "Connected to index '{}' with {} documents",
        config.index, doc_count
    );
    info!(
        "Page size {}, nearby radius {} m",
        config.page_size, config.nearby_radius_meters
    );

    let listen = config.listen.clone();
    let state = Arc::new(AppState { es_client, config });

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/poi", get(poi_handler))
        .route("/nearby", get(nearby_handler))
        .route("/search", get(search_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Starting server on {}", listen);

    let listener = tokio::net::TcpListener::bind(&listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Liveness probe. Always 200; reports whether the index is reachable.
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let healthy = state.es_client.health_check().await;

    Json(HealthResponse {
        status: if healthy { "ok" } else { "degraded" },
        elasticsearch: healthy,
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    elasticsearch: bool,
}

/// Single POI by id
async fn poi_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PoiQueryParams>,
) -> Result<Json<Poi>, ApiError> {
    api::get_poi(&state.es_client, params).await.map(Json)
}

/// POIs around a point, closest first
async fn nearby_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NearbyQueryParams>,
) -> Result<Json<Vec<Poi>>, ApiError> {
    api::nearby(&state.es_client, &state.config, params)
        .await
        .map(Json)
}

/// Text search within a country
async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQueryParams>,
) -> Result<Json<Vec<Poi>>, ApiError> {
    api::search(&state.es_client, &state.config, params)
        .await
        .map(Json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::parse_from(["query", "--index", "pois", "--page-size", "5"]);
        let config = args.into_config().unwrap();

        assert_eq!(config.index, "pois");
        assert_eq!(config.page_size, 5);
        assert_eq!(config.es_url, "http://localhost:9200");
    }

    #[test]
    fn test_invalid_override_rejected() {
        let args = Args::parse_from(["query", "--radius", "0"]);
        assert!(args.into_config().is_err());
    }

    #[test]
    fn test_max_result_window_flag() {
        let args = Args::parse_from(["query", "--max-result-window", "25000"]);
        assert_eq!(args.into_config().unwrap().max_result_window, 25_000);
    }
}
