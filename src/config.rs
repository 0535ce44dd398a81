//! Query service configuration.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::pagination::DEFAULT_PAGE_SIZE;

/// Search radius used by `/nearby`
pub const DEFAULT_NEARBY_RADIUS_METERS: f64 = 100.0;

/// Upper bound on a single Elasticsearch request
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;

/// Elasticsearch's default `index.max_result_window`
pub const DEFAULT_MAX_RESULT_WINDOW: u64 = 10_000;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Listen address
    pub listen: String,
    pub es_url: String,
    /// Elasticsearch index holding POI documents
    pub index: String,
    pub page_size: u32,
    pub nearby_radius_meters: f64,
    pub request_timeout_ms: u64,
    /// Must not exceed the index's own `max_result_window`
    pub max_result_window: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:3000".to_string(),
            es_url: "http://localhost:9200".to_string(),
            index: "places".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            nearby_radius_meters: DEFAULT_NEARBY_RADIUS_METERS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            max_result_window: DEFAULT_MAX_RESULT_WINDOW,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            anyhow::bail!("page_size must be at least 1");
        }
        if !self.nearby_radius_meters.is_finite() || self.nearby_radius_meters <= 0.0 {
            anyhow::bail!(
                "nearby_radius_meters must be positive, got {}",
                self.nearby_radius_meters
            );
        }
        if self.request_timeout_ms == 0 {
            anyhow::bail!("request_timeout_ms must be at least 1");
        }
        if self.max_result_window < u64::from(self.page_size) {
            anyhow::bail!(
                "max_result_window ({}) must hold at least one page of {}",
                self.max_result_window,
                self.page_size
            );
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
