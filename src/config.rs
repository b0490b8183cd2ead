//! Configuration for the station aggregation pipeline.
//!
//! Provides the runtime configuration shared by the source handlers,
//! the refresh coordinator and the query layer, with builder-style
//! overrides applied from CLI arguments.

use crate::constants::{
    CACHE_DB_FILENAME, GEOCODER_ENDPOINT, MIKA_LISTING_URL, NEARBY_RADIUS_METERS,
    NEARBY_RESULT_CAP, TEN_API_ENDPOINT,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global configuration for FullTank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Ten price API endpoint
    pub ten_endpoint: String,

    /// Mika directory listing URL
    pub mika_listing_url: String,

    /// Forward geocoding endpoint
    pub geocoder_endpoint: String,

    /// Path to the bundled station catalog asset
    pub catalog_path: PathBuf,

    /// Path to the SQLite station cache
    pub database_path: PathBuf,

    /// Maximum distance for the nearby view, meters
    pub nearby_radius_m: f64,

    /// Result cap for the nearby view
    pub nearby_cap: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ten_endpoint: TEN_API_ENDPOINT.to_string(),
            mika_listing_url: MIKA_LISTING_URL.to_string(),
            geocoder_endpoint: GEOCODER_ENDPOINT.to_string(),
            catalog_path: PathBuf::from("assets/gas_stations.json"),
            database_path: default_database_path(),
            nearby_radius_m: NEARBY_RADIUS_METERS,
            nearby_cap: NEARBY_RESULT_CAP,
        }
    }
}

/// Default station cache location under the platform data directory,
/// falling back to the working directory when none is available.
fn default_database_path() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("fulltank").join(CACHE_DB_FILENAME),
        None => PathBuf::from(CACHE_DB_FILENAME),
    }
}

impl Config {
    /// Create configuration with a custom Ten API endpoint
    pub fn with_ten_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.ten_endpoint = endpoint.into();
        self
    }

    /// Create configuration with a custom Mika listing URL
    pub fn with_mika_listing_url(mut self, url: impl Into<String>) -> Self {
        self.mika_listing_url = url.into();
        self
    }

    /// Create configuration with a custom geocoder endpoint
    pub fn with_geocoder_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.geocoder_endpoint = endpoint.into();
        self
    }

    /// Create configuration with a custom catalog asset path
    pub fn with_catalog_path(mut self, path: PathBuf) -> Self {
        self.catalog_path = path;
        self
    }

    /// Create configuration with a custom station cache path
    pub fn with_database_path(mut self, path: PathBuf) -> Self {
        self.database_path = path;
        self
    }

    /// Create configuration with a custom nearby radius in meters
    pub fn with_nearby_radius_m(mut self, radius_m: f64) -> Self {
        self.nearby_radius_m = radius_m;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.ten_endpoint, TEN_API_ENDPOINT);
        assert_eq!(config.nearby_radius_m, NEARBY_RADIUS_METERS);
        assert_eq!(config.nearby_cap, NEARBY_RESULT_CAP);
        assert!(config.database_path.to_string_lossy().contains("fulltank"));
    }

    #[test]
    fn test_builder_overrides() {
        let config = Config::default()
            .with_ten_endpoint("http://localhost:9000/decl")
            .with_database_path(PathBuf::from("/tmp/test.db"))
            .with_nearby_radius_m(5_000.0);

        assert_eq!(config.ten_endpoint, "http://localhost:9000/decl");
        assert_eq!(config.database_path, PathBuf::from("/tmp/test.db"));
        assert_eq!(config.nearby_radius_m, 5_000.0);
    }
}
