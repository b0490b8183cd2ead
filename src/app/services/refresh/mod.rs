//! Freshness-gated station refresh
//!
//! Coordinates the three source handlers: a stored month-granularity tag
//! decides whether the cached list is served or a full refresh runs. A
//! refresh fetches all sources concurrently, waits for every one of them,
//! concatenates the results in fixed source order and replaces the cache
//! wholesale. Individual source failures degrade to an empty list for
//! that source; a failure to save the merged list is surfaced to the
//! caller. There is no timeout and no cancellation once a refresh starts.

use crate::app::services::asset_catalog::AssetCatalog;
use crate::app::services::mika_crawler::MikaCrawler;
use crate::app::services::station_cache::StationCache;
use crate::app::services::ten_api::TenApiHandler;
use crate::constants::month_tag;
use crate::{Config, Result, Station};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Outcome statistics for a single load or refresh cycle
#[derive(Debug, Clone, Default)]
pub struct RefreshStats {
    /// True when the sources were fetched, false when the cache was served
    pub refreshed: bool,

    /// Stations contributed by the Ten API
    pub api_stations: usize,

    /// Stations contributed by the Mika crawl
    pub crawled_stations: usize,

    /// Stations contributed by the bundled catalog
    pub catalog_stations: usize,

    /// Stations in the final list
    pub total_stations: usize,

    /// Wall-clock duration of the cycle
    pub duration: Duration,
}

impl RefreshStats {
    /// One-line human summary of the cycle
    pub fn summary(&self) -> String {
        if self.refreshed {
            format!(
                "refreshed {} stations (api: {}, crawl: {}, catalog: {}) in {:.2}s",
                self.total_stations,
                self.api_stations,
                self.crawled_stations,
                self.catalog_stations,
                self.duration.as_secs_f64()
            )
        } else {
            format!(
                "served {} cached stations in {:.2}s",
                self.total_stations,
                self.duration.as_secs_f64()
            )
        }
    }
}

/// Coordinator owning the station cache and the source configuration
pub struct RefreshCoordinator {
    config: Config,
    cache: StationCache,
}

impl RefreshCoordinator {
    /// Create a coordinator, opening the station cache at the configured
    /// path
    pub fn new(config: Config) -> Result<Self> {
        let cache = StationCache::open(&config.database_path)?;
        Ok(Self { config, cache })
    }

    /// Borrow the underlying station cache
    pub fn cache(&self) -> &StationCache {
        &self.cache
    }

    /// Load the station list, refreshing from the sources only when the
    /// stored freshness tag differs from the current month.
    ///
    /// An error reading the tag is logged and treated as "cache is
    /// valid": the cached list is served rather than failing the load.
    pub async fn load_stations(
        &self,
        show_progress: bool,
        dry_run: bool,
    ) -> Result<(Vec<Station>, RefreshStats)> {
        let start_time = Instant::now();
        let current_tag = month_tag(chrono::Local::now().date_naive());

        let stored_tag = match self.cache.last_updated().await {
            Ok(tag) => tag,
            Err(e) => {
                warn!("Error checking last update tag, serving cache: {}", e);
                return self.serve_cached(start_time).await;
            }
        };

        if needs_refresh(stored_tag.as_deref(), &current_tag) {
            debug!(
                "Stored tag {:?} differs from current {}, refreshing",
                stored_tag, current_tag
            );
            self.update_from_sources(&current_tag, start_time, show_progress, dry_run)
                .await
        } else {
            debug!("Stored tag matches current month, serving cache");
            self.serve_cached(start_time).await
        }
    }

    /// Fetch all sources and replace the cache regardless of the stored
    /// tag (the `--force` path).
    pub async fn refresh(
        &self,
        show_progress: bool,
        dry_run: bool,
    ) -> Result<(Vec<Station>, RefreshStats)> {
        let start_time = Instant::now();
        let current_tag = month_tag(chrono::Local::now().date_naive());
        self.update_from_sources(&current_tag, start_time, show_progress, dry_run)
            .await
    }

    /// Serve the cached list without touching the sources
    async fn serve_cached(&self, start_time: Instant) -> Result<(Vec<Station>, RefreshStats)> {
        let stations = self.cache.read_all().await?;
        info!("Loaded {} stations from cache", stations.len());

        let stats = RefreshStats {
            refreshed: false,
            total_stations: stations.len(),
            duration: start_time.elapsed(),
            ..Default::default()
        };
        Ok((stations, stats))
    }

    /// Run all three source handlers concurrently and merge their output.
    ///
    /// Each handler's failure degrades to an empty list for that source;
    /// the save of the merged list is the only hard failure point.
    async fn update_from_sources(
        &self,
        tag: &str,
        start_time: Instant,
        show_progress: bool,
        dry_run: bool,
    ) -> Result<(Vec<Station>, RefreshStats)> {
        info!("Updating station data from sources");

        let ten = TenApiHandler::new(&self.config.ten_endpoint);
        let mika = MikaCrawler::new(
            &self.config.mika_listing_url,
            &self.config.geocoder_endpoint,
        );
        let catalog = AssetCatalog::new(
            self.config.catalog_path.clone(),
            &self.config.ten_endpoint,
        );

        let (api_result, crawl_result, catalog_result) = futures::join!(
            ten.fetch_stations(),
            mika.fetch_stations(show_progress),
            catalog.fetch_stations(),
        );

        let api_stations = stations_or_empty("ten", api_result);
        let crawled_stations = stations_or_empty("mika", crawl_result);
        let catalog_stations = stations_or_empty("catalog", catalog_result);

        let stats = RefreshStats {
            refreshed: true,
            api_stations: api_stations.len(),
            crawled_stations: crawled_stations.len(),
            catalog_stations: catalog_stations.len(),
            total_stations: 0,
            duration: Duration::default(),
        };

        let merged = merge_sources(api_stations, crawled_stations, catalog_stations);

        if dry_run {
            info!("Dry run: skipping save of {} stations", merged.len());
        } else {
            info!("Saving {} stations to cache", merged.len());
            self.cache.replace_all(&merged, tag).await?;
        }

        let stats = RefreshStats {
            total_stations: merged.len(),
            duration: start_time.elapsed(),
            ..stats
        };
        Ok((merged, stats))
    }
}

/// True when the stored tag requires a refresh.
///
/// Tags are compared only for string equality; an absent tag always
/// refreshes.
pub fn needs_refresh(stored: Option<&str>, current: &str) -> bool {
    match stored {
        Some(tag) => tag != current,
        None => true,
    }
}

/// Concatenate the source lists in fixed order: api, crawl, catalog.
pub fn merge_sources(
    api: Vec<Station>,
    crawled: Vec<Station>,
    catalog: Vec<Station>,
) -> Vec<Station> {
    let mut merged = Vec::with_capacity(api.len() + crawled.len() + catalog.len());
    merged.extend(api);
    merged.extend(crawled);
    merged.extend(catalog);
    merged
}

/// Downgrade a source failure to an empty list with a warning
fn stations_or_empty(source: &str, result: Result<Vec<Station>>) -> Vec<Station> {
    match result {
        Ok(stations) => stations,
        Err(e) => {
            warn!("Source '{}' failed, continuing without it: {}", source, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{CATALOG_ID_BASE, CRAWL_ID_BASE};
    use crate::{FuelPrices, Gps};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn test_station(id: u32, address: &str) -> Station {
        Station::new(
            id,
            address.to_string(),
            "טן".to_string(),
            Gps::new(32.0853, 34.7818),
            String::new(),
            FuelPrices::new(7.1, 7.4, 6.9),
            true,
        )
        .unwrap()
    }

    /// Config pointing at unroutable endpoints and a missing catalog so
    /// no source can produce data
    fn offline_config(temp_dir: &TempDir) -> Config {
        Config::default()
            .with_ten_endpoint("http://127.0.0.1:9/decl")
            .with_mika_listing_url("http://127.0.0.1:9/listing")
            .with_geocoder_endpoint("http://127.0.0.1:9/search")
            .with_catalog_path(PathBuf::from("/nonexistent/catalog.json"))
            .with_database_path(temp_dir.path().join("test.db"))
    }

    #[test]
    fn test_needs_refresh() {
        assert!(!needs_refresh(Some("72025"), "72025"));
        assert!(needs_refresh(Some("62025"), "72025"));
        assert!(needs_refresh(None, "72025"));
    }

    #[test]
    fn test_merge_sources_preserves_order_and_length() {
        let api = vec![test_station(17, "a"), test_station(23, "b")];
        let crawled = vec![test_station(CRAWL_ID_BASE, "c")];
        let catalog = vec![
            test_station(CATALOG_ID_BASE, "d"),
            test_station(CATALOG_ID_BASE + 1, "e"),
        ];

        let merged = merge_sources(api.clone(), crawled.clone(), catalog.clone());

        assert_eq!(merged.len(), api.len() + crawled.len() + catalog.len());
        let ids: Vec<u32> = merged.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![17, 23, CRAWL_ID_BASE, CATALOG_ID_BASE, CATALOG_ID_BASE + 1]);
    }

    #[test]
    fn test_merge_sources_with_empty_inputs() {
        let merged = merge_sources(Vec::new(), Vec::new(), Vec::new());
        assert!(merged.is_empty());

        let merged = merge_sources(vec![test_station(1, "a")], Vec::new(), Vec::new());
        assert_eq!(merged.len(), 1);
    }

    #[tokio::test]
    async fn test_current_tag_serves_cache_without_fetching() {
        let temp_dir = TempDir::new().unwrap();
        let coordinator = RefreshCoordinator::new(offline_config(&temp_dir)).unwrap();

        // Seed the cache under the current month tag; the unroutable
        // endpoints guarantee the test fails loudly if a fetch happens
        let seeded = vec![test_station(17, "דרך נמיר 100, תל אביב")];
        let tag = month_tag(chrono::Local::now().date_naive());
        coordinator.cache().replace_all(&seeded, &tag).await.unwrap();

        let (stations, stats) = coordinator.load_stations(false, false).await.unwrap();

        assert!(!stats.refreshed);
        assert_eq!(stations, seeded);
    }

    #[tokio::test]
    async fn test_stale_tag_triggers_refresh() {
        let temp_dir = TempDir::new().unwrap();
        let coordinator = RefreshCoordinator::new(offline_config(&temp_dir)).unwrap();

        let seeded = vec![test_station(17, "כתובת ישנה")];
        coordinator
            .cache()
            .replace_all(&seeded, "00000")
            .await
            .unwrap();

        let (stations, stats) = coordinator.load_stations(false, false).await.unwrap();

        // All sources fail soft, so the refresh replaces the cache with
        // an empty list and stamps the current tag
        assert!(stats.refreshed);
        assert!(stations.is_empty());

        let tag = month_tag(chrono::Local::now().date_naive());
        assert_eq!(coordinator.cache().last_updated().await.unwrap(), Some(tag));
        assert!(coordinator.cache().read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_tag_triggers_refresh() {
        let temp_dir = TempDir::new().unwrap();
        let coordinator = RefreshCoordinator::new(offline_config(&temp_dir)).unwrap();

        let (stations, stats) = coordinator.load_stations(false, false).await.unwrap();

        assert!(stats.refreshed);
        assert!(stations.is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_does_not_touch_the_cache() {
        let temp_dir = TempDir::new().unwrap();
        let coordinator = RefreshCoordinator::new(offline_config(&temp_dir)).unwrap();

        let seeded = vec![test_station(17, "כתובת ישנה")];
        coordinator
            .cache()
            .replace_all(&seeded, "00000")
            .await
            .unwrap();

        let (_, stats) = coordinator.load_stations(false, true).await.unwrap();
        assert!(stats.refreshed);

        // Cache content and tag are untouched
        assert_eq!(coordinator.cache().read_all().await.unwrap(), seeded);
        assert_eq!(
            coordinator.cache().last_updated().await.unwrap(),
            Some("00000".to_string())
        );
    }

    #[test]
    fn test_stats_summary() {
        let stats = RefreshStats {
            refreshed: true,
            api_stations: 120,
            crawled_stations: 30,
            catalog_stations: 200,
            total_stations: 350,
            duration: Duration::from_millis(2500),
        };
        let summary = stats.summary();
        assert!(summary.contains("350"));
        assert!(summary.contains("api: 120"));

        let stats = RefreshStats {
            total_stations: 42,
            ..Default::default()
        };
        assert!(stats.summary().contains("cached"));
    }
}
