//! Bundled station catalog source handler
//!
//! Loads the static station dataset shipped with the application. The
//! dataset carries Hebrew-keyed address and company fields with ITM grid
//! coordinates and no pricing; prices are filled from the regulated-price
//! table fetched from the Ten endpoint, falling back to zeros (unknown)
//! when that lookup fails. Stations are numbered from a fixed base.

pub mod itm;

#[cfg(test)]
pub mod tests;

use crate::app::services::ten_api::TenApiHandler;
use crate::constants::{catalog_keys, CATALOG_ID_BASE};
use crate::{Error, FuelPrices, Result, Station};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Company recorded when the dataset entry carries none
const UNKNOWN_COMPANY: &str = "unknown";

/// Loader for the bundled station catalog
#[derive(Debug, Clone)]
pub struct AssetCatalog {
    path: PathBuf,
    ten_endpoint: String,
}

impl AssetCatalog {
    /// Create a catalog loader for the given asset path; the Ten endpoint
    /// supplies the regulated default prices
    pub fn new(path: PathBuf, ten_endpoint: impl Into<String>) -> Self {
        Self {
            path,
            ten_endpoint: ten_endpoint.into(),
        }
    }

    /// Load and convert the catalog stations.
    ///
    /// Entries with unparseable coordinates are skipped; an unreadable or
    /// malformed asset file fails the whole source.
    pub async fn fetch_stations(&self) -> Result<Vec<Station>> {
        debug!("Loading station catalog from {}", self.path.display());

        let raw = std::fs::read_to_string(&self.path).map_err(|e| {
            Error::io(
                format!("Failed to read catalog asset {}", self.path.display()),
                e,
            )
        })?;

        let default_prices = match TenApiHandler::new(&self.ten_endpoint)
            .fetch_regulated_prices()
            .await
        {
            Ok(prices) => prices,
            Err(e) => {
                warn!("Could not fetch regulated default prices: {}", e);
                FuelPrices::default()
            }
        };

        let stations = parse_catalog(&raw, default_prices, &self.path.to_string_lossy())?;

        info!("Total stations loaded from catalog: {}", stations.len());
        Ok(stations)
    }
}

/// Parse the catalog JSON into stations.
///
/// ITM coordinates arrive as decimal strings; only the integer part is
/// used, matching the precision of the surveying grid. Entries whose
/// coordinates cannot be parsed are skipped with a warning.
pub fn parse_catalog(raw: &str, default_prices: FuelPrices, origin: &str) -> Result<Vec<Station>> {
    let root: Value = serde_json::from_str(raw)
        .map_err(|e| Error::catalog(origin, format!("invalid JSON: {}", e)))?;

    let entries = root
        .get("stations")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::catalog(origin, "missing 'stations' array"))?;

    let mut stations = Vec::with_capacity(entries.len());
    let mut next_id = CATALOG_ID_BASE;

    for entry in entries {
        let Some(address) = entry.get(catalog_keys::ADDRESS).and_then(Value::as_str) else {
            warn!("Catalog entry without an address, skipping");
            continue;
        };

        let company = entry
            .get(catalog_keys::COMPANY)
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_COMPANY);

        let coords = grid_coordinate(entry.get(catalog_keys::EASTING))
            .zip(grid_coordinate(entry.get(catalog_keys::NORTHING)));

        let Some((x, y)) = coords else {
            warn!("Error parsing coordinates for station: {}", address);
            continue;
        };

        let gps = itm::itm_to_wgs84(x, y);

        match Station::new(
            next_id,
            address.to_string(),
            company.to_string(),
            gps,
            String::new(),
            default_prices,
            false,
        ) {
            Ok(station) => {
                stations.push(station);
                next_id += 1;
            }
            Err(e) => {
                warn!("Invalid catalog station '{}': {}", address, e);
            }
        }
    }

    Ok(stations)
}

/// Parse a grid coordinate, keeping only the integer part of decimal
/// string values.
fn grid_coordinate(value: Option<&Value>) -> Option<f64> {
    let value = value?;

    if let Some(raw) = value.as_str() {
        let integer_part = raw.split('.').next()?.trim();
        return integer_part.parse::<f64>().ok();
    }

    value.as_f64().map(f64::trunc)
}
