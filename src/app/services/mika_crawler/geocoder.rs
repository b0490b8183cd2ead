//! Forward geocoding for scraped station addresses.
//!
//! The Mika directory publishes addresses as free text only; coordinates
//! are resolved through a Nominatim-format search lookup, one request per
//! station.

use crate::constants::HTTP_USER_AGENT;
use crate::{Gps, Result};
use serde_json::Value;
use tracing::debug;

/// HTTP forward geocoder against a Nominatim-compatible endpoint
#[derive(Debug, Clone)]
pub struct Geocoder {
    client: reqwest::Client,
    endpoint: String,
}

impl Geocoder {
    /// Create a geocoder for the given search endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Resolve an address to coordinates.
    ///
    /// Returns `Ok(None)` when the geocoder has no match for the query;
    /// transport failures are returned as errors for the caller to handle
    /// per station.
    pub async fn locate(&self, query: &str) -> Result<Option<Gps>> {
        debug!("Geocoding '{}'", query);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .header(reqwest::header::USER_AGENT, HTTP_USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        Ok(parse_search_response(&response))
    }
}

/// Extract the best-match coordinates from a search response.
///
/// Nominatim returns coordinates as decimal strings; numeric values are
/// tolerated as well.
pub fn parse_search_response(response: &Value) -> Option<Gps> {
    let first = response.as_array()?.first()?;

    let lat = value_as_f64(first.get("lat")?)?;
    let lng = value_as_f64(first.get("lon")?)?;

    Some(Gps::new(lat, lng))
}

fn value_as_f64(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|raw| raw.parse::<f64>().ok()))
}
