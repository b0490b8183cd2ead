//! Ten price API source handler
//!
//! Fetches the Ten "general declaration" endpoint and maps its station
//! array into the common station model. The endpoint also carries a
//! regulated-price table keyed by fuel-type code which backfills station
//! prices that the API reports as zero.

pub mod parser;

#[cfg(test)]
pub mod tests;

use crate::constants::HTTP_USER_AGENT;
use crate::{Result, Station};
use tracing::{debug, info};

/// Stateless fetcher for the Ten price API
#[derive(Debug, Clone)]
pub struct TenApiHandler {
    client: reqwest::Client,
    endpoint: String,
}

impl TenApiHandler {
    /// Create a handler for the given endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Fetch and parse the full station list.
    ///
    /// Malformed station entries are skipped; a transport-level failure or
    /// an unparseable response body is returned as an error for the
    /// aggregator to downgrade.
    pub async fn fetch_stations(&self) -> Result<Vec<Station>> {
        debug!("Fetching Ten station list from {}", self.endpoint);

        let response = self.fetch_declaration().await?;
        let stations = parser::parse_general_declaration(&response)?;

        info!("Ten API returned {} stations", stations.len());
        Ok(stations)
    }

    /// Fetch only the regulated-price table from the declaration.
    ///
    /// Used by the catalog handler to fill in default prices for stations
    /// whose dataset carries no pricing at all.
    pub async fn fetch_regulated_prices(&self) -> Result<crate::FuelPrices> {
        let response = self.fetch_declaration().await?;
        Ok(parser::regulated_prices(&response))
    }

    async fn fetch_declaration(&self) -> Result<serde_json::Value> {
        let response = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::USER_AGENT, HTTP_USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;

        Ok(response)
    }
}
