//! Mika station directory source handler
//!
//! Scrapes the Mika listing page for station headings, follows each
//! heading's detail link for opening hours and cash prices, and resolves
//! station coordinates through forward geocoding. Stations from this
//! source are numbered sequentially from a fixed base so their ids never
//! collide with the other sources within a refresh cycle.

pub mod geocoder;
pub mod parser;

#[cfg(test)]
pub mod tests;

use crate::constants::{CRAWL_ID_BASE, HTTP_USER_AGENT};
use crate::{Result, Station};
use geocoder::Geocoder;
use indicatif::{ProgressBar, ProgressStyle};
use parser::ListingEntry;
use tracing::{debug, info, warn};

/// Stateless fetcher for the Mika station directory
#[derive(Debug, Clone)]
pub struct MikaCrawler {
    client: reqwest::Client,
    listing_url: String,
    geocoder: Geocoder,
}

impl MikaCrawler {
    /// Create a crawler for the given listing page and geocoder endpoint
    pub fn new(listing_url: impl Into<String>, geocoder_endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            listing_url: listing_url.into(),
            geocoder: Geocoder::new(geocoder_endpoint),
        }
    }

    /// Crawl the directory and return the stations it lists.
    ///
    /// A station whose detail page cannot be fetched, parsed or geocoded
    /// is skipped with a warning; only a failure to fetch the listing
    /// itself fails the whole source.
    pub async fn fetch_stations(&self, show_progress: bool) -> Result<Vec<Station>> {
        debug!("Fetching Mika listing from {}", self.listing_url);

        let listing_html = self.get_text(&self.listing_url).await?;
        let entries = parser::listing_entries(&listing_html);

        info!("Mika listing yielded {} station entries", entries.len());

        let progress_bar = if show_progress {
            let pb = ProgressBar::new(entries.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .unwrap()
                    .progress_chars("#>-"),
            );
            pb.set_message("Crawling station pages...");
            Some(pb)
        } else {
            None
        };

        let mut stations = Vec::with_capacity(entries.len());
        let mut next_id = CRAWL_ID_BASE;

        for entry in &entries {
            if let Some(pb) = &progress_bar {
                pb.inc(1);
                pb.set_message(format!("Crawling {}", entry.heading));
            }

            match self.fetch_station(entry, next_id).await {
                Ok(Some(station)) => {
                    debug!("Added station: {} ({})", station.address, station.company);
                    stations.push(station);
                    next_id += 1;
                }
                Ok(None) => {
                    warn!("No coordinates for '{}', skipping", entry.heading);
                }
                Err(e) => {
                    warn!("Error processing station '{}': {}", entry.heading, e);
                }
            }
        }

        if let Some(pb) = &progress_bar {
            pb.finish_with_message("Crawl complete");
        }

        info!("Total stations crawled: {}", stations.len());
        Ok(stations)
    }

    /// Fetch one station's detail page and assemble the record.
    ///
    /// Returns `Ok(None)` when the address cannot be geocoded.
    async fn fetch_station(&self, entry: &ListingEntry, id: u32) -> Result<Option<Station>> {
        let detail_html = self.get_text(&entry.detail_url).await?;
        let detail = parser::parse_detail(&detail_html);

        let address = parser::strip_new_prefix(&entry.heading).to_string();

        let Some(gps) = self.geocoder.locate(&address).await? else {
            return Ok(None);
        };

        let station = Station::new(
            id,
            address,
            entry.company.clone(),
            gps,
            detail.opening_hours,
            detail.prices,
            true,
        )?;

        Ok(Some(station))
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let body = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, HTTP_USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(body)
    }
}
