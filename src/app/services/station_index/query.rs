//! Station search, sorting and nearby lookups
//!
//! This module provides the query methods over the merged station list:
//! case-insensitive address search, price or distance ordering, and the
//! radius-capped nearby view.

use super::StationIndex;
use crate::constants::NEARBY_RESULT_CAP;
use crate::{Gps, Ranked, SelectedFuel, Station};

/// Options shared by the query methods
#[derive(Debug, Clone, Copy)]
pub struct QueryOptions {
    /// Fuel whose price is used for price ordering
    pub fuel: SelectedFuel,

    /// Active ordering
    pub sort: SortOrder,

    /// Reference point for distances; distances are reported as zero
    /// when absent
    pub origin: Option<Gps>,

    /// Include stations sourced from the bundled catalog
    pub include_catalog: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            fuel: SelectedFuel::Petrol95,
            sort: SortOrder::Distance,
            origin: None,
            include_catalog: true,
        }
    }
}

/// Result ordering for station queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending by the selected fuel price
    Price,
    /// Ascending by distance from the origin; a no-op without an origin
    Distance,
}

impl StationIndex {
    /// Search stations by address substring.
    ///
    /// The match is case-insensitive against the address field only. An
    /// empty or whitespace query returns the full list unfiltered and
    /// unsorted. Non-empty queries return matches sorted per the active
    /// ordering. No stable ordering is guaranteed between equal keys.
    pub fn search(&self, query: &str, opts: &QueryOptions) -> Vec<Ranked> {
        let trimmed = query.trim();

        if trimmed.is_empty() {
            return self.ranked_stations(opts);
        }

        let needle = trimmed.to_lowercase();
        let mut matches: Vec<Ranked> = self
            .all()
            .iter()
            .filter(|station| opts.include_catalog || station.from_api)
            .filter(|station| station.address.to_lowercase().contains(&needle))
            .map(|station| rank(station, opts.origin))
            .collect();

        sort_ranked(&mut matches, opts);
        matches
    }

    /// Stations within `radius_m` of `origin`, sorted per the active
    /// ordering and capped at a fixed result count.
    pub fn nearby(&self, origin: Gps, radius_m: f64, opts: &QueryOptions) -> Vec<Ranked> {
        let mut nearby: Vec<Ranked> = self
            .all()
            .iter()
            .filter(|station| opts.include_catalog || station.from_api)
            .map(|station| rank(station, Some(origin)))
            .filter(|ranked| ranked.distance_m <= radius_m)
            .collect();

        // Distance sorting always applies here even when the caller's
        // options carry no origin
        let opts = QueryOptions {
            origin: Some(origin),
            ..*opts
        };
        sort_ranked(&mut nearby, &opts);

        nearby.truncate(NEARBY_RESULT_CAP);
        nearby
    }

    /// The full list as ranked entries without filtering or sorting
    fn ranked_stations(&self, opts: &QueryOptions) -> Vec<Ranked> {
        self.all()
            .iter()
            .filter(|station| opts.include_catalog || station.from_api)
            .map(|station| rank(station, opts.origin))
            .collect()
    }
}

/// Pair a station with its distance from the origin (zero when absent)
fn rank(station: &Station, origin: Option<Gps>) -> Ranked {
    let distance_m = origin
        .map(|from| from.distance_m(&station.gps))
        .unwrap_or(0.0);

    Ranked {
        station: station.clone(),
        distance_m,
    }
}

/// Order results per the query options.
///
/// Price ordering uses the selected fuel; distance ordering applies only
/// when an origin was supplied.
fn sort_ranked(results: &mut [Ranked], opts: &QueryOptions) {
    match opts.sort {
        SortOrder::Price => {
            results.sort_by(|a, b| {
                let price_a = opts.fuel.price_of(&a.station.prices);
                let price_b = opts.fuel.price_of(&b.station.prices);
                price_a.total_cmp(&price_b)
            });
        }
        SortOrder::Distance => {
            if opts.origin.is_some() {
                results.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
            }
        }
    }
}
