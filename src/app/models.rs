//! Data models for station aggregation
//!
//! This module contains the core data structures representing gas stations,
//! their fuel prices and geographic coordinates, shared by every source
//! handler, the cache and the query layer.

use crate::constants::EARTH_RADIUS_METERS;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

// =============================================================================
// Geographic Coordinates
// =============================================================================

/// Geographic coordinates in WGS84 decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Gps {
    /// Latitude in decimal degrees
    pub lat: f64,

    /// Longitude in decimal degrees
    pub lng: f64,
}

impl Gps {
    /// Create a new coordinate pair
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance to another point in meters (haversine)
    pub fn distance_m(&self, other: &Gps) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = (other.lat - self.lat).to_radians();
        let dlng = (other.lng - self.lng).to_radians();

        let h = (dlat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);

        2.0 * EARTH_RADIUS_METERS * h.sqrt().asin()
    }
}

// =============================================================================
// Fuel Prices
// =============================================================================

/// Fuel prices at a station, in shekels per liter.
///
/// A price of `0.0` means the price is unknown for that fuel, not free.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct FuelPrices {
    /// 95 octane petrol
    pub petrol_95: f64,

    /// 98 octane petrol
    pub petrol_98: f64,

    /// Diesel
    pub diesel: f64,
}

impl FuelPrices {
    /// Create a new price set
    pub fn new(petrol_95: f64, petrol_98: f64, diesel: f64) -> Self {
        Self {
            petrol_95,
            petrol_98,
            diesel,
        }
    }

    /// True when no price is known for any fuel
    pub fn is_unknown(&self) -> bool {
        self.petrol_95 == 0.0 && self.petrol_98 == 0.0 && self.diesel == 0.0
    }
}

/// Fuel selected for price display and price-based sorting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectedFuel {
    /// 95 octane petrol (default)
    Petrol95,
    /// Diesel
    Diesel,
}

impl SelectedFuel {
    /// The price of the selected fuel at a station
    pub fn price_of(&self, prices: &FuelPrices) -> f64 {
        match self {
            SelectedFuel::Petrol95 => prices.petrol_95,
            SelectedFuel::Diesel => prices.diesel,
        }
    }
}

// =============================================================================
// Station
// =============================================================================

/// A single gas station record with location, pricing and metadata.
///
/// Station ids are only unique within one refresh cycle: the API source
/// carries upstream ids while the crawler and catalog number from disjoint
/// bases. The full list is rebuilt wholesale on every refresh.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Station {
    /// Identifier, unique within one refresh cycle
    pub id: u32,

    /// Company operating the station (e.g. "טן", "mika")
    pub company: String,

    /// Street address; the search filter matches against this field
    pub address: String,

    /// Opening hours as free text, empty when unknown
    #[serde(default)]
    pub opening_hours: String,

    /// Geographic coordinates
    pub gps: Gps,

    /// Current fuel prices
    pub prices: FuelPrices,

    /// True when sourced from a live API or crawl, false for the
    /// bundled catalog
    pub from_api: bool,
}

impl Station {
    /// Create a new station with validation
    pub fn new(
        id: u32,
        address: String,
        company: String,
        gps: Gps,
        opening_hours: String,
        prices: FuelPrices,
        from_api: bool,
    ) -> Result<Self> {
        let station = Self {
            id,
            company,
            address,
            opening_hours,
            gps,
            prices,
            from_api,
        };

        station.validate()?;
        Ok(station)
    }

    /// Validate station data for consistency and valid ranges
    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.gps.lat) {
            return Err(Error::data_validation(format!(
                "Invalid latitude {}: must be between -90 and 90 degrees",
                self.gps.lat
            )));
        }

        if !(-180.0..=180.0).contains(&self.gps.lng) {
            return Err(Error::data_validation(format!(
                "Invalid longitude {}: must be between -180 and 180 degrees",
                self.gps.lng
            )));
        }

        if self.address.trim().is_empty() {
            return Err(Error::data_validation(
                "Station address cannot be empty".to_string(),
            ));
        }

        if self.prices.petrol_95 < 0.0 || self.prices.petrol_98 < 0.0 || self.prices.diesel < 0.0 {
            return Err(Error::data_validation(format!(
                "Negative fuel price on station {}",
                self.id
            )));
        }

        Ok(())
    }
}

// =============================================================================
// Query Results
// =============================================================================

/// A station paired with its distance from the query origin.
///
/// The distance is transient: recomputed on every query, never persisted,
/// and zero when the query carried no origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked {
    pub station: Station,

    /// Distance from the query origin in meters
    pub distance_m: f64,
}

impl Ranked {
    /// Format the distance for display: meters below 1 km, otherwise
    /// kilometers with one decimal
    pub fn format_distance(&self) -> String {
        if self.distance_m < 1000.0 {
            format!("{:.0}m", self.distance_m)
        } else {
            format!("{:.1}km", self.distance_m / 1000.0)
        }
    }
}
