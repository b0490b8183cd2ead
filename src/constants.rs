//! Application constants for FullTank
//!
//! This module contains upstream endpoints, source identifier ranges,
//! fuel-type mappings and geodetic constants used throughout the
//! station aggregation pipeline.

// =============================================================================
// Upstream Endpoints
// =============================================================================

/// Ten price API "general declaration" endpoint (JSON)
pub const TEN_API_ENDPOINT: &str = "https://10ten.co.il/website_api/website/1.0/generalDeclaration";

/// Mika station directory listing page (HTML, Hebrew slug)
pub const MIKA_LISTING_URL: &str =
    "https://mika.org.il/%D7%9B%D7%9C-%D7%94%D7%9E%D7%AA%D7%97%D7%9E%D7%99%D7%9D/";

/// Forward geocoding endpoint (Nominatim search API)
pub const GEOCODER_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";

/// User agent sent with upstream requests
pub const HTTP_USER_AGENT: &str = concat!("fulltank/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// Source Identifier Ranges
// =============================================================================
//
// Station ids are only unique within a single refresh cycle. The API source
// carries upstream ids; the other two sources number sequentially from
// disjoint bases to avoid collisions in the merged list.

/// First id assigned to stations scraped from the Mika directory
pub const CRAWL_ID_BASE: u32 = 1000;

/// First id assigned to stations from the bundled catalog
pub const CATALOG_ID_BASE: u32 = 2000;

// =============================================================================
// Fuel Type Mappings
// =============================================================================

/// Fuel-type codes used by the Ten API
pub mod fuel_codes {
    /// 95 octane petrol
    pub const PETROL_95: &str = "5";

    /// 98 octane petrol
    pub const PETROL_98: &str = "6";

    /// Diesel
    pub const DIESEL: &str = "0";
}

/// Hebrew fuel labels used on Mika detail pages
pub mod fuel_labels {
    pub const PETROL_95: &str = "בנזין 95";
    pub const PETROL_98: &str = "בנזין 98";
    pub const DIESEL: &str = "סולר";
}

/// Hebrew field keys used by the bundled catalog asset
pub mod catalog_keys {
    /// Street address
    pub const ADDRESS: &str = "כתובת";

    /// Company name
    pub const COMPANY: &str = "חברה";

    /// ITM easting
    pub const EASTING: &str = "X";

    /// ITM northing
    pub const NORTHING: &str = "Y";
}

/// Prefix stripped from newly listed Mika station headings
pub const MIKA_NEW_PREFIX: &str = "חדש!";

// =============================================================================
// Station Cache
// =============================================================================

/// Meta table key holding the freshness tag
pub const LAST_UPDATED_KEY: &str = "last_updated";

/// Default station cache filename
pub const CACHE_DB_FILENAME: &str = "fulltank.db";

// =============================================================================
// Query Defaults
// =============================================================================

/// Default maximum distance for the nearby view, in meters
pub const NEARBY_RADIUS_METERS: f64 = 15_000.0;

/// Maximum number of stations returned by the nearby view
pub const NEARBY_RESULT_CAP: usize = 20;

// =============================================================================
// Geodetic Constants
// =============================================================================

/// Mean Earth radius in meters, used for great-circle distances
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Constants for the fixed ITM (Israeli Transverse Mercator) to WGS84
/// conversion applied to bundled catalog coordinates.
pub mod itm {
    /// Central meridian scale factor
    pub const K0: f64 = 1.0000067;

    /// Semi-major axis of the WGS84 ellipsoid, meters
    pub const A: f64 = 6_378_137.0;

    /// First eccentricity of the WGS84 ellipsoid
    pub const E: f64 = 0.081819191042816;

    /// Central meridian, radians (35.2045169444444 degrees)
    pub const LON0: f64 = 0.61443473225468920;

    /// Latitude of origin, radians (31.7343936111111 degrees)
    pub const LAT0: f64 = 0.55386965463774187;

    /// False easting, meters
    pub const FALSE_EASTING: f64 = 219_529.584;

    /// False northing, meters
    pub const FALSE_NORTHING: f64 = 626_907.390;
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Format the freshness tag for a given date.
///
/// The tag is the zero-based month concatenated with the 4-digit year with
/// no separator (August 2025 becomes "72025"). The concatenation is not
/// reversibly parseable; tags are compared only for string equality.
pub fn month_tag(date: chrono::NaiveDate) -> String {
    use chrono::Datelike;
    format!("{}{}", date.month0(), date.year())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_month_tag_format() {
        // Month is zero-based, concatenated directly with the year
        let tag = month_tag(NaiveDate::from_ymd_opt(2025, 8, 6).unwrap());
        assert_eq!(tag, "72025");

        let tag = month_tag(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(tag, "02024");

        let tag = month_tag(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert_eq!(tag, "112024");
    }

    #[test]
    fn test_month_tag_changes_across_month_boundary() {
        let june = month_tag(NaiveDate::from_ymd_opt(2025, 6, 30).unwrap());
        let july = month_tag(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        assert_ne!(june, july);
    }

    #[test]
    fn test_id_bases_are_disjoint() {
        assert!(CATALOG_ID_BASE > CRAWL_ID_BASE);
        // Room for several hundred crawled stations before the ranges touch
        assert!(CATALOG_ID_BASE - CRAWL_ID_BASE >= 1000);
    }
}
