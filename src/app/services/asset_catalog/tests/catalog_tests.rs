//! Tests for catalog asset parsing

use crate::app::services::asset_catalog::parse_catalog;
use crate::constants::CATALOG_ID_BASE;
use crate::FuelPrices;

const CATALOG_JSON: &str = r#"{
  "stations": [
    { "חברה": "פז", "כתובת": "הרצל 1, ראשון לציון", "X": "178500.25", "Y": "663200.75" },
    { "חברה": "דור אלון", "כתובת": "דרך חברון 101, ירושלים", "X": "220100", "Y": "629800" },
    { "חברה": "סונול", "כתובת": "ללא קואורדינטות", "X": "abc", "Y": "663000" },
    { "חברה": "פז", "X": "178000", "Y": "663000" }
  ]
}"#;

#[test]
fn test_parse_catalog_assigns_sequential_ids_from_base() {
    let defaults = FuelPrices::new(7.21, 0.0, 7.05);
    let stations = parse_catalog(CATALOG_JSON, defaults, "test").unwrap();

    // Bad coordinates and missing address are skipped
    assert_eq!(stations.len(), 2);
    assert_eq!(stations[0].id, CATALOG_ID_BASE);
    assert_eq!(stations[1].id, CATALOG_ID_BASE + 1);
}

#[test]
fn test_parse_catalog_fields_and_defaults() {
    let defaults = FuelPrices::new(7.21, 0.0, 7.05);
    let stations = parse_catalog(CATALOG_JSON, defaults, "test").unwrap();

    let station = &stations[0];
    assert_eq!(station.company, "פז");
    assert_eq!(station.address, "הרצל 1, ראשון לציון");
    assert!(station.opening_hours.is_empty());
    assert_eq!(station.prices, defaults);
    assert!(!station.from_api);
}

#[test]
fn test_parse_catalog_truncates_decimal_grid_strings() {
    let defaults = FuelPrices::default();
    let stations = parse_catalog(CATALOG_JSON, defaults, "test").unwrap();

    // "178500.25"/"663200.75" is read as 178500/663200; the second entry
    // carries plain integers — both must land in Israel's bounding box
    for station in &stations {
        assert!((29.0..34.0).contains(&station.gps.lat), "lat {}", station.gps.lat);
        assert!((34.0..36.5).contains(&station.gps.lng), "lng {}", station.gps.lng);
    }

    // Truncation: the fractional part must not shift the result by a
    // full meter's worth of degrees
    let exact = crate::app::services::asset_catalog::itm::itm_to_wgs84(178_500.0, 663_200.0);
    assert!((stations[0].gps.lat - exact.lat).abs() < 1e-12);
    assert!((stations[0].gps.lng - exact.lng).abs() < 1e-12);
}

#[test]
fn test_parse_catalog_rejects_malformed_roots() {
    assert!(parse_catalog("not json", FuelPrices::default(), "test").is_err());
    assert!(parse_catalog(r#"{"other": []}"#, FuelPrices::default(), "test").is_err());
}
