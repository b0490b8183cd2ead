//! Reference tests for the ITM to WGS84 conversion

use crate::app::services::asset_catalog::itm::itm_to_wgs84;
use crate::constants::itm::{FALSE_EASTING, FALSE_NORTHING};

const TOLERANCE_DEG: f64 = 1e-6;

#[test]
fn test_false_origin_maps_to_grid_origin() {
    // At the false origin the offsets vanish and the conversion must
    // return the grid origin itself
    let gps = itm_to_wgs84(FALSE_EASTING, FALSE_NORTHING);
    assert!((gps.lat - 31.7343936111111).abs() < TOLERANCE_DEG, "lat {}", gps.lat);
    assert!((gps.lng - 35.2045169444444).abs() < TOLERANCE_DEG, "lng {}", gps.lng);
}

#[test]
fn test_tel_aviv_grid_reference() {
    // ITM 178000/663000 sits in central Tel Aviv
    let gps = itm_to_wgs84(178_000.0, 663_000.0);
    assert!((gps.lat - 32.058616870883).abs() < TOLERANCE_DEG, "lat {}", gps.lat);
    assert!((gps.lng - 34.765873718278).abs() < TOLERANCE_DEG, "lng {}", gps.lng);
}

#[test]
fn test_jerusalem_grid_reference() {
    // ITM 220000/633000 sits just north-east of the grid origin
    let gps = itm_to_wgs84(220_000.0, 633_000.0);
    assert!((gps.lat - 31.789124091249).abs() < TOLERANCE_DEG, "lat {}", gps.lat);
    assert!((gps.lng - 35.209485566135).abs() < TOLERANCE_DEG, "lng {}", gps.lng);
}

#[test]
fn test_northing_increases_latitude() {
    let south = itm_to_wgs84(200_000.0, 600_000.0);
    let north = itm_to_wgs84(200_000.0, 700_000.0);
    assert!(north.lat > south.lat);
    // Easting held constant, longitude unchanged
    assert!((north.lng - south.lng).abs() < TOLERANCE_DEG);
}

#[test]
fn test_converted_coordinates_stay_in_country_bounds() {
    // Haifa-area grid reference lands inside Israel's bounding box
    let gps = itm_to_wgs84(198_500.0, 748_000.0);
    assert!((29.0..34.0).contains(&gps.lat), "lat {}", gps.lat);
    assert!((34.0..36.5).contains(&gps.lng), "lng {}", gps.lng);
}
