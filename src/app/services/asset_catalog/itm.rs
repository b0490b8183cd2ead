//! ITM (Israeli Transverse Mercator) to WGS84 conversion.
//!
//! The bundled catalog publishes coordinates in the local surveying grid.
//! The conversion below is the fixed small-area approximation used for
//! this dataset: an offset from the grid's false origin scaled along the
//! meridian and along the parallel of the origin latitude.

use crate::constants::itm::{A, FALSE_EASTING, FALSE_NORTHING, K0, LAT0, LON0};
use crate::Gps;

/// Convert an ITM easting/northing pair to WGS84 decimal degrees.
pub fn itm_to_wgs84(x: f64, y: f64) -> Gps {
    let y1 = y - FALSE_NORTHING;
    let x1 = x - FALSE_EASTING;

    let lat = LAT0 + y1 / (A * K0);
    let lon = LON0 + x1 / (A * K0 * LAT0.cos());

    Gps::new(lat.to_degrees(), lon.to_degrees())
}
