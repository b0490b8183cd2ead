//! Tests for Mika listing and detail page extraction

use crate::app::services::mika_crawler::geocoder::parse_search_response;
use crate::app::services::mika_crawler::parser::{
    listing_entries, parse_detail, parse_price_text, strip_new_prefix,
};
use serde_json::json;

const LISTING_HTML: &str = r##"
<html><body>
<div class="station">
  <img class="alignnone size-thumb" src="/logos/delek.png" alt="דלק" />
  <h2><a href="https://mika.org.il/station/rehovot">מתחם רחובות, הרצל 150</a></h2>
</div>
<div class="station">
  <img class="alignnone" src="/logos/sonol.png" alt="סונול" />
  <h2><a href="https://mika.org.il/station/ashdod">חדש! מתחם אשדוד, העצמאות 12</a></h2>
</div>
<div class="station">
  <h2><a href="https://mika.org.il/station/rehovot-dup">מתחם רחובות, הרצל 150</a></h2>
</div>
<div class="station">
  <h2><a href="#top">מתחם ללא קישור</a></h2>
</div>
<div class="station">
  <img src="/logos/noalt.png" class="alignnone" alt="" />
  <h2><a href="https://mika.org.il/station/haifa">מתחם חיפה, דרך יפו 3</a></h2>
</div>
</body></html>
"##;

const DETAIL_HTML: &str = r#"
<html><body>
<div class="info activity-hours">
  <h3 class="title">שעות פעילות</h3>
  <div class="sub-title">א'-ש' 24 שעות</div>
</div>
<div class="info cash">
  <h3 class="title">מחירון מזומן</h3>
  <ul class="list">
    <li><div class="sub-title">בנזין 95</div><span class="value">7.32 ₪</span></li>
    <li><div class="sub-title">בנזין 98</div><span class="value">8.05 ₪</span></li>
    <li><div class="sub-title">סולר</div><span class="value">7.11 ₪</span></li>
    <li><div class="sub-title">אוריאה</div><span class="value">2.50 ₪</span></li>
  </ul>
</div>
<ul><li><span class="value">9.99</span> unrelated list</li></ul>
</body></html>
"#;

#[test]
fn test_listing_extracts_entries_with_absolute_links() {
    let entries = listing_entries(LISTING_HTML);

    // Duplicate heading and anchor-only link are dropped
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].heading, "מתחם רחובות, הרצל 150");
    assert_eq!(entries[0].detail_url, "https://mika.org.il/station/rehovot");
    assert_eq!(entries[1].heading, "חדש! מתחם אשדוד, העצמאות 12");
    assert_eq!(entries[2].heading, "מתחם חיפה, דרך יפו 3");
}

#[test]
fn test_listing_company_from_logo_alt() {
    let entries = listing_entries(LISTING_HTML);

    assert_eq!(entries[0].company, "דלק");
    assert_eq!(entries[1].company, "סונול");
    // Empty alt attribute falls back to unknown
    assert_eq!(entries[2].company, "unknown");
}

#[test]
fn test_strip_new_prefix() {
    assert_eq!(
        strip_new_prefix("חדש! מתחם אשדוד, העצמאות 12"),
        "מתחם אשדוד, העצמאות 12"
    );
    // Headings without the marker pass through untouched
    assert_eq!(
        strip_new_prefix("מתחם רחובות, הרצל 150"),
        "מתחם רחובות, הרצל 150"
    );
}

#[test]
fn test_detail_prices_routed_by_hebrew_label() {
    let detail = parse_detail(DETAIL_HTML);

    assert_eq!(detail.prices.petrol_95, 7.32);
    assert_eq!(detail.prices.petrol_98, 8.05);
    assert_eq!(detail.prices.diesel, 7.11);
}

#[test]
fn test_detail_opening_hours() {
    let detail = parse_detail(DETAIL_HTML);
    assert_eq!(detail.opening_hours, "א'-ש' 24 שעות");
}

#[test]
fn test_detail_without_sections_is_empty() {
    let detail = parse_detail("<html><body><p>אין נתונים</p></body></html>");
    assert!(detail.opening_hours.is_empty());
    assert!(detail.prices.is_unknown());
}

#[test]
fn test_price_text_parsing() {
    assert_eq!(parse_price_text("7.32 ₪"), Some(7.32));
    assert_eq!(parse_price_text("  8 "), Some(8.0));
    assert_eq!(parse_price_text("₪"), None);
    assert_eq!(parse_price_text("לא זמין"), None);
}

#[test]
fn test_geocode_response_parsing() {
    // Nominatim returns coordinates as decimal strings
    let response = json!([ { "lat": "31.8928", "lon": "34.8113", "display_name": "רחובות" } ]);
    let gps = parse_search_response(&response).unwrap();
    assert!((gps.lat - 31.8928).abs() < 1e-9);
    assert!((gps.lng - 34.8113).abs() < 1e-9);

    // Empty result set means no match
    assert!(parse_search_response(&json!([])).is_none());
    // Non-array payloads are rejected
    assert!(parse_search_response(&json!({ "error": "rate limited" })).is_none());
}
