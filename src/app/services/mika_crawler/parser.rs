//! HTML extraction for the Mika station directory.
//!
//! The listing page carries one `<h2>` heading per station with a link to
//! a detail page; detail pages carry opening hours under an
//! `activity-hours` block and cash prices as list items pairing a Hebrew
//! fuel label with a shekel-suffixed value.

use crate::constants::{fuel_labels, MIKA_NEW_PREFIX};
use crate::FuelPrices;
use regex::Regex;
use std::collections::HashSet;

/// One station heading extracted from the listing page
#[derive(Debug, Clone, PartialEq)]
pub struct ListingEntry {
    /// Heading text, tags stripped ("חדש!" prefix still present)
    pub heading: String,

    /// Absolute URL of the station detail page
    pub detail_url: String,

    /// Company name from the adjacent logo image, "unknown" when absent
    pub company: String,
}

/// Details scraped from a single station page
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StationDetail {
    /// Opening hours as free text, empty when the page carries none
    pub opening_hours: String,

    /// Cash prices routed by Hebrew fuel label, zero when not listed
    pub prices: FuelPrices,
}

/// Extract station entries from the listing page.
///
/// Headings are deduplicated by their text (first occurrence wins) and
/// entries whose detail link is not absolute are dropped, matching the
/// upstream page where anchor-only headings are navigation artifacts.
pub fn listing_entries(html: &str) -> Vec<ListingEntry> {
    let h2_re = Regex::new(r"(?s)<h2[^>]*>(.*?)</h2>").expect("valid regex");
    let href_re = Regex::new(r#"<a[^>]+href\s*=\s*["']([^"']+)["']"#).expect("valid regex");
    let img_re =
        Regex::new(r#"<img[^>]+class\s*=\s*["']alignnone[^"']*["'][^>]*>"#).expect("valid regex");
    let alt_re = Regex::new(r#"alt\s*=\s*["']([^"']*)["']"#).expect("valid regex");

    let mut seen: HashSet<String> = HashSet::new();
    let mut entries = Vec::new();
    let mut block_start = 0;

    for caps in h2_re.captures_iter(html) {
        let whole = caps.get(0).expect("capture 0 always present");
        let inner = caps.get(1).map(|m| m.as_str()).unwrap_or_default();

        // The station block spans from the end of the previous heading,
        // so the logo image preceding this heading is in range.
        let block = &html[block_start..whole.end()];
        block_start = whole.end();

        let heading = strip_tags(inner);
        if heading.is_empty() || !seen.insert(heading.clone()) {
            continue;
        }

        let Some(detail_url) = href_re.captures(inner).map(|c| c[1].to_string()) else {
            continue;
        };
        if !detail_url.starts_with("http") {
            continue;
        }

        let company = img_re
            .find(block)
            .and_then(|m| alt_re.captures(m.as_str()).map(|c| c[1].to_string()))
            .filter(|alt| !alt.is_empty())
            .unwrap_or_else(|| "unknown".to_string());

        entries.push(ListingEntry {
            heading,
            detail_url,
            company,
        });
    }

    entries
}

/// Parse a station detail page for opening hours and cash prices.
pub fn parse_detail(html: &str) -> StationDetail {
    let opening_hours = html
        .find("activity-hours")
        .and_then(|idx| first_class_text(&html[idx..], "sub-title"))
        .unwrap_or_default();

    let mut prices = FuelPrices::default();

    if let Some(idx) = html.find("info cash") {
        let cash_block = match html[idx..].find("</ul>") {
            Some(end) => &html[idx..idx + end],
            None => &html[idx..],
        };

        let li_re = Regex::new(r"(?s)<li[^>]*>(.*?)</li>").expect("valid regex");
        for item in li_re.captures_iter(cash_block) {
            let item = item.get(1).map(|m| m.as_str()).unwrap_or_default();

            let Some(label) = first_class_text(item, "sub-title") else {
                continue;
            };
            let Some(value) = first_class_text(item, "value") else {
                continue;
            };
            let Some(price) = parse_price_text(&value) else {
                continue;
            };

            match label.as_str() {
                fuel_labels::PETROL_95 => prices.petrol_95 = price,
                fuel_labels::PETROL_98 => prices.petrol_98 = price,
                fuel_labels::DIESEL => prices.diesel = price,
                _ => {}
            }
        }
    }

    StationDetail {
        opening_hours,
        prices,
    }
}

/// Strip the "חדש!" marker prepended to newly listed stations.
pub fn strip_new_prefix(heading: &str) -> &str {
    heading
        .strip_prefix(MIKA_NEW_PREFIX)
        .map(str::trim_start)
        .unwrap_or(heading)
}

/// Parse a scraped price value, tolerating the shekel sign and
/// surrounding whitespace.
pub fn parse_price_text(raw: &str) -> Option<f64> {
    let cleaned = raw.replace('₪', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Inner text of the first element in `fragment` whose class attribute
/// contains `class`.
fn first_class_text(fragment: &str, class: &str) -> Option<String> {
    let re = Regex::new(&format!(
        r#"(?s)<[^>]+class\s*=\s*["'][^"']*{}[^"']*["'][^>]*>(.*?)</"#,
        class
    ))
    .expect("valid regex");

    re.captures(fragment)
        .map(|c| strip_tags(c.get(1).map(|m| m.as_str()).unwrap_or_default()))
        .filter(|text| !text.is_empty())
}

/// Remove markup from an HTML fragment, decode common entities and
/// collapse whitespace runs.
fn strip_tags(fragment: &str) -> String {
    let tag_re = Regex::new(r"<[^>]*>").expect("valid regex");
    let text = tag_re.replace_all(fragment, " ");
    let text = text
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ");

    let ws_re = Regex::new(r"\s+").expect("valid regex");
    ws_re.replace_all(text.trim(), " ").to_string()
}
