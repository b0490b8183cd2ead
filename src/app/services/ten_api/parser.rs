//! Response parsing for the Ten general declaration payload.

use crate::constants::fuel_codes;
use crate::{Error, FuelPrices, Gps, Result, Station};
use serde_json::Value;
use tracing::warn;

/// Company name attached to stations from this source
const COMPANY: &str = "טן";

/// Parse the full declaration payload into stations.
///
/// Station prices of zero fall back to the regulated-price table carried
/// in the same payload. Entries missing required fields are skipped with
/// a warning rather than failing the whole batch.
pub fn parse_general_declaration(response: &Value) -> Result<Vec<Station>> {
    let data = response
        .get("data")
        .ok_or_else(|| Error::upstream_format("ten", "missing 'data' object"))?;

    let stations_arr = data
        .get("stationsArr")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::upstream_format("ten", "missing 'stationsArr' array"))?;

    let regulated = regulated_prices(response);

    let mut stations = Vec::with_capacity(stations_arr.len());
    for entry in stations_arr {
        match map_station(entry, &regulated) {
            Some(station) => stations.push(station),
            None => warn!("Skipping malformed Ten station entry"),
        }
    }

    Ok(stations)
}

/// Extract the regulated self-service prices keyed by fuel-type code.
///
/// Only 95 octane and diesel carry regulated prices; missing entries
/// stay at zero.
pub fn regulated_prices(response: &Value) -> FuelPrices {
    let mut prices = FuelPrices::default();

    let fuel_types = response
        .pointer("/data/fuel_typesArr")
        .and_then(Value::as_array);

    let Some(fuel_types) = fuel_types else {
        return prices;
    };

    for fuel_type in fuel_types {
        let Some(code) = value_as_string(fuel_type.get("code")) else {
            continue;
        };
        let Some(regulated) = fuel_type
            .get("regulated_price_self_service")
            .and_then(value_as_f64)
        else {
            continue;
        };

        match code.as_str() {
            fuel_codes::PETROL_95 => prices.petrol_95 = regulated,
            fuel_codes::DIESEL => prices.diesel = regulated,
            _ => {}
        }
    }

    prices
}

/// Map a single station entry, or None when required fields are missing.
fn map_station(entry: &Value, regulated: &FuelPrices) -> Option<Station> {
    let id: u32 = value_as_string(entry.get("id"))?.parse().ok()?;
    let address = entry.get("full_address")?.as_str()?.to_string();

    let gps = entry.get("gps")?;
    let lat = gps.get("lat").and_then(value_as_f64)?;
    let lng = gps.get("lng").and_then(value_as_f64)?;

    let opening_hours = format_opening_hours(entry.get("opening_hours"));
    let prices = station_prices(entry.get("fuel_prices"), regulated);

    Station::new(
        id,
        address,
        COMPANY.to_string(),
        Gps::new(lat, lng),
        opening_hours,
        prices,
        true,
    )
    .ok()
}

/// Render the per-day opening hours object as display text.
///
/// Each open day contributes a `Day <d>: <from>-<to>, ` fragment; days
/// whose bounds are both "0" are closed and skipped.
fn format_opening_hours(opening_hours: Option<&Value>) -> String {
    let mut rendered = String::new();

    let Some(days) = opening_hours.and_then(Value::as_object) else {
        return rendered;
    };

    for (day, day_obj) in days {
        let Some(hours) = day_obj
            .get("hoursArr")
            .and_then(Value::as_array)
            .and_then(|arr| arr.first())
        else {
            continue;
        };

        let from = value_as_string(hours.get("from_hour")).unwrap_or_default();
        let to = value_as_string(hours.get("to_hour")).unwrap_or_default();

        if from != "0" || to != "0" {
            rendered.push_str(&format!("Day {}: {}-{}, ", day, from, to));
        }
    }

    rendered
}

/// Resolve per-fuel prices, preferring the higher of self-service and
/// cash, with the regulated price as fallback when the result is zero.
fn station_prices(fuel_prices: Option<&Value>, regulated: &FuelPrices) -> FuelPrices {
    let mut prices = FuelPrices::default();

    let Some(by_fuel_type) = fuel_prices
        .and_then(|p| p.get("by_fuel_type"))
        .and_then(Value::as_object)
    else {
        return prices;
    };

    if let Some(fuel) = by_fuel_type.get(fuel_codes::PETROL_95) {
        let self_service = fuel.get("self_service").and_then(value_as_f64).unwrap_or(0.0);
        let cash = fuel.get("cash").and_then(value_as_f64).unwrap_or(0.0);
        prices.petrol_95 = self_service.max(cash);
        if prices.petrol_95 == 0.0 {
            prices.petrol_95 = regulated.petrol_95;
        }
    }

    if let Some(fuel) = by_fuel_type.get(fuel_codes::PETROL_98) {
        if let Some(self_service) = fuel.get("self_service").and_then(value_as_f64) {
            prices.petrol_98 = self_service;
        }
    }

    if let Some(fuel) = by_fuel_type.get(fuel_codes::DIESEL) {
        let self_service = fuel.get("self_service").and_then(value_as_f64).unwrap_or(0.0);
        let cash = fuel.get("cash").and_then(value_as_f64).unwrap_or(0.0);
        prices.diesel = self_service.max(cash);
        if prices.diesel == 0.0 {
            prices.diesel = regulated.diesel;
        }
    }

    prices
}

fn value_as_string(value: Option<&Value>) -> Option<String> {
    let value = value?;
    value.as_str().map(str::to_string).or_else(|| {
        if value.is_number() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

fn value_as_f64(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|raw| raw.parse::<f64>().ok()))
}
