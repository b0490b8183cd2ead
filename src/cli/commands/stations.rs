//! Stations command implementation
//!
//! Queries the cached station list: address search or nearby view, with
//! price/distance ordering and human, JSON or CSV output.

use super::shared::{setup_logging, write_report};
use crate::app::services::station_cache::StationCacheBuilder;
use crate::app::services::station_index::{QueryOptions, StationIndex};
use crate::cli::args::{OutputFormat, StationsArgs};
use crate::{Config, Ranked, Result, SelectedFuel};
use colored::*;
use tracing::{debug, info};

/// Stations command runner
pub async fn run_stations(args: StationsArgs) -> Result<()> {
    setup_logging(args.get_log_level(), false)?;

    info!("Querying cached station list");
    debug!("Stations arguments: {:?}", args);

    args.validate()?;

    let database_path = args
        .database
        .clone()
        .unwrap_or_else(|| Config::default().database_path);

    let cache = StationCacheBuilder::new().path(database_path).build()?;
    let stations = cache.read_all().await?;
    let index = StationIndex::new(stations);

    info!("Loaded {} stations from cache", index.station_count());

    let opts = args.query_options()?;

    let results = match opts.origin {
        Some(origin) => index.nearby(origin, args.radius_m, &opts),
        None => index.search(args.search.as_deref().unwrap_or(""), &opts),
    };

    let report = match args.output_format {
        OutputFormat::Human => human_report(&args, &opts, &results, index.station_count()),
        OutputFormat::Json => json_report(&results)?,
        OutputFormat::Csv => csv_report(&results),
    };

    write_report(args.output_file.as_deref(), &report)?;

    Ok(())
}

/// Render results as a human-readable listing
fn human_report(
    args: &StationsArgs,
    opts: &QueryOptions,
    results: &[Ranked],
    total: usize,
) -> String {
    let mut output = String::new();

    let scope = match (&args.near, &args.search) {
        (Some(near), _) => format!("within {:.0}m of {}", args.radius_m, near),
        (None, Some(search)) => format!("matching '{}'", search),
        (None, None) => "in cache".to_string(),
    };

    output.push_str(&format!(
        "{} {} of {} stations {}\n\n",
        "⛽".bold(),
        results.len(),
        total,
        scope
    ));

    if results.is_empty() {
        output.push_str("No stations found.\n");
        if args.near.is_some() {
            output.push_str(&format!(
                "No stations within {}km of the reference point.\n",
                args.radius_m / 1000.0
            ));
        }
        return output;
    }

    for ranked in results {
        let station = &ranked.station;
        let price = opts.fuel.price_of(&station.prices);
        let price_text = if price == 0.0 {
            "₪ --".dimmed().to_string()
        } else {
            format!("₪{:.2}", price).bold().to_string()
        };
        let fuel_name = match opts.fuel {
            SelectedFuel::Petrol95 => "95",
            SelectedFuel::Diesel => "diesel",
        };

        output.push_str(&format!(
            "  {:>5}  {}  [{}]\n",
            station.id,
            station.address.bold(),
            station.company
        ));
        output.push_str(&format!("         {} ({})", price_text, fuel_name));

        if opts.origin.is_some() {
            output.push_str(&format!("  ·  {}", ranked.format_distance()));
        }
        if !station.from_api {
            output.push_str(&format!("  ·  {}", "catalog".dimmed()));
        }
        output.push('\n');

        if !station.opening_hours.is_empty() {
            output.push_str(&format!("         {}\n", station.opening_hours.dimmed()));
        }
    }

    output
}

/// Render results as a JSON array
fn json_report(results: &[Ranked]) -> Result<String> {
    let entries: Vec<serde_json::Value> = results
        .iter()
        .map(|ranked| {
            let mut entry = serde_json::to_value(&ranked.station)
                .unwrap_or_else(|_| serde_json::Value::Null);
            if let Some(object) = entry.as_object_mut() {
                object.insert(
                    "distance_m".to_string(),
                    serde_json::json!(ranked.distance_m),
                );
            }
            entry
        })
        .collect();

    serde_json::to_string_pretty(&entries).map_err(|e| {
        crate::Error::json_parsing("stations report", "failed to serialize results", Some(e))
    })
}

/// Render results as CSV rows
fn csv_report(results: &[Ranked]) -> String {
    let mut output =
        String::from("id,company,address,lat,lng,petrol_95,petrol_98,diesel,from_api,distance_m\n");

    for ranked in results {
        let station = &ranked.station;
        output.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{:.0}\n",
            station.id,
            csv_field(&station.company),
            csv_field(&station.address),
            station.gps.lat,
            station.gps.lng,
            station.prices.petrol_95,
            station.prices.petrol_98,
            station.prices.diesel,
            station.from_api,
            ranked.distance_m
        ));
    }

    output
}

/// Quote a CSV field when it carries separators or quotes
fn csv_field(raw: &str) -> String {
    if raw.contains(',') || raw.contains('"') || raw.contains('\n') {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FuelPrices, Gps, Station};

    fn ranked(id: u32, address: &str, distance_m: f64) -> Ranked {
        Ranked {
            station: Station::new(
                id,
                address.to_string(),
                "טן".to_string(),
                Gps::new(32.0853, 34.7818),
                String::new(),
                FuelPrices::new(7.1, 7.4, 6.9),
                true,
            )
            .unwrap(),
            distance_m,
        }
    }

    #[test]
    fn test_csv_report_quotes_fields_with_commas() {
        let results = vec![ranked(1, "דרך נמיר 100, תל אביב", 420.0)];
        let csv = csv_report(&results);

        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("id,company,address"));
        let row = lines.next().unwrap();
        assert!(row.contains("\"דרך נמיר 100, תל אביב\""));
        assert!(row.ends_with("420"));
    }

    #[test]
    fn test_json_report_includes_distance() {
        let results = vec![ranked(1, "address", 1234.5)];
        let json = json_report(&results).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed[0]["id"], 1);
        assert!((parsed[0]["distance_m"].as_f64().unwrap() - 1234.5).abs() < 1e-9);
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
