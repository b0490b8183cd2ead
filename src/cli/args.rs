//! Command-line argument definitions for FullTank
//!
//! This module defines the complete CLI interface using the clap derive
//! API: a refresh command driving the source aggregation pipeline and a
//! stations command querying the cached list.

use crate::app::services::station_index::{QueryOptions, SortOrder};
use crate::constants::NEARBY_RADIUS_METERS;
use crate::{Error, Gps, Result, SelectedFuel};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the FullTank station aggregator
///
/// Aggregates Israeli gas station data from the Ten price API, the Mika
/// station directory and a bundled dataset into a queryable local cache.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fulltank",
    version,
    about = "Aggregate Israeli gas station prices into a queryable local cache",
    long_about = "Aggregates gas station data from the Ten price API, the Mika station \
                  directory (HTML crawl with forward geocoding) and a bundled dataset in \
                  ITM grid coordinates. The merged list is cached locally and refreshed \
                  once per calendar month; search, price and nearby queries run against \
                  the cache."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Refresh the station cache from the upstream sources
    Refresh(RefreshArgs),
    /// Query the cached station list
    Stations(StationsArgs),
}

/// Arguments for the refresh command
#[derive(Debug, Clone, Parser)]
pub struct RefreshArgs {
    /// Path to the station cache database
    ///
    /// Defaults to the platform data directory
    /// (e.g. ~/.local/share/fulltank/fulltank.db).
    #[arg(long = "database", value_name = "PATH", help = "Path to the station cache database")]
    pub database: Option<PathBuf>,

    /// Path to the bundled station catalog asset
    #[arg(
        long = "catalog",
        value_name = "FILE",
        help = "Path to the bundled station catalog (JSON)"
    )]
    pub catalog: Option<PathBuf>,

    /// Override the Ten price API endpoint
    #[arg(long = "ten-url", value_name = "URL", help = "Ten price API endpoint")]
    pub ten_url: Option<String>,

    /// Override the Mika directory listing URL
    #[arg(long = "mika-url", value_name = "URL", help = "Mika directory listing URL")]
    pub mika_url: Option<String>,

    /// Override the forward geocoding endpoint
    #[arg(
        long = "geocoder-url",
        value_name = "URL",
        help = "Forward geocoding endpoint (Nominatim search format)"
    )]
    pub geocoder_url: Option<String>,

    /// Refresh even when the cache is current for this month
    ///
    /// By default the refresh is skipped when the stored freshness tag
    /// matches the current month.
    #[arg(long = "force", help = "Refresh even when the cache is current")]
    pub force: bool,

    /// Fetch the sources without saving to the cache
    ///
    /// Useful for previewing what a refresh would collect.
    #[arg(long = "dry-run", help = "Fetch sources without saving to the cache")]
    pub dry_run: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the stations command
#[derive(Debug, Clone, Parser)]
pub struct StationsArgs {
    /// Path to the station cache database
    #[arg(long = "database", value_name = "PATH", help = "Path to the station cache database")]
    pub database: Option<PathBuf>,

    /// Filter stations by address substring (case-insensitive)
    #[arg(
        short = 's',
        long = "search",
        value_name = "TEXT",
        help = "Filter stations by address substring",
        conflicts_with = "near"
    )]
    pub search: Option<String>,

    /// Show stations near a point, as lat,lng in decimal degrees
    #[arg(
        long = "near",
        value_name = "LAT,LNG",
        help = "Show the nearby view around a point (lat,lng)"
    )]
    pub near: Option<String>,

    /// Maximum distance for the nearby view, meters
    #[arg(
        long = "radius",
        value_name = "METERS",
        default_value_t = NEARBY_RADIUS_METERS,
        help = "Maximum distance for the nearby view in meters"
    )]
    pub radius_m: f64,

    /// Fuel used for price display and price sorting
    #[arg(
        long = "fuel",
        value_enum,
        default_value = "95",
        help = "Fuel for price display and sorting"
    )]
    pub fuel: FuelArg,

    /// Result ordering
    #[arg(
        long = "sort",
        value_enum,
        default_value = "distance",
        help = "Sort results by price or by distance"
    )]
    pub sort: SortArg,

    /// Exclude stations from the bundled catalog
    ///
    /// Catalog stations carry regulated default prices rather than live
    /// ones; this flag limits results to live API and crawl sources.
    #[arg(long = "no-catalog", help = "Exclude bundled catalog stations")]
    pub no_catalog: bool,

    /// Output format for results
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,

    /// Output file for results
    ///
    /// If not specified, outputs to stdout
    #[arg(short = 'o', long = "output-file", value_name = "FILE", help = "Output file for results")]
    pub output_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,
}

/// Output format options for query results
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
    /// CSV format for data analysis
    Csv,
}

/// Fuel selection on the command line
#[derive(Debug, Clone, ValueEnum)]
pub enum FuelArg {
    /// 95 octane petrol
    #[value(name = "95")]
    Petrol95,
    /// Diesel
    Diesel,
}

impl FuelArg {
    pub fn to_selected(&self) -> SelectedFuel {
        match self {
            FuelArg::Petrol95 => SelectedFuel::Petrol95,
            FuelArg::Diesel => SelectedFuel::Diesel,
        }
    }
}

/// Sort selection on the command line
#[derive(Debug, Clone, ValueEnum)]
pub enum SortArg {
    /// Ascending by the selected fuel price
    Price,
    /// Ascending by distance from the reference point
    Distance,
}

impl SortArg {
    pub fn to_order(&self) -> SortOrder {
        match self {
            SortArg::Price => SortOrder::Price,
            SortArg::Distance => SortOrder::Distance,
        }
    }
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Commands {
        self.command
            .clone()
            .expect("Command should be present when get_command() is called")
    }
}

impl RefreshArgs {
    /// Validate the refresh command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(catalog) = &self.catalog {
            if !catalog.exists() {
                return Err(Error::configuration(format!(
                    "Catalog file does not exist: {}",
                    catalog.display()
                )));
            }
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl StationsArgs {
    /// Validate the stations command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if self.radius_m <= 0.0 {
            return Err(Error::configuration(
                "Radius must be greater than 0 meters".to_string(),
            ));
        }

        if let Some(near) = &self.near {
            self.parse_near(near)?;
        }

        if let Some(output_file) = &self.output_file {
            if let Some(parent) = output_file.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    return Err(Error::configuration(format!(
                        "Output file directory does not exist: {}",
                        parent.display()
                    )));
                }
            }
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Parse the nearby reference point string
    pub fn parse_near(&self, near: &str) -> Result<Gps> {
        let parts: Vec<&str> = near.split(',').collect();
        if parts.len() != 2 {
            return Err(Error::configuration(
                "Reference point must be in format: lat,lng".to_string(),
            ));
        }

        let lat: f64 = parts[0]
            .trim()
            .parse()
            .map_err(|_| Error::configuration(format!("Invalid latitude: {}", parts[0])))?;
        let lng: f64 = parts[1]
            .trim()
            .parse()
            .map_err(|_| Error::configuration(format!("Invalid longitude: {}", parts[1])))?;

        if !(-90.0..=90.0).contains(&lat) {
            return Err(Error::configuration(format!(
                "Latitude out of range: {}",
                lat
            )));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(Error::configuration(format!(
                "Longitude out of range: {}",
                lng
            )));
        }

        Ok(Gps::new(lat, lng))
    }

    /// Resolve the query options implied by the flags
    pub fn query_options(&self) -> Result<QueryOptions> {
        let origin = match &self.near {
            Some(near) => Some(self.parse_near(near)?),
            None => None,
        };

        Ok(QueryOptions {
            fuel: self.fuel.to_selected(),
            sort: self.sort.to_order(),
            origin,
            include_catalog: !self.no_catalog,
        })
    }
}
