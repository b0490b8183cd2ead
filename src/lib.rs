//! FullTank Library
//!
//! A Rust library for aggregating Israeli gas station data from live web
//! sources and a bundled dataset into a queryable local cache.
//!
//! This library provides tools for:
//! - Fetching station listings from the Ten price API (JSON)
//! - Crawling the Mika station directory (HTML) with forward geocoding
//! - Loading the bundled station catalog with ITM-to-WGS84 conversion
//! - Merging all sources behind a month-granularity freshness gate
//! - Caching the merged list in a SQLite store keyed by station id
//! - Filtering, sorting and nearby queries over the merged list

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod asset_catalog;
        pub mod mika_crawler;
        pub mod refresh;
        pub mod station_cache;
        pub mod station_index;
        pub mod ten_api;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{FuelPrices, Gps, Ranked, SelectedFuel, Station};
pub use config::Config;

/// Result type alias for FullTank operations
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error types for station aggregation operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// HTTP request failed
    #[error("HTTP error while {context}: {source}")]
    Http {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    /// JSON deserialization error
    #[error("JSON parsing error in {context}: {message}")]
    JsonParsing {
        context: String,
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Upstream payload did not match the expected shape
    #[error("Unexpected payload from '{source_name}': {message}")]
    UpstreamFormat { source_name: String, message: String },

    /// Forward geocoding lookup failed
    #[error("Geocoding failed for '{query}': {message}")]
    Geocoding { query: String, message: String },

    /// Station cache database error
    #[error("Station cache error while {context}: {source}")]
    Database {
        context: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Bundled catalog file error
    #[error("Catalog error in '{path}': {message}")]
    Catalog { path: String, message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Data validation error
    #[error("Data validation error: {message}")]
    DataValidation { message: String },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create an HTTP error with request context
    pub fn http(context: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Http {
            context: context.into(),
            source,
        }
    }

    /// Create a JSON parsing error with context
    pub fn json_parsing(
        context: impl Into<String>,
        message: impl Into<String>,
        source: Option<serde_json::Error>,
    ) -> Self {
        Self::JsonParsing {
            context: context.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an upstream format error
    pub fn upstream_format(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UpstreamFormat {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create a geocoding error
    pub fn geocoding(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Geocoding {
            query: query.into(),
            message: message.into(),
        }
    }

    /// Create a station cache error with operation context
    pub fn database(context: impl Into<String>, source: rusqlite::Error) -> Self {
        Self::Database {
            context: context.into(),
            source,
        }
    }

    /// Create a bundled catalog error
    pub fn catalog(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Catalog {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Self::Http {
            context: "performing HTTP request".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::JsonParsing {
            context: "unknown".to_string(),
            message: "JSON parsing failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        Self::Database {
            context: "executing statement".to_string(),
            source: error,
        }
    }
}
