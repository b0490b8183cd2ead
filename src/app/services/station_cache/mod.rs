//! SQLite-backed station cache
//!
//! Holds the merged station list between refresh cycles, keyed by station
//! id, together with the single freshness tag. Only the refresh path
//! writes; `replace_all` deliberately performs delete-all followed by one
//! insert per station with no enclosing transaction, so a reader mid-
//! refresh can observe an empty or partially populated store — matching
//! the single-writer contract of the upstream design.

#[cfg(test)]
pub mod tests;

use crate::constants::LAST_UPDATED_KEY;
use crate::{Error, FuelPrices, Gps, Result, Station};
use rusqlite::{params, Connection, OpenFlags};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Station cache over a local SQLite file
pub struct StationCache {
    connection: Mutex<Connection>,
}

impl StationCache {
    /// Open or create the cache at the given path
    pub fn open(path: &Path) -> Result<Self> {
        info!("Opening station cache at {}", path.display());

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    Error::io(
                        format!("Failed to create cache directory {}", parent.display()),
                        e,
                    )
                })?;
            }
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_CREATE | OpenFlags::SQLITE_OPEN_READ_WRITE,
        )
        .map_err(|e| Error::database(format!("opening {}", path.display()), e))?;

        Self::create_tables(&conn)?;

        Ok(Self {
            connection: Mutex::new(conn),
        })
    }

    /// Create tables `stations` and `meta`
    fn create_tables(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS stations (
                id INTEGER PRIMARY KEY,
                company TEXT NOT NULL,
                address TEXT NOT NULL,
                opening_hours TEXT NOT NULL,
                lat REAL NOT NULL,
                lng REAL NOT NULL,
                petrol_95 REAL NOT NULL,
                petrol_98 REAL NOT NULL,
                diesel REAL NOT NULL,
                from_api INTEGER NOT NULL
            )",
            [],
        )
        .map_err(|e| Error::database("creating table 'stations'", e))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )
        .map_err(|e| Error::database("creating table 'meta'", e))?;

        Ok(())
    }

    /// Replace the cached list wholesale and stamp the freshness tag.
    ///
    /// Clears existing rows first, then inserts each station individually;
    /// any failure is surfaced to the caller. The tag is written last so
    /// an interrupted save is retried on the next refresh.
    pub async fn replace_all(&self, stations: &[Station], tag: &str) -> Result<()> {
        let conn = self.connection.lock().await;

        debug!("Saving {} stations to cache", stations.len());

        conn.execute("DELETE FROM stations", [])
            .map_err(|e| Error::database("clearing stations", e))?;

        for station in stations {
            conn.execute(
                "INSERT OR REPLACE INTO stations (
                    id, company, address, opening_hours, lat, lng,
                    petrol_95, petrol_98, diesel, from_api
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    station.id,
                    station.company,
                    station.address,
                    station.opening_hours,
                    station.gps.lat,
                    station.gps.lng,
                    station.prices.petrol_95,
                    station.prices.petrol_98,
                    station.prices.diesel,
                    station.from_api as i32,
                ],
            )
            .map_err(|e| Error::database(format!("saving station {}", station.id), e))?;
        }

        conn.execute(
            "INSERT OR REPLACE INTO meta (key, value) VALUES (?1, ?2)",
            params![LAST_UPDATED_KEY, tag],
        )
        .map_err(|e| Error::database("saving freshness tag", e))?;

        Ok(())
    }

    /// Read the full cached station list
    pub async fn read_all(&self) -> Result<Vec<Station>> {
        let conn = self.connection.lock().await;

        let mut stmt = conn
            .prepare(
                "SELECT id, company, address, opening_hours, lat, lng,
                        petrol_95, petrol_98, diesel, from_api
                 FROM stations ORDER BY id",
            )
            .map_err(|e| Error::database("preparing station query", e))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(Station {
                    id: row.get(0)?,
                    company: row.get(1)?,
                    address: row.get(2)?,
                    opening_hours: row.get(3)?,
                    gps: Gps::new(row.get(4)?, row.get(5)?),
                    prices: FuelPrices {
                        petrol_95: row.get(6)?,
                        petrol_98: row.get(7)?,
                        diesel: row.get(8)?,
                    },
                    from_api: row.get::<_, i32>(9)? != 0,
                })
            })
            .map_err(|e| Error::database("reading stations", e))?;

        let mut stations = Vec::new();
        for row in rows {
            stations.push(row.map_err(|e| Error::database("reading station row", e))?);
        }

        debug!("Loaded {} stations from cache", stations.len());
        Ok(stations)
    }

    /// Read the stored freshness tag, None when the cache has never been
    /// written
    pub async fn last_updated(&self) -> Result<Option<String>> {
        let conn = self.connection.lock().await;

        let mut stmt = conn
            .prepare("SELECT value FROM meta WHERE key = ?1")
            .map_err(|e| Error::database("preparing tag query", e))?;

        let mut rows = stmt
            .query(params![LAST_UPDATED_KEY])
            .map_err(|e| Error::database("reading freshness tag", e))?;

        match rows.next() {
            Ok(Some(row)) => {
                let value: String = row
                    .get(0)
                    .map_err(|e| Error::database("reading tag value", e))?;
                Ok(Some(value))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(Error::database("reading freshness tag", e)),
        }
    }
}

/// Builder for StationCache with simplified configuration
pub struct StationCacheBuilder {
    path: Option<PathBuf>,
}

impl StationCacheBuilder {
    pub fn new() -> Self {
        Self { path: None }
    }

    pub fn path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    pub fn build(self) -> Result<StationCache> {
        let path = self
            .path
            .unwrap_or_else(|| PathBuf::from(crate::constants::CACHE_DB_FILENAME));
        StationCache::open(&path)
    }
}

impl Default for StationCacheBuilder {
    fn default() -> Self {
        Self::new()
    }
}
