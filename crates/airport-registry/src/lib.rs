//! Airport registry for the AirWeather observation network.
//!
//! Concurrent key-value store of airport coordinates keyed by IATA code,
//! with great-circle radius search over the current set. Single-key
//! operations are atomic; radius scans see a point-in-time view that may
//! be stale relative to concurrent adds and removes.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub mod geo;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Invalid coordinate pair ({lat}, {lon})")]
    InvalidCoordinate { lat: String, lon: String },
    #[error("Airport not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, RegistryError>;

/// Geographic coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees [-90, 90]
    pub latitude_deg: f64,
    /// Longitude in degrees [-180, 180]
    pub longitude_deg: f64,
}

/// A registered airport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportRecord {
    /// 3-letter IATA code, the registry key
    pub iata: String,
    pub coordinate: Coordinate,
}

/// Concurrent registry of airports keyed by IATA code.
///
/// The registry is the sole owner of airport records: records are
/// created by [`add`](Self::add), replaced whole by a later `add` for
/// the same code, and destroyed by [`remove`](Self::remove).
#[derive(Default)]
pub struct AirportRegistry {
    airports: DashMap<String, AirportRecord>,
}

impl AirportRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            airports: DashMap::new(),
        }
    }

    /// Register an airport, overwriting any existing record for the code.
    ///
    /// Latitude and longitude arrive as text from the collector boundary;
    /// unparseable or out-of-range values are rejected without touching
    /// the registry. Concurrent adds for the same code race to
    /// last-writer-wins.
    pub fn add(&self, iata: &str, latitude: &str, longitude: &str) -> Result<()> {
        let invalid = || RegistryError::InvalidCoordinate {
            lat: latitude.to_string(),
            lon: longitude.to_string(),
        };

        let lat: f64 = latitude.trim().parse().map_err(|_| invalid())?;
        let lon: f64 = longitude.trim().parse().map_err(|_| invalid())?;

        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(invalid());
        }

        self.airports.insert(
            iata.to_string(),
            AirportRecord {
                iata: iata.to_string(),
                coordinate: Coordinate {
                    latitude_deg: lat,
                    longitude_deg: lon,
                },
            },
        );
        info!(iata, lat, lon, "Registered airport");

        Ok(())
    }

    /// Delete an airport record.
    pub fn remove(&self, iata: &str) -> Result<()> {
        match self.airports.remove(iata) {
            Some(_) => {
                info!(iata, "Removed airport");
                Ok(())
            }
            None => Err(RegistryError::NotFound(iata.to_string())),
        }
    }

    /// Get an airport record by IATA code.
    ///
    /// Returns `None` if the airport is not registered.
    pub fn find(&self, iata: &str) -> Option<AirportRecord> {
        self.airports.get(iata).map(|entry| entry.value().clone())
    }

    /// Snapshot of every registered airport; order is unspecified.
    pub fn list_all(&self) -> Vec<AirportRecord> {
        self.airports
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// All airports within `radius_km` of the named airport, itself
    /// included.
    ///
    /// An unknown center yields an empty result rather than an error,
    /// matching the permissive lookup behavior of the query surface.
    /// Result order is unspecified and not stable across calls.
    pub fn find_within_radius(&self, iata: &str, radius_km: f64) -> Vec<AirportRecord> {
        let Some(center) = self.find(iata) else {
            debug!(iata, "Radius scan centered on unknown airport");
            return Vec::new();
        };

        self.airports
            .iter()
            .filter(|entry| geo::distance_km(center.coordinate, entry.coordinate) <= radius_km)
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Number of registered airports.
    pub fn len(&self) -> usize {
        self.airports.len()
    }

    /// Returns true if no airports are registered.
    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }
}
