//! Atmospheric observation model for the AirWeather network.
//!
//! One [`AtmosphericReading`] per airport holds the latest accepted
//! [`Measurement`] for each of the six sensor kinds a collector can
//! report. Only the latest measurement per kind is retained; history is
//! out of scope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

mod store;
pub use store::AtmosphericStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Unknown sensor kind: {0}")]
    UnknownSensorKind(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Statistical summary of one sensor over a collection window.
///
/// This is aggregate data shipped by a collection site, not a raw
/// sample; the observation timestamp lives on the owning reading set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub mean: f64,
    pub first: f64,
    /// Second quartile of the window. Collector payloads name this
    /// field either `median` or `second`.
    #[serde(alias = "second")]
    pub median: f64,
    pub last: f64,
    pub count: u32,
}

/// The six sensor kinds a collection site can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    /// Temperature in degrees Celsius
    Temperature,
    /// Wind speed in km/h
    Wind,
    /// Relative humidity in percent
    Humidity,
    /// Precipitation in cm
    Precipitation,
    /// Pressure in mmHg
    Pressure,
    /// Cloud cover in percent
    CloudCover,
}

impl SensorKind {
    /// Accepted mean range for this kind: min inclusive, max exclusive.
    fn accepted_range(self) -> (f64, f64) {
        match self {
            Self::Temperature => (-50.0, 100.0),
            Self::Wind => (0.0, f64::INFINITY),
            Self::Humidity => (0.0, 100.0),
            Self::Precipitation => (0.0, 100.0),
            Self::Pressure => (650.0, 800.0),
            Self::CloudCover => (0.0, 100.0),
        }
    }

    /// Whether a reported mean is plausible for this kind.
    pub fn accepts(self, mean: f64) -> bool {
        let (min, max) = self.accepted_range();
        mean >= min && mean < max
    }
}

impl FromStr for SensorKind {
    type Err = StoreError;

    /// Case-insensitive lookup of a collector-supplied kind name.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "temperature" => Ok(Self::Temperature),
            "wind" => Ok(Self::Wind),
            "humidity" => Ok(Self::Humidity),
            "precipitation" => Ok(Self::Precipitation),
            "pressure" => Ok(Self::Pressure),
            "cloudcover" => Ok(Self::CloudCover),
            _ => Err(StoreError::UnknownSensorKind(s.to_string())),
        }
    }
}

/// Latest accepted measurements for one airport.
///
/// Any subset of the six fields may be absent (never observed).
/// `last_update` is set only when a field write is accepted and never
/// moves backwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AtmosphericReading {
    pub temperature: Option<Measurement>,
    pub wind: Option<Measurement>,
    pub humidity: Option<Measurement>,
    pub precipitation: Option<Measurement>,
    pub pressure: Option<Measurement>,
    pub cloud_cover: Option<Measurement>,
    pub last_update: Option<DateTime<Utc>>,
}

impl AtmosphericReading {
    /// Latest measurement for a kind, if one was ever accepted.
    pub fn measurement(&self, kind: SensorKind) -> Option<Measurement> {
        match kind {
            SensorKind::Temperature => self.temperature,
            SensorKind::Wind => self.wind,
            SensorKind::Humidity => self.humidity,
            SensorKind::Precipitation => self.precipitation,
            SensorKind::Pressure => self.pressure,
            SensorKind::CloudCover => self.cloud_cover,
        }
    }

    /// Apply one measurement, enforcing the kind's plausibility range.
    ///
    /// An implausible mean is discarded: the field and `last_update`
    /// stay as they were and the caller is not signalled. A later valid
    /// measurement for the same kind replaces the stored one whole.
    pub fn apply(&mut self, kind: SensorKind, measurement: Measurement) {
        if !kind.accepts(measurement.mean) {
            debug!(?kind, mean = measurement.mean, "Dropped implausible measurement");
            return;
        }

        let slot = match kind {
            SensorKind::Temperature => &mut self.temperature,
            SensorKind::Wind => &mut self.wind,
            SensorKind::Humidity => &mut self.humidity,
            SensorKind::Precipitation => &mut self.precipitation,
            SensorKind::Pressure => &mut self.pressure,
            SensorKind::CloudCover => &mut self.cloud_cover,
        };
        *slot = Some(measurement);
        self.last_update = Some(Utc::now());
    }
}
