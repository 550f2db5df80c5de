//! Concurrent reading-set table keyed by IATA code.

use dashmap::DashMap;
use tracing::debug;

use crate::{AtmosphericReading, Measurement, Result, SensorKind};

/// Concurrent store of the latest atmospheric reading per airport.
///
/// Readers racing a field update observe either the old or the new
/// reading set whole, never a torn one. Entries may outlive their
/// airport registration (the registry and this table are updated
/// independently); an orphaned entry is unreachable from a radius scan
/// but harmless here.
#[derive(Default)]
pub struct AtmosphericStore {
    readings: DashMap<String, AtmosphericReading>,
}

impl AtmosphericStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            readings: DashMap::new(),
        }
    }

    /// Snapshot of the reading set for one airport.
    pub fn get(&self, iata: &str) -> Option<AtmosphericReading> {
        self.readings.get(iata).map(|entry| entry.value().clone())
    }

    /// Reading sets for each code that has one, in input order.
    ///
    /// Codes without an entry are skipped; blank entries are never
    /// synthesized on the read path.
    pub fn get_many<'a, I>(&self, codes: I) -> Vec<AtmosphericReading>
    where
        I: IntoIterator<Item = &'a str>,
    {
        codes.into_iter().filter_map(|code| self.get(code)).collect()
    }

    /// Create an all-absent reading set for `iata` if none exists yet.
    ///
    /// First writer wins; an existing entry is never overwritten.
    pub fn upsert_empty(&self, iata: &str) {
        self.readings.entry(iata.to_string()).or_default();
    }

    /// Snapshot of every reading set; order is unspecified.
    pub fn list_all(&self) -> Vec<AtmosphericReading> {
        self.readings
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Number of airports with a reading set.
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Returns true if no airport has a reading set.
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Route one measurement to the named sensor field of `iata`'s
    /// reading set, creating the set on first contact.
    ///
    /// The lookup-or-create and the field write happen under the entry
    /// lock, so concurrent updates for the same code serialize cleanly.
    /// Every recognized kind succeeds; see [`AtmosphericReading::apply`]
    /// for the range policy on the mean.
    pub fn apply(&self, iata: &str, kind: &str, measurement: Measurement) -> Result<()> {
        let kind: SensorKind = kind.parse()?;

        let mut entry = self.readings.entry(iata.to_string()).or_default();
        entry.apply(kind, measurement);
        debug!(iata, ?kind, mean = measurement.mean, "Processed sensor update");

        Ok(())
    }
}
