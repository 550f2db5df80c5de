//! Usage metrics for the AirWeather query surface.
//!
//! Counts how often each airport and each radius is queried, and how
//! much of the observation table is fresh. Counters are per-key atomic,
//! monotonically increasing, and reset only by process restart. Read
//! paths return point-in-time snapshots that never block writers and
//! carry no cross-counter consistency guarantee.

use std::collections::HashMap;
use std::sync::Arc;

use atmospheric_store::AtmosphericStore;
use chrono::{Duration, Utc};
use dashmap::DashMap;
use tracing::debug;

/// Slots in the folded radius histogram.
pub const RADIUS_HISTOGRAM_SLOTS: usize = 10;

/// Observations younger than this count as fresh.
const FRESH_WINDOW_HOURS: i64 = 24;

/// Process-wide query counters plus a freshness view over the
/// observation store.
///
/// Holds a shared handle to the store it reports on; construct one at
/// startup and hand it to whichever components record or read metrics.
pub struct WeatherMetrics {
    store: Arc<AtmosphericStore>,
    airport_frequency: DashMap<String, u64>,
    radius_frequency: DashMap<i64, u64>,
}

impl WeatherMetrics {
    pub fn new(store: Arc<AtmosphericStore>) -> Self {
        Self {
            store,
            airport_frequency: DashMap::new(),
            radius_frequency: DashMap::new(),
        }
    }

    /// Record one radius query against the counters.
    ///
    /// The airport does not have to be registered; lookups for unknown
    /// codes are counted too. The radius lands in its integer-floor
    /// bucket. Increments are atomic per key, so concurrent queries for
    /// the same code or bucket never lose counts.
    pub fn record_query(&self, iata: &str, radius_km: f64) {
        *self.airport_frequency.entry(iata.to_string()).or_insert(0) += 1;
        *self
            .radius_frequency
            .entry(radius_km.floor() as i64)
            .or_insert(0) += 1;
        debug!(iata, radius_km, "Recorded query");
    }

    /// Point-in-time copy of the per-airport query counters.
    pub fn airport_frequency_snapshot(&self) -> HashMap<String, u64> {
        self.airport_frequency
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }

    /// Query counts folded into `radius mod 10` slots.
    ///
    /// The fold is lossy (radii 5 and 15 share a slot); it reproduces
    /// the histogram shape the monitoring side has always consumed.
    pub fn radius_histogram(&self) -> [u64; RADIUS_HISTOGRAM_SLOTS] {
        let mut hist = [0u64; RADIUS_HISTOGRAM_SLOTS];
        for entry in self.radius_frequency.iter() {
            let slot = entry.key().rem_euclid(RADIUS_HISTOGRAM_SLOTS as i64) as usize;
            hist[slot] += *entry.value();
        }
        hist
    }

    /// Number of reading sets updated within the past 24 hours.
    pub fn fresh_data_count(&self) -> usize {
        let cutoff = Utc::now() - Duration::hours(FRESH_WINDOW_HOURS);
        self.store
            .list_all()
            .iter()
            .filter(|reading| reading.last_update.is_some_and(|t| t > cutoff))
            .count()
    }
}
