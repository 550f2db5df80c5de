//! Great-circle distance for the observation network.

use crate::Coordinate;

/// Mean Earth radius in km, shared by every distance computation.
pub const EARTH_RADIUS_KM: f64 = 6372.8;

/// Haversine great-circle distance between two coordinates, in km.
///
/// Pure and symmetric; zero for identical coordinates. Callers are
/// responsible for keeping inputs inside valid latitude/longitude
/// ranges.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude_deg.to_radians();
    let lat2 = b.latitude_deg.to_radians();
    let dlat = (b.latitude_deg - a.latitude_deg).to_radians();
    let dlon = (b.longitude_deg - a.longitude_deg).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}
