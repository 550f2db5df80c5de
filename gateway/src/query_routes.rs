//! Query-facing routes: radius weather lookups and health stats.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use atmospheric_store::AtmosphericReading;
use weather_metrics::RADIUS_HISTOGRAM_SLOTS;

use crate::{AppState, ErrorResponse};

pub fn query_router(state: AppState) -> Router {
    Router::new()
        .route("/weather/:iata/:radius", get(weather_in_radius))
        .route("/ping", get(health_stats))
        .with_state(state)
}

/// Health aggregate consumed by the monitoring side: fresh-data count
/// plus request-frequency counters.
#[derive(Serialize)]
pub struct HealthStats {
    pub datasize: usize,
    pub iata_freq: HashMap<String, u64>,
    pub radius_freq: [u64; RADIUS_HISTOGRAM_SLOTS],
}

/// Latest readings for every airport within `radius` km of `iata`.
///
/// Unknown centers degrade to an empty list; only a non-numeric radius
/// is the caller's mistake. Every lookup is counted, known or not.
async fn weather_in_radius(
    State(state): State<AppState>,
    Path((iata, radius)): Path<(String, String)>,
) -> Result<Json<Vec<AtmosphericReading>>, (StatusCode, Json<ErrorResponse>)> {
    let radius_km: f64 = radius.trim().parse().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Invalid radius: {radius}"),
            }),
        )
    })?;

    state.metrics.record_query(&iata, radius_km);

    let in_radius = state.registry.find_within_radius(&iata, radius_km);
    let readings = state
        .store
        .get_many(in_radius.iter().map(|airport| airport.iata.as_str()));

    Ok(Json(readings))
}

async fn health_stats(State(state): State<AppState>) -> Json<HealthStats> {
    Json(HealthStats {
        datasize: state.metrics.fresh_data_count(),
        iata_freq: state.metrics.airport_frequency_snapshot(),
        radius_freq: state.metrics.radius_histogram(),
    })
}
