use anyhow::Result;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use airport_registry::AirportRegistry;
use atmospheric_store::AtmosphericStore;
use weather_metrics::WeatherMetrics;

mod collector_routes;
mod query_routes;

/// Shared handles to the three concurrent tables. Constructed once at
/// startup and cloned into every route handler.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<AirportRegistry>,
    pub store: Arc<AtmosphericStore>,
    pub metrics: Arc<WeatherMetrics>,
}

impl AppState {
    pub fn new() -> Self {
        let store = Arc::new(AtmosphericStore::new());
        Self {
            registry: Arc::new(AirportRegistry::new()),
            metrics: Arc::new(WeatherMetrics::new(Arc::clone(&store))),
            store,
        }
    }
}

/// Error body shared by both route surfaces.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Airports pre-registered at boot so collection sites can report
/// immediately. Reading sets are created lazily on the first update,
/// not here.
const SEED_AIRPORTS: [(&str, &str, &str); 5] = [
    ("BOS", "42.364347", "-71.005181"),
    ("EWR", "40.6925", "-74.168667"),
    ("JFK", "40.639751", "-73.778925"),
    ("LGA", "40.777245", "-73.872608"),
    ("MMU", "40.79935", "-74.4148747"),
];

fn seed_airports(state: &AppState) {
    for (iata, lat, lon) in SEED_AIRPORTS {
        if let Err(err) = state.registry.add(iata, lat, lon) {
            tracing::warn!(iata, %err, "Skipping seed airport");
        }
    }
}

/// Full API surface: collector routes under /collect, query routes
/// under /query.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/collect", collector_routes::collector_router(state.clone()))
        .nest("/query", query_routes::query_router(state))
        .layer(CorsLayer::permissive())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "weather_gateway=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = AppState::new();
    seed_airports(&state);
    tracing::info!("   Seeded {} airports", state.registry.len());

    let app = api_router(state);

    let port = std::env::var("WEATHER_GATEWAY_PORT")
        .or_else(|_| std::env::var("PORT"))
        .unwrap_or_else(|_| "21700".to_string());
    let addr = format!("0.0.0.0:{}", port);

    tracing::info!("Weather Gateway starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "weather-gateway",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
