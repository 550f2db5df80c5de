//! Collector-facing routes: airport registration and sensor updates.
//!
//! Thin adapters over the registry and the atmospheric store; the only
//! logic here is decoding path/body values and mapping domain errors to
//! status codes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use airport_registry::{AirportRecord, RegistryError};
use atmospheric_store::{Measurement, StoreError};

use crate::{AppState, ErrorResponse};

pub fn collector_router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/weather/:iata/:kind", post(update_weather))
        .route("/airports", get(list_airports))
        .route("/airport/:iata", get(get_airport).delete(delete_airport))
        .route("/airport/:iata/:lat/:lon", post(add_airport))
        .with_state(state)
}

type ErrorReply = (StatusCode, Json<ErrorResponse>);

fn reply(status: StatusCode, err: impl ToString) -> ErrorReply {
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

/// Liveness probe for collection sites.
async fn ping() -> &'static str {
    "1"
}

/// Apply one sensor measurement to an airport's reading set.
///
/// An unknown sensor kind is the caller's mistake (400); everything else
/// the store handles is a 200, including measurements it chose to drop.
async fn update_weather(
    State(state): State<AppState>,
    Path((iata, kind)): Path<(String, String)>,
    Json(measurement): Json<Measurement>,
) -> Result<StatusCode, ErrorReply> {
    state
        .store
        .apply(&iata, &kind, measurement)
        .map_err(|err| match err {
            StoreError::UnknownSensorKind(_) => reply(StatusCode::BAD_REQUEST, err),
        })?;

    Ok(StatusCode::OK)
}

async fn list_airports(State(state): State<AppState>) -> Json<Vec<AirportRecord>> {
    Json(state.registry.list_all())
}

async fn get_airport(
    State(state): State<AppState>,
    Path(iata): Path<String>,
) -> Result<Json<AirportRecord>, ErrorReply> {
    state
        .registry
        .find(&iata)
        .map(Json)
        .ok_or_else(|| reply(StatusCode::NOT_FOUND, format!("Airport not found: {iata}")))
}

/// Register an airport and give it an empty reading set.
async fn add_airport(
    State(state): State<AppState>,
    Path((iata, lat, lon)): Path<(String, String, String)>,
) -> Result<StatusCode, ErrorReply> {
    state
        .registry
        .add(&iata, &lat, &lon)
        .map_err(|err| reply(StatusCode::BAD_REQUEST, err))?;
    state.store.upsert_empty(&iata);

    Ok(StatusCode::OK)
}

async fn delete_airport(
    State(state): State<AppState>,
    Path(iata): Path<String>,
) -> Result<StatusCode, ErrorReply> {
    state.registry.remove(&iata).map_err(|err| match err {
        RegistryError::NotFound(_) => reply(StatusCode::NOT_FOUND, err),
        other => reply(StatusCode::BAD_REQUEST, other),
    })?;

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use crate::{api_router, seed_airports, AppState};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use tower::ServiceExt;

    fn app() -> Router {
        let state = AppState::new();
        seed_airports(&state);
        api_router(state)
    }

    fn wind_body(mean: f64) -> Body {
        Body::from(
            serde_json::json!({
                "mean": mean, "first": 10.0, "second": 20.0, "last": 30.0, "count": 10
            })
            .to_string(),
        )
    }

    fn post_measurement(uri: &str, mean: f64) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(wind_body(mean))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_ping_answers_one() {
        let response = app()
            .oneshot(Request::builder().uri("/collect/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"1");
    }

    #[tokio::test]
    async fn test_update_weather_accepts_known_kind() {
        let app = app();
        let response = app
            .clone()
            .oneshot(post_measurement("/collect/weather/BOS/wind", 22.0))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_update_weather_rejects_unknown_kind() {
        let response = app()
            .oneshot(post_measurement("/collect/weather/BOS/visibility", 5.0))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_add_airport_then_get_it_back() {
        let app = app();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/collect/airport/SFO/37.6213/-122.379")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/collect/airport/SFO")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let record = body_json(response).await;
        assert_eq!(record["iata"], "SFO");
        assert!((record["coordinate"]["latitude_deg"].as_f64().unwrap() - 37.6213).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_add_airport_with_bad_latitude_is_client_error() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/collect/airport/SFO/north/-122.379")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_unknown_airport_is_not_found() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/collect/airport/ZZZ")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_airport() {
        let app = app();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/collect/airport/MMU")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Second delete: already gone.
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/collect/airport/MMU")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_airports_returns_seeded_set() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/collect/airports")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let airports = body_json(response).await;
        assert_eq!(airports.as_array().unwrap().len(), 5);
    }
}
