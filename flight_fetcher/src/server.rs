use crate::airlabs::AirLabsGateway;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router};
use axum::routing::{get, post, put};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use shared::airlabs::Flight;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracker::debounce::Debouncer;
use tracker::orchestrator::FetchOrchestrator;
use tracker::viewport::Viewport;

const LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Consider the flight set stale if nothing committed for this long.
const STALE_AFTER_SECONDS: i64 = 900;

/// The presentation surface: reads of the flight collection and state
/// flags, and writes only through the orchestrator's trigger operations.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<FetchOrchestrator<AirLabsGateway>>,
    pub region_events: Debouncer<Viewport>,
}

pub async fn run(state: AppState, shutdown: CancellationToken) -> Result<(), std::io::Error> {
    let app = Router::new()
        .route("/health", get(health))
        .route("/flights", get(flights))
        .route("/status", get(status))
        .route("/refresh", post(refresh))
        .route("/query", put(query))
        .route("/viewport", put(viewport))
        .with_state(state);

    info!("starting server at {LISTEN_ADDR}");
    let listener = TcpListener::bind(LISTEN_ADDR).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
        })
        .await?;
    Ok(())
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let last_error = match state.orchestrator.last_failure() {
        Some(failure) => failure.to_string(),
        None => "none".to_string(),
    };

    let Some(last_updated) = state.orchestrator.store().last_updated() else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("No successful flight fetch yet. Last error: {last_error}"),
        );
    };

    if (Utc::now() - last_updated) > TimeDelta::seconds(STALE_AFTER_SECONDS) {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!(
                "Flights not updated in the last {STALE_AFTER_SECONDS} seconds. Last successful update: {last_updated}. Last error: {last_error}"
            ),
        )
    } else {
        (
            StatusCode::OK,
            format!("Flights last successfully fetched: {last_updated}"),
        )
    }
}

async fn flights(State(state): State<AppState>) -> Json<Vec<Flight>> {
    Json((*state.orchestrator.flights()).clone())
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    viewport: Viewport,
    query: String,
    is_loading: bool,
    refreshing: bool,
    flight_count: usize,
    last_updated: Option<DateTime<Utc>>,
    last_failure: Option<String>,
}

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let orchestrator = &state.orchestrator;
    Json(StatusResponse {
        viewport: orchestrator.viewport(),
        query: orchestrator.query(),
        is_loading: orchestrator.is_loading(),
        refreshing: orchestrator.refreshing(),
        flight_count: orchestrator.flights().len(),
        last_updated: orchestrator.store().last_updated(),
        last_failure: orchestrator.last_failure().map(|f| f.to_string()),
    })
}

async fn refresh(State(state): State<AppState>) -> StatusCode {
    state.orchestrator.on_manual_refresh().await;
    StatusCode::NO_CONTENT
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    query: String,
}

async fn query(State(state): State<AppState>, Json(body): Json<QueryBody>) -> StatusCode {
    state.orchestrator.on_query_changed(body.query).await;
    StatusCode::NO_CONTENT
}

async fn viewport(
    State(state): State<AppState>,
    Json(viewport): Json<Viewport>,
) -> impl IntoResponse {
    if viewport.latitude_delta < 0.0 || viewport.longitude_delta < 0.0 {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            "viewport deltas must be non-negative",
        )
            .into_response();
    }
    // Debounced like a map gesture stream: only the trailing event fetches.
    state.region_events.call(viewport);
    StatusCode::ACCEPTED.into_response()
}
