use apihub_core::usecase::health::{DetailedHealth, HealthStatus, Ping};
use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::error;

use crate::{AppState, error::ApiError};

#[derive(Debug, Serialize)]
pub struct PingResponse {
    #[serde(flatten)]
    ping: Ping,
    timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct HealthStatusResponse {
    #[serde(flatten)]
    health: HealthStatus,
    timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct DetailedHealthResponse {
    #[serde(flatten)]
    health: DetailedHealth,
    timestamp: DateTime<Utc>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health/ping", get(ping))
        .route("/health/status", get(status))
        .route("/health/detailed", get(detailed))
}

async fn ping(State(state): State<AppState>) -> Json<PingResponse> {
    Json(PingResponse { ping: state.services.health.ping(), timestamp: Utc::now() })
}

async fn status(State(state): State<AppState>) -> Json<HealthStatusResponse> {
    Json(HealthStatusResponse { health: state.services.health.status(), timestamp: Utc::now() })
}

async fn detailed(State(state): State<AppState>) -> Result<Json<DetailedHealthResponse>, ApiError> {
    let services = state.services.clone();
    let health = tokio::task::spawn_blocking(move || services.health.detailed())
        .await
        .map_err(|e| {
            error!(error = %e, "Detailed health collection failed");
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Failed to collect system metrics",
            )
        })?;

    Ok(Json(DetailedHealthResponse { health, timestamp: Utc::now() }))
}
