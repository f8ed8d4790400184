use apihub_core::{
    WeatherReport,
    usecase::{ForecastOptions, weather::DEFAULT_TIMEZONE},
    validate,
};
use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct CurrentParams {
    latitude: f64,
    longitude: f64,
    #[serde(default = "default_timezone")]
    timezone: String,
}

#[derive(Debug, Deserialize)]
pub struct ForecastParams {
    latitude: f64,
    longitude: f64,
    #[serde(default = "default_timezone")]
    timezone: String,
    #[serde(default = "enabled")]
    hourly: bool,
    #[serde(default = "enabled")]
    daily: bool,
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn enabled() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct WeatherResponse {
    #[serde(flatten)]
    report: WeatherReport,
    timestamp: DateTime<Utc>,
}

impl From<WeatherReport> for WeatherResponse {
    fn from(report: WeatherReport) -> Self {
        Self { report, timestamp: Utc::now() }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/weather/current", get(current)).route("/weather/forecast", get(forecast))
}

async fn current(
    State(state): State<AppState>,
    query: Result<Query<CurrentParams>, QueryRejection>,
) -> Result<Json<WeatherResponse>, ApiError> {
    let Query(params) = query?;
    let latitude = validate::latitude(params.latitude)?;
    let longitude = validate::longitude(params.longitude)?;

    info!(latitude, longitude, "Current weather requested");
    let report = state.services.weather.current(latitude, longitude, &params.timezone).await?;

    Ok(Json(report.into()))
}

async fn forecast(
    State(state): State<AppState>,
    query: Result<Query<ForecastParams>, QueryRejection>,
) -> Result<Json<WeatherResponse>, ApiError> {
    let Query(params) = query?;
    let latitude = validate::latitude(params.latitude)?;
    let longitude = validate::longitude(params.longitude)?;
    let options = ForecastOptions { include_hourly: params.hourly, include_daily: params.daily };

    info!(latitude, longitude, hourly = params.hourly, daily = params.daily, "Forecast requested");
    let report = state
        .services
        .weather
        .forecast(latitude, longitude, &params.timezone, options)
        .await?;

    Ok(Json(report.into()))
}
