use std::sync::Arc;
use tracing::{error, instrument};

use crate::{
    error::ServiceResult,
    model::WeatherReport,
    normalize::weather::{
        CURRENT_VARIABLES, DAILY_HORIZON, DAILY_VARIABLES, HOURLY_HORIZON, HOURLY_VARIABLES,
        weather_report,
    },
    upstream::Upstream,
};

pub const DEFAULT_TIMEZONE: &str = "auto";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastOptions {
    pub include_hourly: bool,
    pub include_daily: bool,
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self { include_hourly: true, include_daily: true }
    }
}

/// Current conditions and forecasts from Open-Meteo.
#[derive(Debug, Clone)]
pub struct WeatherService {
    upstream: Arc<dyn Upstream>,
}

impl WeatherService {
    pub fn new(upstream: Arc<dyn Upstream>) -> Self {
        Self { upstream }
    }

    /// Current conditions only. Coordinates are trusted to be in range.
    #[instrument(level = "debug", skip(self))]
    pub async fn current(
        &self,
        latitude: f64,
        longitude: f64,
        timezone: &str,
    ) -> ServiceResult<WeatherReport> {
        let query = base_query(latitude, longitude, timezone);

        let body = self.upstream.get_json(&["forecast"], &query).await.inspect_err(|e| {
            error!(error = %e, "Failed to fetch current weather");
        })?;

        weather_report(body, latitude, longitude, timezone, false, false)
    }

    /// Current conditions plus the requested forecast blocks.
    #[instrument(level = "debug", skip(self))]
    pub async fn forecast(
        &self,
        latitude: f64,
        longitude: f64,
        timezone: &str,
        options: ForecastOptions,
    ) -> ServiceResult<WeatherReport> {
        let mut query = base_query(latitude, longitude, timezone);

        if options.include_hourly {
            query.push(("hourly", HOURLY_VARIABLES.join(",")));
            query.push(("forecast_hours", HOURLY_HORIZON.to_string()));
        }
        if options.include_daily {
            query.push(("daily", DAILY_VARIABLES.join(",")));
            query.push(("forecast_days", DAILY_HORIZON.to_string()));
        }

        let body = self.upstream.get_json(&["forecast"], &query).await.inspect_err(|e| {
            error!(error = %e, "Failed to fetch weather forecast");
        })?;

        weather_report(
            body,
            latitude,
            longitude,
            timezone,
            options.include_hourly,
            options.include_daily,
        )
    }
}

fn base_query(latitude: f64, longitude: f64, timezone: &str) -> Vec<(&'static str, String)> {
    vec![
        ("latitude", latitude.to_string()),
        ("longitude", longitude.to_string()),
        ("current", CURRENT_VARIABLES.join(",")),
        ("timezone", timezone.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ServiceError,
        upstream::ServiceKind,
        usecase::stub::{StubUpstream, param},
    };
    use serde_json::json;

    fn service(stub: &Arc<StubUpstream>) -> WeatherService {
        WeatherService::new(stub.clone())
    }

    #[tokio::test]
    async fn current_requests_only_current_block() {
        let stub = Arc::new(StubUpstream::ok(
            ServiceKind::Weather,
            json!({ "timezone": "Europe/Berlin", "current": { "temperature_2m": 3.5, "weather_code": 45 } }),
        ));

        let report = service(&stub).current(52.52, 13.41, DEFAULT_TIMEZONE).await.unwrap();

        assert_eq!(report.timezone, "Europe/Berlin");
        assert_eq!(report.current.weather_description, "Foggy");
        assert!(report.hourly.is_none());

        let call = stub.last_call();
        assert_eq!(call.0, vec!["forecast"]);
        assert_eq!(param(&call, "latitude"), Some("52.52"));
        assert_eq!(param(&call, "longitude"), Some("13.41"));
        assert_eq!(param(&call, "timezone"), Some("auto"));
        assert!(param(&call, "current").unwrap().contains("surface_pressure"));
        assert_eq!(param(&call, "hourly"), None);
        assert_eq!(param(&call, "daily"), None);
    }

    #[tokio::test]
    async fn current_ignores_forecast_blocks_in_body() {
        let stub = Arc::new(StubUpstream::ok(
            ServiceKind::Weather,
            json!({ "current": {}, "hourly": { "time": ["2024-01-01T00:00"] } }),
        ));

        let report = service(&stub).current(0.0, 0.0, "UTC").await.unwrap();
        assert!(report.hourly.is_none());
        assert_eq!(report.timezone, "UTC");
    }

    #[tokio::test]
    async fn forecast_requests_horizons() {
        let stub = Arc::new(StubUpstream::ok(
            ServiceKind::Weather,
            json!({
                "current": {},
                "hourly": { "time": ["2024-01-01T00:00", "2024-01-01T01:00"] },
                "daily": { "time": ["2024-01-01"] }
            }),
        ));

        let report = service(&stub)
            .forecast(1.0, 2.0, DEFAULT_TIMEZONE, ForecastOptions::default())
            .await
            .unwrap();

        assert_eq!(report.hourly.unwrap().len(), 2);
        assert_eq!(report.daily.unwrap().len(), 1);

        let call = stub.last_call();
        assert_eq!(param(&call, "forecast_hours"), Some("48"));
        assert_eq!(param(&call, "forecast_days"), Some("7"));
        assert!(param(&call, "hourly").unwrap().contains("precipitation_probability"));
        assert!(param(&call, "daily").unwrap().contains("wind_speed_10m_max"));
    }

    #[tokio::test]
    async fn forecast_without_daily_omits_daily_params() {
        let stub = Arc::new(StubUpstream::ok(ServiceKind::Weather, json!({ "current": {} })));
        let options = ForecastOptions { include_hourly: true, include_daily: false };

        let report = service(&stub).forecast(1.0, 2.0, "auto", options).await.unwrap();
        assert!(report.daily.is_none());

        let call = stub.last_call();
        assert_eq!(param(&call, "forecast_hours"), Some("48"));
        assert_eq!(param(&call, "forecast_days"), None);
    }

    #[tokio::test]
    async fn upstream_failure_propagates() {
        let stub = Arc::new(StubUpstream::status(ServiceKind::Weather, 500));
        let err = service(&stub).current(0.0, 0.0, "auto").await.unwrap_err();
        assert!(matches!(err, ServiceError::Upstream { status: 500, .. }));
    }

    #[tokio::test]
    async fn weather_404_is_an_error_not_a_miss() {
        let stub = Arc::new(StubUpstream::status(ServiceKind::Weather, 404));
        let err = service(&stub).forecast(0.0, 0.0, "auto", ForecastOptions::default()).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
