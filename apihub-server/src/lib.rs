//! HTTP API for the `apihub` service.
//!
//! Routes live in [`api`]; this module wires them to shared state, CORS
//! and request tracing.

use apihub_core::{AppSettings, Config, Services};
use axum::{Router, http::HeaderValue};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

pub mod api;
pub mod auth;
pub mod error;

#[derive(Clone)]
pub struct AppState {
    pub services: Arc<Services>,
    api_key: Arc<str>,
}

impl AppState {
    pub fn new(services: Services, api_key: &str) -> Self {
        Self { services: Arc::new(services), api_key: Arc::from(api_key) }
    }
}

/// Build the full router, everything mounted under `/api/v1`.
pub fn app(config: &Config, services: Services) -> Router {
    let state = AppState::new(services, &config.app.api_key);

    Router::new()
        .nest("/api/v1", api::routes(state.clone()))
        .layer(cors_layer(&config.app))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(app: &AppSettings) -> CorsLayer {
    let origins = app.allowed_origins();

    if origins.iter().any(|o| o == "*") {
        return CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            HeaderValue::from_str(origin)
                .inspect_err(|_| warn!(origin = origin.as_str(), "Ignoring invalid CORS origin"))
                .ok()
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
