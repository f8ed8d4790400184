//! API v1 handlers
//!
//! - `GET /health/ping`, `GET /health/status`, `GET /health/detailed` (open)
//! - `GET /weather/current`, `GET /weather/forecast`
//! - `GET /quotes`, `GET /quotes/random`, `GET /quotes/{id}`,
//!   `GET /quotes/author/{slug}`
//! - `GET /countries/all`, `GET /countries/name/{name}`,
//!   `GET /countries/code/{code}`, `GET /countries/region/{region}`
//!
//! Everything except health sits behind the API key check.

use axum::{Router, middleware};

use crate::{AppState, auth::require_api_key};

pub mod countries;
pub mod health;
pub mod quotes;
pub mod weather;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .merge(weather::routes())
        .merge(quotes::routes())
        .merge(countries::routes())
        .route_layer(middleware::from_fn_with_state(state, require_api_key));

    Router::new().merge(health::routes()).merge(protected)
}
