use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::{AppState, error::ApiError};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Rejects requests whose `X-API-Key` header is missing or does not match
/// the configured key.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let verdict = match request.headers().get(API_KEY_HEADER) {
        None => Err("No API key provided"),
        Some(key) if key.is_empty() => Err("No API key provided"),
        Some(key) if key.as_bytes() == state.api_key.as_bytes() => Ok(()),
        Some(_) => Err("Invalid API key"),
    };

    match verdict {
        Ok(()) => Ok(next.run(request).await),
        Err(message) => {
            warn!(path = %request.uri().path(), reason = message, "Rejected request");
            Err(ApiError::forbidden(message))
        }
    }
}
