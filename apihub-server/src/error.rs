//! JSON error responses.
//!
//! Every failure leaves the server as `{error, message, timestamp}` with a
//! status that depends on what went wrong:
//! - upstream failures: 503 `<domain>_service_error`
//! - missing entities: 404 `not_found` / `quote_not_found`
//! - bad input: 422 `validation_error`
//! - missing or wrong API key: 403 `forbidden`

use apihub_core::{ServiceError, ServiceKind};
use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error};

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    timestamp: DateTime<Utc>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error: &'static str, message: impl Into<String>) -> Self {
        Self { status, error, message: message.into() }
    }

    pub fn not_found(error: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "forbidden", message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "validation_error", message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

fn service_error_code(service: ServiceKind) -> &'static str {
    match service {
        ServiceKind::Weather => "weather_service_error",
        ServiceKind::Quotes => "quotes_service_error",
        ServiceKind::Countries => "country_service_error",
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match &err {
            ServiceError::Network { service, .. }
            | ServiceError::Upstream { service, .. }
            | ServiceError::InvalidShape { service, .. } => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                service_error_code(*service),
                err.to_string(),
            ),
            ServiceError::Validation(message) => Self::validation(message.clone()),
            ServiceError::Config(_) => {
                error!(error = %err, "Service misconfigured");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An unexpected error occurred",
                )
            }
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        debug!(error = %rejection, "Rejected query string");
        Self::validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: self.error, message: self.message, timestamp: Utc::now() };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_errors_map_to_domain_codes() {
        let err: ApiError = ServiceError::Upstream { service: ServiceKind::Countries, status: 500 }.into();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.error, "country_service_error");
        assert_eq!(err.message, "countries API request failed with status 500");
    }

    #[test]
    fn invalid_shape_is_unavailable() {
        let err: ApiError = ServiceError::invalid_shape(ServiceKind::Quotes, "not an object").into();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.error, "quotes_service_error");
    }

    #[test]
    fn validation_is_unprocessable() {
        let err: ApiError = ServiceError::Validation("limit must be between 1 and 150, got 0".into()).into();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.error, "validation_error");
    }

    #[test]
    fn config_errors_hide_details() {
        let err: ApiError = ServiceError::Config("bad base url".into()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("base url"));
    }
}
