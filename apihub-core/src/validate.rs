//! Boundary checks shared by the HTTP handlers and the CLI. Use cases
//! assume their inputs already passed through here.

use crate::{
    error::{ServiceError, ServiceResult},
    pagination::MAX_LIMIT,
};

pub fn latitude(value: f64) -> ServiceResult<f64> {
    in_range("latitude", value, -90.0, 90.0)
}

pub fn longitude(value: f64) -> ServiceResult<f64> {
    in_range("longitude", value, -180.0, 180.0)
}

fn in_range(name: &str, value: f64, min: f64, max: f64) -> ServiceResult<f64> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ServiceError::Validation(format!("{name} must be between {min} and {max}, got {value}")))
    }
}

/// Page size: `1..=150`.
pub fn limit(value: u32) -> ServiceResult<u32> {
    if (1..=MAX_LIMIT).contains(&value) {
        Ok(value)
    } else {
        Err(ServiceError::Validation(format!("limit must be between 1 and {MAX_LIMIT}, got {value}")))
    }
}

/// Optional character-length filter; when set it must be at least 1.
pub fn length_filter(name: &str, value: Option<u32>) -> ServiceResult<Option<u32>> {
    match value {
        Some(0) => Err(ServiceError::Validation(format!("{name} must be at least 1"))),
        other => Ok(other),
    }
}
