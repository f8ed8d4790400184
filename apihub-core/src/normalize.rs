//! Pure transforms from upstream JSON into the stable entities in
//! [`crate::model`].
//!
//! Each upstream shape is mirrored by a `Raw*` record whose field defaults
//! are declared with `#[serde(default)]`: a missing or `null` number becomes
//! `0`, a string becomes `""`, a list becomes `[]`, and optional fields stay
//! `None`. Anything that cannot be decoded at all is an
//! [`ServiceError::InvalidShape`].

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    error::{ServiceError, ServiceResult},
    upstream::ServiceKind,
};

pub mod countries;
pub mod quotes;
pub mod weather;

/// Treat an explicit `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn decode<T: DeserializeOwned>(service: ServiceKind, value: Value) -> ServiceResult<T> {
    serde_json::from_value(value).map_err(|e| ServiceError::invalid_shape(service, e.to_string()))
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub(crate) fn expect_object(service: ServiceKind, value: &Value) -> ServiceResult<()> {
    if value.is_object() {
        Ok(())
    } else {
        Err(ServiceError::invalid_shape(
            service,
            format!("expected an object, got {}", json_type(value)),
        ))
    }
}
