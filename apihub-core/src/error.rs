use thiserror::Error;

use crate::upstream::ServiceKind;

/// Failure raised while serving a use-case call.
///
/// Every variant carries a message that is safe to show to callers: raw
/// upstream bodies never end up in here.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Transport failure: connect/read timeout, DNS, TLS.
    #[error("Network error calling {service} API: {source}")]
    Network {
        service: ServiceKind,
        #[source]
        source: reqwest::Error,
    },

    /// Upstream answered with a non-2xx status.
    #[error("{service} API request failed with status {status}")]
    Upstream { service: ServiceKind, status: u16 },

    /// Upstream answered 2xx with a body we cannot map.
    #[error("Invalid response format from {service} API: {reason}")]
    InvalidShape { service: ServiceKind, reason: String },

    /// Caller input rejected at the boundary (HTTP query, CLI arguments).
    #[error("{0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ServiceError {
    pub fn invalid_shape(service: ServiceKind, reason: impl Into<String>) -> Self {
        Self::InvalidShape { service, reason: reason.into() }
    }

    /// True for an upstream 404, which lookups turn into "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Upstream { status: 404, .. })
    }

    /// Stable classification string, independent of the message.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network_error",
            Self::Upstream { .. } => "upstream_error",
            Self::InvalidShape { .. } => "invalid_upstream_shape",
            Self::Validation(_) => "validation_error",
            Self::Config(_) => "config_error",
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
