use crate::{
    config::Config,
    error::{ServiceError, ServiceResult},
    upstream::http::HttpUpstream,
};
use async_trait::async_trait;
use serde_json::Value;
use std::{convert::TryFrom, fmt::Debug, sync::Arc};

pub mod http;

/// Third-party API a use case talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    Weather,
    Quotes,
    Countries,
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Weather => "weather",
            ServiceKind::Quotes => "quotes",
            ServiceKind::Countries => "countries",
        }
    }

    pub const fn all() -> &'static [ServiceKind] {
        &[ServiceKind::Weather, ServiceKind::Quotes, ServiceKind::Countries]
    }

    /// Base URL used when the config file does not override it.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ServiceKind::Weather => "https://api.open-meteo.com/v1",
            ServiceKind::Quotes => "https://api.quotable.io",
            ServiceKind::Countries => "https://restcountries.com/v3.1",
        }
    }
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ServiceKind {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "weather" => Ok(ServiceKind::Weather),
            "quotes" => Ok(ServiceKind::Quotes),
            "countries" => Ok(ServiceKind::Countries),
            _ => Err(anyhow::anyhow!(
                "Unknown service '{value}'. Supported services: weather, quotes, countries."
            )),
        }
    }
}

/// One outbound GET per call, returning the decoded JSON body.
///
/// An empty 2xx body decodes to `Value::Null`. Non-2xx statuses surface as
/// [`ServiceError::Upstream`], transport failures as [`ServiceError::Network`].
#[async_trait]
pub trait Upstream: Send + Sync + Debug {
    fn service(&self) -> ServiceKind;

    /// `path` segments are appended to the base URL and percent-encoded.
    async fn get_json(&self, path: &[&str], query: &[(&str, String)]) -> ServiceResult<Value>;
}

/// Construct the HTTP client for `kind` from config.
pub fn upstream_from_config(kind: ServiceKind, config: &Config) -> ServiceResult<Arc<dyn Upstream>> {
    let service_config = config.service_config(kind);
    let client = HttpUpstream::new(kind, &service_config).map_err(|e| match e {
        ServiceError::Config(msg) => ServiceError::Config(format!(
            "{msg}\nHint: check [services.{kind}] in {}",
            Config::config_file_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "the config file".to_string())
        )),
        other => other,
    })?;

    Ok(Arc::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ServiceConfig};

    #[test]
    fn service_kind_as_str_roundtrip() {
        for kind in ServiceKind::all() {
            let s = kind.as_str();
            let parsed = ServiceKind::try_from(s).expect("roundtrip should succeed");
            assert_eq!(*kind, parsed);
        }
    }

    #[test]
    fn unknown_service_error() {
        let err = ServiceKind::try_from("doesnotexist").unwrap_err();
        assert!(err.to_string().contains("Unknown service"));
    }

    #[test]
    fn upstream_from_default_config_works() {
        let cfg = Config::default();
        for kind in ServiceKind::all() {
            let upstream = upstream_from_config(*kind, &cfg).expect("default config must build");
            assert_eq!(upstream.service(), *kind);
        }
    }

    #[test]
    fn upstream_from_config_rejects_bad_base_url() {
        let mut cfg = Config::default();
        cfg.upsert_service_config(
            ServiceKind::Quotes,
            ServiceConfig { base_url: "not a url".into(), ..ServiceConfig::for_kind(ServiceKind::Quotes) },
        );

        let err = upstream_from_config(ServiceKind::Quotes, &cfg).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Invalid base URL"));
        assert!(msg.contains("[services.quotes]"));
    }
}
