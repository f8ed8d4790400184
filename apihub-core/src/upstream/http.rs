use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    config::ServiceConfig,
    error::{ServiceError, ServiceResult},
};

use super::{ServiceKind, Upstream};

/// reqwest-backed [`Upstream`]; cheap to clone, shared across requests.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    service: ServiceKind,
    base_url: Url,
    http: Client,
}

impl HttpUpstream {
    pub fn new(service: ServiceKind, config: &ServiceConfig) -> ServiceResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ServiceError::Config(format!("Invalid base URL '{}' for {service}: {e}", config.base_url))
        })?;

        if base_url.cannot_be_a_base() {
            return Err(ServiceError::Config(format!(
                "Invalid base URL '{}' for {service}: cannot carry a path",
                config.base_url
            )));
        }

        if config.timeout_secs == 0 {
            return Err(ServiceError::Config(format!(
                "Invalid timeout for {service}: must be at least 1 second"
            )));
        }

        if !config.verify_tls {
            warn!(%service, "TLS certificate verification disabled");
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .map_err(|e| ServiceError::Config(format!("Failed to build {service} HTTP client: {e}")))?;

        Ok(Self { service, base_url, http })
    }

    fn endpoint(&self, path: &[&str]) -> ServiceResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ServiceError::Config(format!("Base URL for {} cannot carry a path", self.service))
            })?;
            segments.pop_if_empty().extend(path);
        }
        Ok(url)
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    fn service(&self) -> ServiceKind {
        self.service
    }

    async fn get_json(&self, path: &[&str], query: &[(&str, String)]) -> ServiceResult<Value> {
        let service = self.service;
        let url = self.endpoint(path)?;
        debug!(%service, %url, ?query, "Calling upstream");

        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|source| ServiceError::Network { service, source })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| ServiceError::Network { service, source })?;

        if !status.is_success() {
            warn!(%service, status = status.as_u16(), body = %truncate_body(&body), "Upstream request failed");
            return Err(ServiceError::Upstream { service, status: status.as_u16() });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| {
            debug!(%service, body = %truncate_body(&body), "Upstream body is not JSON");
            ServiceError::invalid_shape(service, format!("body is not valid JSON: {e}"))
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
