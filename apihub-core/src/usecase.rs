//! Use cases shared by the HTTP handlers and the CLI.
//!
//! Each domain service wraps one [`Upstream`] and exposes the only
//! operations callers may use. They are built once from [`Config`] and
//! cloned freely: the upstream client behind them is immutable.

use serde_json::Value;
use std::sync::Arc;

use crate::{
    config::Config,
    error::ServiceResult,
    upstream::{ServiceKind, Upstream, upstream_from_config},
};

pub mod countries;
pub mod health;
pub mod quotes;
pub mod weather;

pub use countries::CountryService;
pub use health::HealthService;
pub use quotes::{QuoteSearch, QuotesService};
pub use weather::{ForecastOptions, WeatherService};

/// Every use case, wired to its upstream.
#[derive(Debug, Clone)]
pub struct Services {
    pub weather: WeatherService,
    pub quotes: QuotesService,
    pub countries: CountryService,
    pub health: HealthService,
}

impl Services {
    pub fn from_config(config: &Config) -> ServiceResult<Self> {
        Ok(Self {
            weather: WeatherService::new(upstream_from_config(ServiceKind::Weather, config)?),
            quotes: QuotesService::new(upstream_from_config(ServiceKind::Quotes, config)?),
            countries: CountryService::new(upstream_from_config(ServiceKind::Countries, config)?),
            health: HealthService::from_config(config),
        })
    }

    /// Wire explicit upstreams, e.g. stubs in tests.
    pub fn with_upstreams(
        weather: Arc<dyn Upstream>,
        quotes: Arc<dyn Upstream>,
        countries: Arc<dyn Upstream>,
        config: &Config,
    ) -> Self {
        Self {
            weather: WeatherService::new(weather),
            quotes: QuotesService::new(quotes),
            countries: CountryService::new(countries),
            health: HealthService::from_config(config),
        }
    }
}

/// Single-entity lookups: a 404 or an empty body means "not found".
fn found(result: ServiceResult<Value>) -> ServiceResult<Option<Value>> {
    match result {
        Ok(Value::Null) => Ok(None),
        Ok(body) => Ok(Some(body)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
pub(crate) mod stub {
    use async_trait::async_trait;
    use serde_json::Value;
    use std::{collections::VecDeque, sync::Mutex};

    use crate::{
        error::{ServiceError, ServiceResult},
        upstream::{ServiceKind, Upstream},
    };

    /// A recorded `get_json` call: path segments and query pairs.
    pub type Call = (Vec<String>, Vec<(String, String)>);

    /// Replays canned responses in order and records every call.
    #[derive(Debug)]
    pub struct StubUpstream {
        service: ServiceKind,
        responses: Mutex<VecDeque<ServiceResult<Value>>>,
        calls: Mutex<Vec<Call>>,
    }

    impl StubUpstream {
        pub fn new(service: ServiceKind, responses: Vec<ServiceResult<Value>>) -> Self {
            Self { service, responses: Mutex::new(responses.into()), calls: Mutex::new(Vec::new()) }
        }

        pub fn ok(service: ServiceKind, body: Value) -> Self {
            Self::new(service, vec![Ok(body)])
        }

        pub fn status(service: ServiceKind, status: u16) -> Self {
            Self::new(service, vec![Err(ServiceError::Upstream { service, status })])
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        pub fn last_call(&self) -> Call {
            self.calls().pop().expect("upstream was never called")
        }
    }

    #[async_trait]
    impl Upstream for StubUpstream {
        fn service(&self) -> ServiceKind {
            self.service
        }

        async fn get_json(&self, path: &[&str], query: &[(&str, String)]) -> ServiceResult<Value> {
            self.calls.lock().unwrap().push((
                path.iter().map(|s| s.to_string()).collect(),
                query.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
            ));
            self.responses.lock().unwrap().pop_front().expect("no canned response left")
        }
    }

    /// Look up a query value by key.
    pub fn param<'a>(call: &'a Call, key: &str) -> Option<&'a str> {
        call.1.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use serde_json::json;

    #[test]
    fn found_maps_404_and_null_to_none() {
        let not_found = Err(ServiceError::Upstream { service: ServiceKind::Countries, status: 404 });
        assert!(found(not_found).unwrap().is_none());
        assert!(found(Ok(Value::Null)).unwrap().is_none());
        assert_eq!(found(Ok(json!({"a": 1}))).unwrap(), Some(json!({"a": 1})));
    }

    #[test]
    fn found_keeps_other_failures() {
        let err = found(Err(ServiceError::Upstream { service: ServiceKind::Countries, status: 500 }))
            .unwrap_err();
        assert_eq!(err.kind(), "upstream_error");
    }

    #[test]
    fn services_build_from_default_config() {
        let services = Services::from_config(&Config::default()).expect("default config must build");
        assert_eq!(services.health.ping().message, "pong");
    }
}
