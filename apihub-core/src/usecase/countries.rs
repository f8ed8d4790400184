use std::sync::Arc;
use tracing::{debug, error, instrument};

use crate::{
    error::ServiceResult,
    model::Country,
    normalize::countries::{country_list, first_country},
    upstream::Upstream,
};

use super::found;

/// Country data from REST Countries.
#[derive(Debug, Clone)]
pub struct CountryService {
    upstream: Arc<dyn Upstream>,
}

impl CountryService {
    pub fn new(upstream: Arc<dyn Upstream>) -> Self {
        Self { upstream }
    }

    /// Every country, optionally restricted to the named upstream fields.
    #[instrument(level = "debug", skip(self))]
    pub async fn all(&self, fields: Option<&[String]>) -> ServiceResult<Vec<Country>> {
        let mut params = Vec::new();
        if let Some(fields) = fields.filter(|f| !f.is_empty()) {
            params.push(("fields", fields.join(",")));
        }

        let body = self.upstream.get_json(&["all"], &params).await.inspect_err(|e| {
            error!(error = %e, "Failed to fetch countries");
        })?;

        country_list(body)
    }

    /// First country whose common or official name matches.
    #[instrument(level = "debug", skip(self))]
    pub async fn by_name(&self, name: &str) -> ServiceResult<Option<Country>> {
        let params = [("fullText", "false".to_string())];
        let result = self.upstream.get_json(&["name", name], &params).await;
        lookup(result, name)
    }

    /// Alpha-2 or alpha-3 code, case-insensitive.
    #[instrument(level = "debug", skip(self))]
    pub async fn by_code(&self, code: &str) -> ServiceResult<Option<Country>> {
        let code = code.to_uppercase();
        let result = self.upstream.get_json(&["alpha", &code], &[]).await;
        lookup(result, &code)
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn by_region(&self, region: &str) -> ServiceResult<Vec<Country>> {
        let body = self.upstream.get_json(&["region", region], &[]).await.inspect_err(|e| {
            error!(error = %e, "Failed to fetch countries by region");
        })?;

        country_list(body)
    }
}

fn lookup(result: ServiceResult<serde_json::Value>, key: &str) -> ServiceResult<Option<Country>> {
    let country = match found(result).inspect_err(|e| error!(error = %e, "Failed to fetch country"))? {
        Some(body) => first_country(body)?,
        None => None,
    };

    if country.is_none() {
        debug!(key, "Country not found");
    }
    Ok(country)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ServiceError,
        upstream::ServiceKind,
        usecase::stub::{StubUpstream, param},
    };
    use serde_json::json;

    fn service(stub: &Arc<StubUpstream>) -> CountryService {
        CountryService::new(stub.clone())
    }

    fn usa() -> serde_json::Value {
        json!({ "name": { "common": "United States" }, "cca2": "US", "cca3": "USA" })
    }

    #[tokio::test]
    async fn by_code_is_case_insensitive() {
        let stub = Arc::new(StubUpstream::new(
            ServiceKind::Countries,
            vec![Ok(json!([usa()])), Ok(json!([usa()]))],
        ));
        let svc = service(&stub);

        let lower = svc.by_code("usa").await.unwrap();
        let upper = svc.by_code("USA").await.unwrap();

        assert_eq!(lower, upper);
        assert_eq!(lower.unwrap().cca3, "USA");

        let calls = stub.calls();
        assert_eq!(calls[0].0, vec!["alpha", "USA"]);
        assert_eq!(calls[1].0, vec!["alpha", "USA"]);
    }

    #[tokio::test]
    async fn by_code_404_is_not_found() {
        let stub = Arc::new(StubUpstream::status(ServiceKind::Countries, 404));
        assert!(service(&stub).by_code("zz").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn by_name_takes_first_match() {
        let stub = Arc::new(StubUpstream::ok(
            ServiceKind::Countries,
            json!([usa(), { "name": { "common": "United States Minor Outlying Islands" } }]),
        ));

        let country = service(&stub).by_name("united states").await.unwrap().unwrap();
        assert_eq!(country.name, "United States");

        let call = stub.last_call();
        assert_eq!(call.0, vec!["name", "united states"]);
        assert_eq!(param(&call, "fullText"), Some("false"));
    }

    #[tokio::test]
    async fn by_name_empty_body_is_not_found() {
        for body in [json!(null), json!([])] {
            let stub = Arc::new(StubUpstream::ok(ServiceKind::Countries, body));
            assert!(service(&stub).by_name("atlantis").await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn by_name_server_error_is_error() {
        let stub = Arc::new(StubUpstream::status(ServiceKind::Countries, 503));
        let err = service(&stub).by_name("france").await.unwrap_err();
        assert!(matches!(err, ServiceError::Upstream { status: 503, .. }));
    }

    #[tokio::test]
    async fn all_forwards_fields() {
        let stub = Arc::new(StubUpstream::ok(ServiceKind::Countries, json!([usa(), usa()])));
        let fields = vec!["name".to_string(), "capital".to_string()];

        let countries = service(&stub).all(Some(fields.as_slice())).await.unwrap();
        assert_eq!(countries.len(), 2);

        let call = stub.last_call();
        assert_eq!(call.0, vec!["all"]);
        assert_eq!(param(&call, "fields"), Some("name,capital"));
    }

    #[tokio::test]
    async fn all_without_fields_sends_no_params() {
        let stub = Arc::new(StubUpstream::ok(ServiceKind::Countries, json!([])));
        assert!(service(&stub).all(None).await.unwrap().is_empty());
        assert!(stub.last_call().1.is_empty());
    }

    #[tokio::test]
    async fn by_region_404_is_an_error() {
        let stub = Arc::new(StubUpstream::status(ServiceKind::Countries, 404));
        let err = service(&stub).by_region("Atlantis").await.unwrap_err();
        assert!(err.is_not_found(), "listing keeps the upstream status for the caller");
    }
}
