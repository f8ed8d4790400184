use std::sync::Arc;
use tracing::{debug, error, instrument};

use crate::{
    error::ServiceResult,
    model::{Page, Quote},
    normalize::quotes::{quote, quote_list, random_quote},
    pagination::PageRequest,
    upstream::Upstream,
};

use super::found;

/// Optional filters for [`QuotesService::search`]. Empty strings and zero
/// lengths count as "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteSearch {
    pub query: Option<String>,
    pub author: Option<String>,
    /// Comma-separated tag list.
    pub tags: Option<String>,
    pub min_length: Option<u32>,
    pub max_length: Option<u32>,
}

impl QuoteSearch {
    fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        push_text(&mut params, "query", self.query.as_deref());
        push_text(&mut params, "author", self.author.as_deref());
        push_text(&mut params, "tags", self.tags.as_deref());
        push_length(&mut params, "minLength", self.min_length);
        push_length(&mut params, "maxLength", self.max_length);
        params
    }
}

fn push_text(params: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<&str>) {
    if let Some(v) = value.filter(|v| !v.is_empty()) {
        params.push((key, v.to_string()));
    }
}

fn push_length(params: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<u32>) {
    if let Some(n) = value.filter(|n| *n > 0) {
        params.push((key, n.to_string()));
    }
}

/// Quotes from Quotable.
#[derive(Debug, Clone)]
pub struct QuotesService {
    upstream: Arc<dyn Upstream>,
}

impl QuotesService {
    pub fn new(upstream: Arc<dyn Upstream>) -> Self {
        Self { upstream }
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn random(&self, tags: Option<&str>, max_length: Option<u32>) -> ServiceResult<Quote> {
        let mut params = Vec::new();
        push_text(&mut params, "tags", tags);
        push_length(&mut params, "maxLength", max_length);

        let body = self.upstream.get_json(&["quotes", "random"], &params).await.inspect_err(|e| {
            error!(error = %e, "Failed to fetch random quote");
        })?;

        random_quote(body)
    }

    /// `Ok(None)` when no quote has this id.
    #[instrument(level = "debug", skip(self))]
    pub async fn by_id(&self, id: &str) -> ServiceResult<Option<Quote>> {
        let result = self.upstream.get_json(&["quotes", id], &[]).await;

        match found(result).inspect_err(|e| error!(error = %e, "Failed to fetch quote"))? {
            Some(body) => quote(body).map(Some),
            None => {
                debug!(id, "Quote not found");
                Ok(None)
            }
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn search(&self, filter: &QuoteSearch, page: PageRequest) -> ServiceResult<Page<Quote>> {
        let mut params = page.query_params();
        params.extend(filter.query_params());

        let body = self.upstream.get_json(&["quotes"], &params).await.inspect_err(|e| {
            error!(error = %e, "Failed to search quotes");
        })?;

        let (quotes, total) = quote_list(body)?;
        Ok(page.paginate(quotes, total))
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn by_author(&self, author_slug: &str, page: PageRequest) -> ServiceResult<Page<Quote>> {
        let mut params = page.query_params();
        params.push(("author", author_slug.to_string()));

        let body = self.upstream.get_json(&["quotes"], &params).await.inspect_err(|e| {
            error!(error = %e, "Failed to fetch quotes by author");
        })?;

        let (quotes, total) = quote_list(body)?;
        Ok(page.paginate(quotes, total))
    }
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

    fn service(stub: &Arc<StubUpstream>) -> QuotesService {
        QuotesService::new(stub.clone())
    }

    fn listing(n: usize, total: Option<u64>) -> serde_json::Value {
        let results: Vec<_> = (0..n)
            .map(|i| json!({ "_id": format!("q{i}"), "content": "c", "author": "A", "length": 1 }))
            .collect();
        match total {
            Some(t) => json!({ "results": results, "totalCount": t }),
            None => json!({ "results": results }),
        }
    }

    #[tokio::test]
    async fn random_forwards_only_set_filters() {
        let stub = Arc::new(StubUpstream::ok(ServiceKind::Quotes, json!([{ "_id": "abc" }])));

        let q = service(&stub).random(Some("wisdom"), Some(0)).await.unwrap();
        assert_eq!(q.id, "abc");

        let call = stub.last_call();
        assert_eq!(call.0, vec!["quotes", "random"]);
        assert_eq!(param(&call, "tags"), Some("wisdom"));
        assert_eq!(param(&call, "maxLength"), None, "zero max length is not sent");
    }

    #[tokio::test]
    async fn random_rejects_empty_array() {
        let stub = Arc::new(StubUpstream::ok(ServiceKind::Quotes, json!([])));
        let err = service(&stub).random(None, None).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidShape { .. }));
    }

    #[tokio::test]
    async fn by_id_404_is_not_found() {
        let stub = Arc::new(StubUpstream::status(ServiceKind::Quotes, 404));
        assert!(service(&stub).by_id("missing").await.unwrap().is_none());
        assert_eq!(stub.last_call().0, vec!["quotes", "missing"]);
    }

    #[tokio::test]
    async fn by_id_other_status_is_error() {
        let stub = Arc::new(StubUpstream::status(ServiceKind::Quotes, 502));
        let err = service(&stub).by_id("abc").await.unwrap_err();
        assert!(matches!(err, ServiceError::Upstream { status: 502, .. }));
    }

    #[tokio::test]
    async fn by_id_returns_quote() {
        let stub = Arc::new(StubUpstream::ok(
            ServiceKind::Quotes,
            json!({ "_id": "abc", "content": "x", "author": "A", "length": 1 }),
        ));
        let q = service(&stub).by_id("abc").await.unwrap().expect("quote exists");
        assert_eq!(q.content, "x");
    }

    #[tokio::test]
    async fn search_paginates_and_forwards_filters() {
        let stub = Arc::new(StubUpstream::ok(ServiceKind::Quotes, listing(3, Some(43))));
        let filter = QuoteSearch {
            query: Some("success".into()),
            author: Some(String::new()),
            tags: Some("wisdom,life".into()),
            min_length: Some(50),
            max_length: None,
        };

        let page = service(&stub).search(&filter, PageRequest::new(40, 20)).await.unwrap();

        assert_eq!(page.count, 3);
        assert_eq!(page.page, 3);
        assert_eq!(page.total_count, Some(43));

        let call = stub.last_call();
        assert_eq!(call.0, vec!["quotes"]);
        assert_eq!(param(&call, "skip"), Some("40"));
        assert_eq!(param(&call, "limit"), Some("20"));
        assert_eq!(param(&call, "query"), Some("success"));
        assert_eq!(param(&call, "author"), None, "empty author is not sent");
        assert_eq!(param(&call, "tags"), Some("wisdom,life"));
        assert_eq!(param(&call, "minLength"), Some("50"));
        assert_eq!(param(&call, "maxLength"), None);
    }

    #[tokio::test]
    async fn by_author_falls_back_to_count_for_total() {
        let stub = Arc::new(StubUpstream::ok(ServiceKind::Quotes, listing(2, None)));

        let page = service(&stub).by_author("albert-einstein", PageRequest::default()).await.unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_count, Some(2));
        assert_eq!(param(&stub.last_call(), "author"), Some("albert-einstein"));
    }
}
