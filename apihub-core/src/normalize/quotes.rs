use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{ServiceError, ServiceResult},
    model::Quote,
    upstream::ServiceKind,
};

use super::{decode, expect_object, json_type, null_as_default};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawQuote {
    #[serde(rename = "_id", deserialize_with = "null_as_default")]
    id: String,
    #[serde(deserialize_with = "null_as_default")]
    content: String,
    #[serde(deserialize_with = "null_as_default")]
    author: String,
    #[serde(rename = "authorSlug")]
    author_slug: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    tags: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    length: i64,
    #[serde(rename = "dateAdded")]
    date_added: Option<String>,
    #[serde(rename = "dateModified")]
    date_modified: Option<String>,
}

impl From<RawQuote> for Quote {
    fn from(raw: RawQuote) -> Self {
        Quote {
            id: raw.id,
            content: raw.content,
            author: raw.author,
            author_slug: raw.author_slug,
            tags: raw.tags,
            length: raw.length,
            date_added: raw.date_added,
            date_modified: raw.date_modified,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawQuoteList {
    #[serde(deserialize_with = "null_as_default")]
    results: Vec<RawQuote>,
    #[serde(rename = "totalCount")]
    total_count: Option<u64>,
}

/// A single quote object.
pub fn quote(body: Value) -> ServiceResult<Quote> {
    expect_object(ServiceKind::Quotes, &body)?;
    let raw: RawQuote = decode(ServiceKind::Quotes, body)?;
    Ok(raw.into())
}

/// The random endpoint answers with either a bare object or a one-element
/// array; anything else is rejected.
pub fn random_quote(body: Value) -> ServiceResult<Quote> {
    match body {
        Value::Array(mut items) if items.len() == 1 => quote(items.remove(0)),
        Value::Array(items) => Err(ServiceError::invalid_shape(
            ServiceKind::Quotes,
            format!("expected exactly one random quote, got {}", items.len()),
        )),
        object @ Value::Object(_) => quote(object),
        other => Err(ServiceError::invalid_shape(
            ServiceKind::Quotes,
            format!("expected an object or array, got {}", json_type(&other)),
        )),
    }
}

/// `{results, totalCount}` listing. Returns the quotes and the upstream
/// total, if it reported one.
pub fn quote_list(body: Value) -> ServiceResult<(Vec<Quote>, Option<u64>)> {
    expect_object(ServiceKind::Quotes, &body)?;
    let raw: RawQuoteList = decode(ServiceKind::Quotes, body)?;
    Ok((raw.results.into_iter().map(Quote::from).collect(), raw.total_count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn abc() -> Quote {
        Quote {
            id: "abc".into(),
            content: "x".into(),
            author: "A".into(),
            author_slug: None,
            tags: vec![],
            length: 0,
            date_added: None,
            date_modified: None,
        }
    }

    #[test]
    fn random_quote_accepts_single_element_array() {
        let body = json!([{ "_id": "abc", "content": "x", "author": "A" }]);
        assert_eq!(random_quote(body).unwrap(), abc());
    }

    #[test]
    fn random_quote_accepts_bare_object() {
        let body = json!({ "_id": "abc", "content": "x", "author": "A" });
        assert_eq!(random_quote(body).unwrap(), abc());
    }

    #[test]
    fn random_quote_rejects_other_shapes() {
        for body in [json!([]), json!([{}, {}]), json!("quote"), json!(null), json!([7])] {
            let err = random_quote(body.clone()).unwrap_err();
            assert_eq!(err.kind(), "invalid_upstream_shape", "body {body}");
        }
    }

    #[test]
    fn quote_fields_pass_through_verbatim() {
        let body = json!({
            "_id": "q1",
            "content": "Short.",
            "author": "Someone",
            "authorSlug": "someone",
            "tags": ["wisdom", "famous-quotes"],
            "length": 999,
            "dateAdded": "2020-01-01",
            "dateModified": "2023-04-14"
        });

        let q = quote(body).unwrap();
        assert_eq!(q.length, 999, "length is upstream-provided, not recomputed");
        assert_eq!(q.tags, vec!["wisdom", "famous-quotes"]);
        assert_eq!(q.author_slug.as_deref(), Some("someone"));
        assert_eq!(q.date_added.as_deref(), Some("2020-01-01"));
        assert_eq!(q.date_modified.as_deref(), Some("2023-04-14"));
    }

    #[test]
    fn empty_object_gets_field_defaults() {
        let q = quote(json!({ "tags": null })).unwrap();
        assert_eq!(q.id, "");
        assert_eq!(q.content, "");
        assert!(q.tags.is_empty());
        assert_eq!(q.length, 0);
        assert_eq!(q.author_slug, None);
    }

    #[test]
    fn quote_list_reads_results_and_total() {
        let body = json!({
            "count": 2,
            "totalCount": 120,
            "results": [
                { "_id": "1", "content": "a", "author": "X", "length": 1 },
                { "_id": "2", "content": "b", "author": "Y", "length": 1 }
            ]
        });

        let (quotes, total) = quote_list(body).unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[1].id, "2");
        assert_eq!(total, Some(120));
    }

    #[test]
    fn quote_list_without_results_is_empty() {
        let (quotes, total) = quote_list(json!({})).unwrap();
        assert!(quotes.is_empty());
        assert_eq!(total, None);
    }

    #[test]
    fn quote_list_rejects_arrays() {
        let err = quote_list(json!([])).unwrap_err();
        assert_eq!(err.kind(), "invalid_upstream_shape");
    }
}
