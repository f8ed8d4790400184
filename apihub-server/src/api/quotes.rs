use apihub_core::{
    Page, PageRequest, Quote,
    pagination::DEFAULT_LIMIT,
    usecase::QuoteSearch,
    validate,
};
use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct RandomParams {
    tags: Option<String>,
    max_length: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    query: Option<String>,
    author: Option<String>,
    tags: Option<String>,
    min_length: Option<u32>,
    max_length: Option<u32>,
    #[serde(default = "default_limit")]
    limit: u32,
    #[serde(default)]
    skip: u32,
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_limit")]
    limit: u32,
    #[serde(default)]
    skip: u32,
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

fn page_request(limit: u32, skip: u32) -> Result<PageRequest, ApiError> {
    Ok(PageRequest::new(skip, validate::limit(limit)?))
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    quote: Quote,
    timestamp: DateTime<Utc>,
}

impl From<Quote> for QuoteResponse {
    fn from(quote: Quote) -> Self {
        Self { quote, timestamp: Utc::now() }
    }
}

#[derive(Debug, Serialize)]
pub struct QuotesListResponse {
    quotes: Vec<Quote>,
    count: usize,
    page: u32,
    total_count: Option<u64>,
    timestamp: DateTime<Utc>,
}

impl From<Page<Quote>> for QuotesListResponse {
    fn from(page: Page<Quote>) -> Self {
        Self {
            quotes: page.items,
            count: page.count,
            page: page.page,
            total_count: page.total_count,
            timestamp: Utc::now(),
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/quotes", get(search))
        .route("/quotes/random", get(random))
        .route("/quotes/author/{slug}", get(by_author))
        .route("/quotes/{id}", get(by_id))
}

async fn random(
    State(state): State<AppState>,
    query: Result<Query<RandomParams>, QueryRejection>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let Query(params) = query?;
    let max_length = validate::length_filter("max_length", params.max_length)?;

    let quote = state.services.quotes.random(params.tags.as_deref(), max_length).await?;
    Ok(Json(quote.into()))
}

async fn search(
    State(state): State<AppState>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<QuotesListResponse>, ApiError> {
    let Query(params) = query?;
    let page = page_request(params.limit, params.skip)?;
    let filter = QuoteSearch {
        query: params.query,
        author: params.author,
        tags: params.tags,
        min_length: validate::length_filter("min_length", params.min_length)?,
        max_length: validate::length_filter("max_length", params.max_length)?,
    };

    let page = state.services.quotes.search(&filter, page).await?;
    Ok(Json(page.into()))
}

async fn by_author(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    query: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<QuotesListResponse>, ApiError> {
    let Query(params) = query?;
    let page = page_request(params.limit, params.skip)?;

    let page = state.services.quotes.by_author(&slug, page).await?;
    Ok(Json(page.into()))
}

async fn by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<QuoteResponse>, ApiError> {
    match state.services.quotes.by_id(&id).await? {
        Some(quote) => Ok(Json(quote.into())),
        None => Err(ApiError::not_found("quote_not_found", format!("Quote with ID '{id}' not found"))),
    }
}
