use apihub_core::Country;
use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct AllParams {
    /// Comma-separated upstream field names.
    fields: Option<String>,
}

impl AllParams {
    fn field_list(&self) -> Vec<String> {
        self.fields
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct CountryResponse {
    country: Country,
}

#[derive(Debug, Serialize)]
pub struct CountryListResponse {
    countries: Vec<Country>,
    total: usize,
}

impl From<Vec<Country>> for CountryListResponse {
    fn from(countries: Vec<Country>) -> Self {
        Self { total: countries.len(), countries }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/countries/all", get(all))
        .route("/countries/name/{name}", get(by_name))
        .route("/countries/code/{code}", get(by_code))
        .route("/countries/region/{region}", get(by_region))
}

async fn all(
    State(state): State<AppState>,
    query: Result<Query<AllParams>, QueryRejection>,
) -> Result<Json<CountryListResponse>, ApiError> {
    let Query(params) = query?;
    let fields = params.field_list();
    let fields = (!fields.is_empty()).then_some(fields.as_slice());

    let countries = state.services.countries.all(fields).await?;
    Ok(Json(countries.into()))
}

async fn by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CountryResponse>, ApiError> {
    match state.services.countries.by_name(&name).await? {
        Some(country) => Ok(Json(CountryResponse { country })),
        None => Err(ApiError::not_found("not_found", format!("Country '{name}' not found"))),
    }
}

async fn by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<CountryResponse>, ApiError> {
    match state.services.countries.by_code(&code).await? {
        Some(country) => Ok(Json(CountryResponse { country })),
        None => Err(ApiError::not_found(
            "not_found",
            format!("Country with code '{code}' not found"),
        )),
    }
}

async fn by_region(
    State(state): State<AppState>,
    Path(region): Path<String>,
) -> Result<Json<CountryListResponse>, ApiError> {
    let countries = state.services.countries.by_region(&region).await?;
    Ok(Json(countries.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_list_trims_and_drops_empties() {
        let params = AllParams { fields: Some(" name, capital,,".into()) };
        assert_eq!(params.field_list(), vec!["name", "capital"]);

        assert!(AllParams { fields: None }.field_list().is_empty());
    }
}
