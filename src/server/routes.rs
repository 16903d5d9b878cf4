use crate::error::ScrapeError;
use crate::models::{sample_perfumes, Perfume, PerfumeItem};
use crate::scrapers::ListingParams;
use crate::server::error::ApiError;
use crate::server::AppState;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    pub limit: Option<usize>,
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub url: String,
    pub country: Option<String>,
}

/// Malformed query strings get the same 400 `{"detail": ..}` body as
/// failed validation
fn query_or_reject<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query
        .map(|Query(inner)| inner)
        .map_err(|rejection| ScrapeError::Validation(rejection.body_text()).into())
}

pub async fn ping() -> Json<Value> {
    Json(json!({ "message": "pong" }))
}

pub async fn perfumes() -> Json<Vec<Perfume>> {
    Json(sample_perfumes())
}

/// `GET /api/scrape/notino?limit=&country=`
pub async fn scrape_listing(
    State(state): State<AppState>,
    query: Result<Query<ListingQuery>, QueryRejection>,
) -> Result<Json<Vec<PerfumeItem>>, ApiError> {
    let query = query_or_reject(query)?;
    let params = ListingParams::new(
        query.limit,
        query.country.as_deref(),
        &state.default_country,
    )?;
    let items = state.scraper.scrape_listing(&params).await?;
    Ok(Json(items))
}

/// `GET /api/scrape/notino/product?url=&country=`
pub async fn scrape_product(
    State(state): State<AppState>,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> Result<Json<PerfumeItem>, ApiError> {
    let query = query_or_reject(query)?;
    let country = query.country.as_deref().filter(|c| !c.trim().is_empty());
    let item = state.scraper.scrape_product(&query.url, country).await?;
    Ok(Json(item))
}
