pub mod error;
pub mod routes;

use crate::scrapers::ScraperTrait;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub scraper: Arc<dyn ScraperTrait>,
    /// Country used when a listing request omits one
    pub default_country: String,
}

/// Build the axum Router with all API endpoints
pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/ping", get(routes::ping))
        .route("/api/perfumes", get(routes::perfumes))
        .route("/api/scrape/notino", get(routes::scrape_listing))
        .route("/api/scrape/notino/product", get(routes::scrape_product))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
