use crate::error::Result;
use crate::models::PerfumeItem;
use crate::scrapers::types::ListingParams;
use async_trait::async_trait;

/// Common trait for perfume shop scrapers.
/// The API layer only talks to this, so handlers can be exercised without
/// network access.
#[async_trait]
pub trait ScraperTrait: Send + Sync {
    /// Scrape the shop's perfume listing
    async fn scrape_listing(&self, params: &ListingParams) -> Result<Vec<PerfumeItem>>;

    /// Scrape a single product page, optionally pinned to a country shop
    async fn scrape_product(&self, url: &str, country: Option<&str>) -> Result<PerfumeItem>;

    /// Get the name of the scraper source
    fn source_name(&self) -> &'static str;
}
