use crate::error::{Result, ScrapeError};
use crate::models::PerfumeItem;
use crate::scrapers::http::HttpFetcher;
use crate::scrapers::listing::parse_listing;
use crate::scrapers::product::parse_product;
use crate::scrapers::traits::ScraperTrait;
use crate::scrapers::types::{validate_country, ListingParams, ScraperConfig};
use async_trait::async_trait;
use tracing::{debug, info, warn};
use url::Url;

/// Country domain suffixes the shop operates under
pub const COUNTRY_DOMAINS: [&str; 23] = [
    "es", "fr", "de", "it", "pt", "pl", "cz", "sk", "hu", "ro", "bg", "at", "nl", "be", "co.uk",
    "gr", "hr", "si", "ch", "dk", "se", "fi", "ie",
];

const SITE: &str = "notino";

/// Domain suffix used by a country code ("uk" and "gb" live under "co.uk")
pub fn country_domain(country: &str) -> &str {
    match country {
        "uk" | "gb" => "co.uk",
        other => other,
    }
}

/// One country shop a product URL may point at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopDomain {
    pub country: String,
    /// Registrable domain, e.g. "notino.de"
    pub domain: String,
}

impl ShopDomain {
    pub fn new(country: &str, domain: &str) -> Self {
        Self {
            country: country.to_string(),
            domain: domain.to_ascii_lowercase(),
        }
    }

    /// The domain itself or any subdomain of it
    fn covers(&self, host: &str) -> bool {
        host == self.domain || host.ends_with(&format!(".{}", self.domain))
    }

    /// The domain itself or its `www.` host
    fn is_exact(&self, host: &str) -> bool {
        host == self.domain || host == format!("www.{}", self.domain)
    }

    fn serves(&self, country: &str) -> bool {
        country_domain(&self.country) == country_domain(country)
    }
}

/// All Notino country shops
pub fn default_shop_domains() -> Vec<ShopDomain> {
    COUNTRY_DOMAINS
        .iter()
        .map(|suffix| {
            let country = if *suffix == "co.uk" { "uk" } else { *suffix };
            ShopDomain::new(country, &format!("{SITE}.{suffix}"))
        })
        .collect()
}

/// A product URL that passed the domain checks
#[derive(Debug, Clone, PartialEq)]
pub struct ProductTarget {
    pub url: Url,
    /// Country from the request hint, else the one owning the matched domain
    pub country: String,
}

/// Check that `raw` points at one of `shops`.
///
/// With a country hint the host must be exactly that country's domain
/// (with or without `www.`). Runs before any network call.
pub fn validate_product_url(
    raw: &str,
    country: Option<&str>,
    shops: &[ShopDomain],
) -> Result<ProductTarget> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ScrapeError::Validation(format!("invalid product URL {raw:?}: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ScrapeError::Validation(format!(
            "product URL must use http or https, got {}",
            url.scheme()
        )));
    }

    let host = url
        .host_str()
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| ScrapeError::Validation(format!("product URL {raw:?} has no host")))?;

    let Some(matched) = shops.iter().find(|shop| shop.covers(&host)) else {
        return Err(ScrapeError::Validation(format!(
            "{host} is not a {SITE} shop domain"
        )));
    };

    let country = match country {
        Some(hint) => {
            let hint = validate_country(hint)?;
            let exact = shops
                .iter()
                .any(|shop| shop.serves(&hint) && shop.is_exact(&host));
            if !exact {
                return Err(ScrapeError::Validation(format!(
                    "{host} does not match country {hint:?} (expected {SITE}.{})",
                    country_domain(&hint)
                )));
            }
            hint
        }
        None => matched.country.clone(),
    };

    Ok(ProductTarget { url, country })
}

/// Notino scraper: resolves the country shop, fetches pages and hands the
/// markup to the extractors
pub struct NotinoScraper {
    http: HttpFetcher,
    config: ScraperConfig,
}

impl NotinoScraper {
    /// Create a scraper with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(ScraperConfig::default())
    }

    pub fn with_config(config: ScraperConfig) -> Result<Self> {
        let http = HttpFetcher::new(&config)?;
        Ok(Self { http, config })
    }

    /// Origin of the shop for a country, without trailing slash
    pub fn site_url(&self, country: &str) -> String {
        self.config
            .base_url
            .replace("{country}", country_domain(country))
            .trim_end_matches('/')
            .to_string()
    }

    fn extract_page(html: &str, page_url: &str, limit: usize) -> Vec<PerfumeItem> {
        let base = Url::parse(page_url).ok();
        parse_listing(html, limit, base.as_ref())
    }
}

#[async_trait]
impl ScraperTrait for NotinoScraper {
    async fn scrape_listing(&self, params: &ListingParams) -> Result<Vec<PerfumeItem>> {
        let base = self.site_url(&params.country);
        let url = format!("{base}/perfumes/");

        info!("Scraping {} listing from {}", self.source_name(), url);
        let html = self.http.fetch(&url, None).await?;
        let mut items = Self::extract_page(&html, &url, params.limit);

        if items.is_empty() {
            let alt_url = format!("{base}/bestsellers/perfumes/");
            warn!("No items on {}, trying {}", url, alt_url);
            match self.http.fetch(&alt_url, None).await {
                Ok(html) => items = Self::extract_page(&html, &alt_url, params.limit),
                Err(ScrapeError::UpstreamHttp { status, .. }) => {
                    warn!("Bestsellers page returned {}, giving up", status);
                }
                Err(e) => return Err(e),
            }
        }

        if !self.config.listing_pause.is_zero() {
            debug!("Pausing {:?} after listing fetch", self.config.listing_pause);
            tokio::time::sleep(self.config.listing_pause).await;
        }

        if items.is_empty() {
            warn!("No items found for country {}", params.country);
            return Err(ScrapeError::EmptyResult);
        }

        info!("✅ Scraped {} items from {}", items.len(), self.source_name());
        Ok(items)
    }

    async fn scrape_product(&self, url: &str, country: Option<&str>) -> Result<PerfumeItem> {
        let target = validate_product_url(url, country, &self.config.shop_domains)?;

        let home = format!("{}/", target.url.origin().ascii_serialization());
        debug!("Priming cookies for country {} from {}", target.country, home);
        self.http.fetch(&home, None).await?;

        info!("Scraping product page {}", target.url);
        let html = self.http.fetch(target.url.as_str(), Some(target.url.as_str())).await?;
        let item = parse_product(&html, url)?;

        info!("✅ Extracted '{}' at {} {}", item.name, item.price, item.currency);
        Ok(item)
    }

    fn source_name(&self) -> &'static str {
        "notino"
    }
}
