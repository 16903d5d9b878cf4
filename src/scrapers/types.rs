use crate::error::{Result, ScrapeError};
use crate::scrapers::notino::{default_shop_domains, ShopDomain};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_LIMIT: usize = 5;
pub const MAX_LIMIT: usize = 50;
pub const DEFAULT_COUNTRY: &str = "es";

/// Browser-like User-Agent sent with every request
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Parameters for one listing scrape
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingParams {
    /// Maximum number of items to return (1..=50)
    pub limit: usize,
    /// Country code selecting the shop domain, e.g. "es" or "de"
    pub country: String,
}

impl ListingParams {
    /// Validate raw query values, filling in defaults
    pub fn new(limit: Option<usize>, country: Option<&str>, default_country: &str) -> Result<Self> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(ScrapeError::Validation(format!(
                "limit must be between 1 and {MAX_LIMIT}, got {limit}"
            )));
        }

        let country = validate_country(country.unwrap_or(default_country))?;

        Ok(Self { limit, country })
    }
}

impl Default for ListingParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

/// Normalize a country code to lowercase, rejecting anything but 2-3 letters
pub fn validate_country(country: &str) -> Result<String> {
    let country = country.trim().to_ascii_lowercase();
    let valid = (2..=3).contains(&country.len()) && country.chars().all(|c| c.is_ascii_lowercase());
    if valid {
        Ok(country)
    } else {
        Err(ScrapeError::Validation(format!(
            "country must be a 2-3 letter code, got {country:?}"
        )))
    }
}

/// Transport retry policy for transient upstream failures
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    /// Delay before the first retry; doubled for each further retry
    pub backoff_base: Duration,
    pub retry_statuses: Vec<u16>,
}

impl RetryPolicy {
    pub fn should_retry(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }

    /// Delay before retry number `retry` (1-based)
    pub fn backoff(&self, retry: u32) -> Duration {
        self.backoff_base
            .saturating_mul(2u32.saturating_pow(retry.saturating_sub(1)))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base: Duration::from_millis(500),
            retry_statuses: vec![429, 500, 502, 503, 504],
        }
    }
}

/// Read-only scraper settings, built once at startup
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Origin template; `{country}` is replaced by the country domain suffix
    pub base_url: String,
    pub default_country: String,
    pub timeout: Duration,
    /// Politeness pause after a successful listing fetch
    pub listing_pause: Duration,
    pub accept_language: String,
    pub retry: RetryPolicy,
    /// Domains product URLs are accepted from
    pub shop_domains: Vec<ShopDomain>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.notino.{country}".to_string(),
            default_country: DEFAULT_COUNTRY.to_string(),
            timeout: Duration::from_secs(15),
            listing_pause: Duration::ZERO,
            accept_language: "es-ES,es;q=0.9,en;q=0.8".to_string(),
            retry: RetryPolicy::default(),
            shop_domains: default_shop_domains(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_params_defaults() {
        let params = ListingParams::new(None, None, "de").unwrap();
        assert_eq!(params.limit, 5);
        assert_eq!(params.country, "de");
    }

    #[test]
    fn test_listing_params_bounds() {
        assert!(ListingParams::new(Some(0), Some("es"), "es").is_err());
        assert!(ListingParams::new(Some(51), Some("es"), "es").is_err());
        assert_eq!(ListingParams::new(Some(50), Some("ES"), "es").unwrap().country, "es");
    }

    #[test]
    fn test_validate_country() {
        assert_eq!(validate_country("cz").unwrap(), "cz");
        assert!(validate_country("x").is_err());
        assert!(validate_country("abcd").is_err());
        assert!(validate_country("e/").is_err());
        assert!(validate_country("é").is_err());
    }

    #[test]
    fn test_retry_backoff_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_millis(500));
        assert_eq!(policy.backoff(2), Duration::from_millis(1000));
        assert_eq!(policy.backoff(3), Duration::from_millis(2000));
        assert!(policy.should_retry(503));
        assert!(!policy.should_retry(404));
    }
}
