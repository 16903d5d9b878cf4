use crate::scrapers::types::{validate_country, RetryPolicy, ScraperConfig};
use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub scraper: ScraperConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = ScraperConfig::default();
        let default_retry = RetryPolicy::default();

        let default_country = match lookup("NOTINO_DEFAULT_COUNTRY") {
            Some(country) => validate_country(&country)
                .context("NOTINO_DEFAULT_COUNTRY must be a 2-3 letter country code")?,
            None => defaults.default_country,
        };

        let scraper = ScraperConfig {
            base_url: lookup("NOTINO_BASE_URL").unwrap_or(defaults.base_url),
            default_country,
            timeout: Duration::from_secs(parse_or(&lookup, "NOTINO_TIMEOUT_SECS", 15)?),
            listing_pause: Duration::from_millis(parse_or(&lookup, "NOTINO_LISTING_PAUSE_MS", 0)?),
            accept_language: lookup("NOTINO_ACCEPT_LANGUAGE").unwrap_or(defaults.accept_language),
            retry: RetryPolicy {
                max_attempts: parse_or(&lookup, "NOTINO_RETRY_ATTEMPTS", default_retry.max_attempts)?,
                backoff_base: Duration::from_millis(parse_or(
                    &lookup,
                    "NOTINO_RETRY_BACKOFF_MS",
                    500,
                )?),
                ..default_retry
            },
            shop_domains: defaults.shop_domains,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 8000)?,
            scraper,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a valid number")),
        None => Ok(default),
    }
}
