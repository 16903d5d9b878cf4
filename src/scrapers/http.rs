//! Page fetching over reqwest.
//!
//! One client is built per scraper and reused: browser User-Agent,
//! Accept-Language, request timeout and a cookie store so that a home page
//! visit primes cookies for the product request that follows. Transient
//! failures (429/5xx, timeouts, refused connections) are retried with
//! exponential backoff.

use crate::error::{Result, ScrapeError};
use crate::scrapers::types::{RetryPolicy, ScraperConfig, USER_AGENT};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, REFERER};
use reqwest::Client;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    retry: RetryPolicy,
}

impl HttpFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let accept_language = HeaderValue::from_str(&config.accept_language)
            .map_err(|e| ScrapeError::Validation(format!("invalid Accept-Language: {e}")))?;
        headers.insert(ACCEPT_LANGUAGE, accept_language);

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            retry: config.retry.clone(),
        })
    }

    /// GET `url` and return its body, failing on a final non-2xx status
    pub async fn fetch(&self, url: &str, referer: Option<&str>) -> Result<String> {
        let mut attempt = 1;

        loop {
            let mut request = self.client.get(url);
            if let Some(referer) = referer {
                request = request.header(REFERER, referer);
            }

            let retries_left = attempt < self.retry.max_attempts;

            match request.send().await {
                Ok(response) => {
                    let status = response.status().as_u16();

                    if self.retry.should_retry(status) && retries_left {
                        let delay = self.retry.backoff(attempt);
                        warn!("{} returned {}, retrying in {:?}", url, status, delay);
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    if !response.status().is_success() {
                        warn!("{} returned status {}", url, status);
                        return Err(ScrapeError::UpstreamHttp {
                            status,
                            url: url.to_string(),
                        });
                    }

                    let body = response.text().await?;
                    debug!("Downloaded {} bytes from {}", body.len(), url);
                    return Ok(body);
                }
                Err(e) if (e.is_timeout() || e.is_connect()) && retries_left => {
                    let delay = self.retry.backoff(attempt);
                    warn!("Request to {} failed ({}), retrying in {:?}", url, e, delay);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
