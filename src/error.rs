use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Upstream returned HTTP {status} for {url}")]
    UpstreamHttp { status: u16, url: String },

    #[error("Could not extract product: {0}")]
    Extraction(String),

    #[error("No items found on listing pages")]
    EmptyResult,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
