//! Perfume price scraper for the Notino shop, served over a small HTTP API.

pub mod config;
pub mod error;
pub mod models;
pub mod scrapers;
pub mod server;

pub use config::Config;
pub use error::{Result, ScrapeError};
