use anyhow::{Context, Result};
use notino_scout::scrapers::{NotinoScraper, ScraperTrait};
use notino_scout::server::{build_app, AppState};
use notino_scout::Config;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,notino_scout=debug,tower_http=debug".into()),
        )
        .init();

    info!("🧴 Notino Scout - perfume price API");

    let config = Config::from_env().context("Failed to load configuration")?;
    let default_country = config.scraper.default_country.clone();

    let scraper = NotinoScraper::with_config(config.scraper)
        .context("Failed to create Notino scraper")?;
    info!("Scraper ready for source '{}'", scraper.source_name());

    let app = build_app(AppState {
        scraper: Arc::new(scraper),
        default_country,
    });

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
