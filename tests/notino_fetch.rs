use notino_scout::scrapers::http::HttpFetcher;
use notino_scout::scrapers::{
    ListingParams, NotinoScraper, RetryPolicy, ScraperConfig, ScraperTrait, ShopDomain,
};
use notino_scout::ScrapeError;
use std::time::Duration;
use wiremock::matchers::{header, headers, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING_HTML: &str = r#"
    <html><body>
        <div class="product-item">
            <a class="product__title" href="/dior/sauvage/">Dior Sauvage</a>
            <div class="price"><span class="actual">89,90 €</span></div>
            <img data-src="//cdn.notino.com/sauvage.jpg">
        </div>
        <div class="product-item">
            <a class="product__title" href="/chanel/bleu/">Bleu de Chanel</a>
            <div class="price"><span class="actual">104,00 €</span></div>
        </div>
    </body></html>
"#;

const PRODUCT_HTML: &str = r#"
    <html><head>
        <meta property="og:image" content="//cdn.notino.com/oud-wood.jpg">
    </head><body>
        <h1>Tom Ford Oud Wood</h1>
        <div class="price"><span class="actual">189,90 €</span></div>
    </body></html>
"#;

const EMPTY_HTML: &str = "<html><body><p>Sin resultados</p></body></html>";

fn config_for(server: &MockServer) -> ScraperConfig {
    ScraperConfig {
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
        retry: RetryPolicy {
            max_attempts: 3,
            backoff_base: Duration::from_millis(1),
            ..RetryPolicy::default()
        },
        shop_domains: vec![ShopDomain::new("es", "127.0.0.1")],
        ..ScraperConfig::default()
    }
}

fn params(limit: usize) -> ListingParams {
    ListingParams {
        limit,
        country: "es".to_string(),
    }
}

#[tokio::test]
async fn test_listing_from_perfumes_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/perfumes/"))
        .and(headers("accept-language", vec!["es-ES", "es;q=0.9", "en;q=0.8"]))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING_HTML))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/bestsellers/perfumes/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let scraper = NotinoScraper::with_config(config_for(&server)).unwrap();
    let items = scraper.scrape_listing(&params(1)).await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Dior Sauvage");
    assert_eq!(items[0].url, format!("{}/dior/sauvage/", server.uri()));
    assert_eq!(items[0].image.as_deref(), Some("https://cdn.notino.com/sauvage.jpg"));
}

#[tokio::test]
async fn test_listing_falls_back_to_bestsellers() {
    let server = MockServer::start().await;
    Mock::given(path("/perfumes/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(EMPTY_HTML))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/bestsellers/perfumes/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING_HTML))
        .expect(1)
        .mount(&server)
        .await;

    let scraper = NotinoScraper::with_config(config_for(&server)).unwrap();
    let items = scraper.scrape_listing(&params(5)).await.unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[1].url, format!("{}/chanel/bleu/", server.uri()));
    assert_eq!(items[1].price, 104.0);
}

#[tokio::test]
async fn test_listing_empty_after_fallback() {
    let server = MockServer::start().await;
    Mock::given(path("/perfumes/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(EMPTY_HTML))
        .mount(&server)
        .await;
    Mock::given(path("/bestsellers/perfumes/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let scraper = NotinoScraper::with_config(config_for(&server)).unwrap();
    let err = scraper.scrape_listing(&params(5)).await.unwrap_err();

    assert!(matches!(err, ScrapeError::EmptyResult));
}

#[tokio::test]
async fn test_listing_upstream_error_is_not_a_fallback() {
    let server = MockServer::start().await;
    Mock::given(path("/perfumes/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/bestsellers/perfumes/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING_HTML))
        .expect(0)
        .mount(&server)
        .await;

    let scraper = NotinoScraper::with_config(config_for(&server)).unwrap();
    let err = scraper.scrape_listing(&params(5)).await.unwrap_err();

    assert!(matches!(err, ScrapeError::UpstreamHttp { status: 404, .. }));
}

#[tokio::test]
async fn test_transient_errors_are_retried() {
    let server = MockServer::start().await;
    Mock::given(path("/perfumes/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(path("/perfumes/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING_HTML))
        .expect(1)
        .mount(&server)
        .await;

    let scraper = NotinoScraper::with_config(config_for(&server)).unwrap();
    let items = scraper.scrape_listing(&params(5)).await.unwrap();

    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let server = MockServer::start().await;
    Mock::given(path("/perfumes/"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;

    let scraper = NotinoScraper::with_config(config_for(&server)).unwrap();
    let err = scraper.scrape_listing(&params(5)).await.unwrap_err();

    assert!(matches!(err, ScrapeError::UpstreamHttp { status: 429, .. }));
}

#[tokio::test]
async fn test_fetch_sends_referer() {
    let server = MockServer::start().await;
    let url = format!("{}/tom-ford/oud-wood/", server.uri());
    Mock::given(path("/tom-ford/oud-wood/"))
        .and(header("referer", url.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string("<h1>Oud Wood</h1>"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(&config_for(&server)).unwrap();
    let body = fetcher.fetch(&url, Some(&url)).await.unwrap();

    assert!(body.contains("Oud Wood"));
}

#[tokio::test]
async fn test_product_validation_happens_before_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let scraper = NotinoScraper::with_config(config_for(&server)).unwrap();
    let err = scraper
        .scrape_product("https://www.notino.de/chanel/no-5/", Some("fr"))
        .await
        .unwrap_err();

    assert!(matches!(err, ScrapeError::Validation(_)));
}

#[tokio::test]
async fn test_product_primes_home_page_then_fetches_with_referer() {
    let server = MockServer::start().await;
    let url = format!("{}/tom-ford/oud-wood/", server.uri());
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tom-ford/oud-wood/"))
        .and(header("referer", url.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(PRODUCT_HTML))
        .expect(1)
        .mount(&server)
        .await;

    let scraper = NotinoScraper::with_config(config_for(&server)).unwrap();
    // No country given: the shop's country is taken from the domain
    let item = scraper.scrape_product(&url, None).await.unwrap();

    assert_eq!(item.url, url);
    assert_eq!(item.name, "Tom Ford Oud Wood");
    assert_eq!(item.price, 189.9);
    assert_eq!(item.image.as_deref(), Some("https://cdn.notino.com/oud-wood.jpg"));

    let paths: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect();
    assert_eq!(paths, vec!["/".to_string(), "/tom-ford/oud-wood/".to_string()]);
}

#[tokio::test]
async fn test_product_stops_when_home_page_fails() {
    let server = MockServer::start().await;
    let url = format!("{}/tom-ford/oud-wood/", server.uri());
    Mock::given(path("/"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/tom-ford/oud-wood/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PRODUCT_HTML))
        .expect(0)
        .mount(&server)
        .await;

    let scraper = NotinoScraper::with_config(config_for(&server)).unwrap();
    let err = scraper.scrape_product(&url, Some("es")).await.unwrap_err();

    assert!(matches!(err, ScrapeError::UpstreamHttp { status: 403, .. }));
}

#[tokio::test]
async fn test_product_page_without_data_is_extraction_error() {
    let server = MockServer::start().await;
    let url = format!("{}/gone/", server.uri());
    Mock::given(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(path("/gone/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(EMPTY_HTML))
        .expect(1)
        .mount(&server)
        .await;

    let scraper = NotinoScraper::with_config(config_for(&server)).unwrap();
    let err = scraper.scrape_product(&url, Some("es")).await.unwrap_err();

    assert!(matches!(err, ScrapeError::Extraction(_)));
}
