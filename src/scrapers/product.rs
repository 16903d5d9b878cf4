use crate::error::{Result, ScrapeError};
use crate::models::{PerfumeItem, Source};
use crate::scrapers::listing::absolutize;
use crate::scrapers::price::{clean_text, find_currency, locale_number, parse_price, DEFAULT_CURRENCY};
use crate::scrapers::selectors::product as selectors;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

static SCRIPT_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""name"\s*:\s*"((?:[^"\\]|\\.)*)""#).expect("valid name regex")
});

static SCRIPT_PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""price"\s*:\s*"?(\d[\d.,]*)"#).expect("valid price regex")
});

static SCRIPT_CURRENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""priceCurrency"\s*:\s*"([^"]+)""#).expect("valid currency regex")
});

static CANONICAL_DECIMAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)?$").expect("valid decimal regex"));

/// Fields recovered from inline scripts
#[derive(Debug, Default, PartialEq)]
struct ScriptFields {
    name: Option<String>,
    price: Option<f64>,
    currency: Option<String>,
}

/// Extract the single record described by a product page.
///
/// Fails with [`ScrapeError::Extraction`] when no name or no price can be
/// found, neither in the markup nor in inline script data.
pub fn extract_product(document: &Html, url: &str) -> Result<PerfumeItem> {
    let base = Url::parse(url).ok();

    let mut name = first_value(document, &selectors::NAME);

    // The first non-empty price element decides, even when it holds no number
    let (mut price, mut currency) = selectors::PRICE
        .iter()
        .filter_map(|selector| document.select(selector).next())
        .map(element_price)
        .find(|(_, text)| !text.is_empty())
        .map(|(value, text)| (value, find_currency(&text)))
        .unwrap_or_default();

    if currency.is_none() {
        currency = document
            .select(&selectors::CURRENCY)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(|c| clean_text(c))
            .filter(|c| !c.is_empty());
    }

    let image = selectors::IMAGE.iter().find_map(|selector| {
        let el = document.select(selector).next()?;
        let attrs = el.value();
        ["content", "src", "data-src"]
            .iter()
            .filter_map(|attr| attrs.attr(attr))
            .find(|v| !v.trim().is_empty())
            .and_then(|v| absolutize(v, base.as_ref()))
    });

    if name.is_none() || price.is_none() {
        debug!("Falling back to inline script data for {}", url);
        let script = scan_scripts(document);
        name = name.or(script.name);
        price = price.or(script.price);
        currency = currency.or(script.currency);
    }

    let (Some(name), Some(price)) = (name, price) else {
        return Err(ScrapeError::Extraction(format!(
            "no name or price found at {url}"
        )));
    };

    Ok(PerfumeItem {
        source: Source::Notino,
        name,
        price,
        currency: currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        url: url.to_string(),
        image,
    })
}

/// Parse raw HTML and extract the product; see [`extract_product`]
pub fn parse_product(html: &str, url: &str) -> Result<PerfumeItem> {
    let document = Html::parse_document(html);
    extract_product(&document, url)
}

/// Meta tags carry their value in `content`, everything else in its text
fn element_value(el: ElementRef<'_>) -> String {
    match el.value().attr("content") {
        Some(content) => clean_text(content),
        None => clean_text(el.text().collect::<String>().as_str()),
    }
}

fn first_value(document: &Html, candidates: &[Selector]) -> Option<String> {
    candidates.iter().find_map(|selector| {
        let value = element_value(document.select(selector).next()?);
        (!value.is_empty()).then_some(value)
    })
}

fn element_price(el: ElementRef<'_>) -> (Option<f64>, String) {
    let text = element_value(el);
    // Microdata prices are plain decimals ("12.50"), not locale formatted
    if el.value().attr("content").is_some() && CANONICAL_DECIMAL_RE.is_match(&text) {
        return (text.parse::<f64>().ok().filter(|v| v.is_finite()), text);
    }
    let (value, _) = parse_price(text.as_str());
    (value, text)
}

/// Scan inline scripts for `"name"`, `"price"` and `"priceCurrency"` pairs.
///
/// Scripts are visited in document order; for each field the first match
/// wins.
fn scan_scripts(document: &Html) -> ScriptFields {
    let mut found = ScriptFields::default();

    for script in document.select(&selectors::SCRIPT) {
        let body = script.text().collect::<String>();
        if body.trim().is_empty() {
            continue;
        }

        if found.name.is_none() {
            found.name = SCRIPT_NAME_RE
                .captures(&body)
                .map(|c| clean_text(unescape_json(&c[1]).as_str()))
                .filter(|n| !n.is_empty());
        }
        if found.price.is_none() {
            found.price = SCRIPT_PRICE_RE
                .captures(&body)
                .and_then(|c| locale_number(&c[1]));
        }
        if found.currency.is_none() {
            found.currency = SCRIPT_CURRENCY_RE
                .captures(&body)
                .map(|c| c[1].trim().to_string());
        }

        if found.name.is_some() && found.price.is_some() && found.currency.is_some() {
            break;
        }
    }

    found
}

/// Decode escapes in a captured JSON string body, keeping it raw if invalid
fn unescape_json(raw: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{raw}\"")).unwrap_or_else(|_| raw.to_string())
}
