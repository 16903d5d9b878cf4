use crate::models::{PerfumeItem, Source};
use crate::scrapers::price::{clean_text, parse_price, DEFAULT_CURRENCY};
use crate::scrapers::selectors::{SelectorSchema, LISTING_SCHEMAS, PRICE_DATA_ATTRS};
use scraper::{ElementRef, Html};
use std::collections::HashSet;
use tracing::debug;
use url::Url;

/// Shortest card name accepted as a real product name
const MIN_NAME_CHARS: usize = 3;

/// Extract up to `limit` items from a listing page.
///
/// Schemas are tried in order and the first one producing any item wins,
/// even if it produced fewer than `limit`. An empty result is not an error.
pub fn extract_listing(document: &Html, limit: usize) -> Vec<PerfumeItem> {
    extract_listing_at(document, limit, None)
}

/// Same as [`extract_listing`], resolving relative links against `base`
pub fn extract_listing_at(document: &Html, limit: usize, base: Option<&Url>) -> Vec<PerfumeItem> {
    if limit == 0 {
        return Vec::new();
    }

    for schema in LISTING_SCHEMAS.iter() {
        let items = extract_with_schema(document, schema, limit, base);
        debug!("Schema '{}' produced {} items", schema.label, items.len());
        if !items.is_empty() {
            return items;
        }
    }

    Vec::new()
}

/// Parse raw HTML and extract listing items.
///
/// The parsed document never outlives this call, so async callers can use
/// it without holding a non-`Send` DOM across an await point.
pub fn parse_listing(html: &str, limit: usize, base: Option<&Url>) -> Vec<PerfumeItem> {
    let document = Html::parse_document(html);
    extract_listing_at(&document, limit, base)
}

fn extract_with_schema(
    document: &Html,
    schema: &SelectorSchema,
    limit: usize,
    base: Option<&Url>,
) -> Vec<PerfumeItem> {
    let mut items = Vec::new();
    let mut seen_urls = HashSet::new();

    for card in document.select(&schema.card) {
        let Some(name) = card_name(card, schema) else {
            continue;
        };

        let (Some(price), currency) = card_price(card, schema) else {
            continue;
        };

        let Some(url) = card
            .select(&schema.url)
            .next()
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| absolutize(href, base))
        else {
            continue;
        };
        if !seen_urls.insert(url.clone()) {
            continue;
        }

        let image = card.select(&schema.img).next().and_then(|img| {
            let el = img.value();
            non_empty(el.attr("data-src"))
                .or_else(|| non_empty(el.attr("src")))
                .and_then(|src| absolutize(src, base))
        });

        items.push(PerfumeItem {
            source: Source::Notino,
            name,
            price,
            currency: currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            url,
            image,
        });

        if items.len() >= limit {
            break;
        }
    }

    items
}

fn card_name(card: ElementRef<'_>, schema: &SelectorSchema) -> Option<String> {
    let el = card.select(&schema.name).next()?;
    let name = clean_text(el.text().collect::<String>().as_str());
    (name.chars().count() >= MIN_NAME_CHARS).then_some(name)
}

fn card_price(card: ElementRef<'_>, schema: &SelectorSchema) -> (Option<f64>, Option<String>) {
    let text = card
        .select(&schema.price)
        .next()
        .map(|el| clean_text(el.text().collect::<String>().as_str()))
        .unwrap_or_default();

    let parsed = parse_price(text.as_str());
    if parsed.0.is_some() {
        return parsed;
    }

    // Only the first data attribute present is consulted
    PRICE_DATA_ATTRS
        .iter()
        .find_map(|attr| card.value().attr(attr))
        .map(|raw| parse_price(raw))
        .unwrap_or(parsed)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Turn an href/src into an absolute URL.
///
/// Protocol-relative `//host/path` always becomes `https://host/path`; other
/// relative references are joined onto `base` when one is known.
pub(crate) fn absolutize(raw: &str, base: Option<&Url>) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Some(rest) = raw.strip_prefix("//") {
        return Some(format!("https://{rest}"));
    }
    match base {
        Some(base) => base.join(raw).ok().map(String::from),
        None => Some(raw.to_string()),
    }
}
