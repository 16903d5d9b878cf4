//! Text cleanup and price parsing shared by the listing and product extractors.
//!
//! Prices on the shop are locale formatted: `.` groups thousands and `,`
//! marks decimals (`1.234,56 €`, `45,00 Kč`).

use regex::Regex;
use std::sync::LazyLock;

/// Currency used when a price carries no recognizable symbol
pub const DEFAULT_CURRENCY: &str = "€";

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

// A digit run optionally continued by separator-and-digits groups, so both
// "1.234,56" and "45,00" are captured whole.
static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:[.,]\d+)*").expect("valid price regex"));

static CURRENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"€|EUR|£|GBP|Kč|PLN|RON|lei|Ft|HUF|zł|CZK").expect("valid currency regex")
});

/// Collapse whitespace runs to single spaces and trim the ends
pub fn clean_text<'a>(s: impl Into<Option<&'a str>>) -> String {
    match s.into() {
        Some(s) => WHITESPACE_RE.replace_all(s, " ").trim().to_string(),
        None => String::new(),
    }
}

/// Convert a locale formatted number (`1.234,56`) into a float.
///
/// Every `.` is dropped as a thousands separator and `,` becomes the decimal
/// point. Returns `None` when the result does not parse or overflows to
/// infinity.
pub fn locale_number(raw: &str) -> Option<f64> {
    raw.replace('.', "")
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// First known currency symbol or code in `text`
pub fn find_currency(text: &str) -> Option<String> {
    CURRENCY_RE.find(text).map(|m| m.as_str().to_string())
}

/// Pull the first number and the first known currency out of free text.
///
/// The currency defaults to [`DEFAULT_CURRENCY`] only when a price was found.
pub fn parse_price<'a>(text: impl Into<Option<&'a str>>) -> (Option<f64>, Option<String>) {
    let text = match text.into() {
        Some(t) if !t.is_empty() => t,
        _ => return (None, None),
    };

    let currency = find_currency(text);

    let Some(number) = PRICE_RE.find(text) else {
        return (None, currency);
    };

    match locale_number(number.as_str()) {
        Some(value) => (
            Some(value),
            Some(currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string())),
        ),
        None => (None, currency),
    }
}
