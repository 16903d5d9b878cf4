//! CSS selectors for Notino pages.
//!
//! The shop renames classes now and then, so listing cards are matched by a
//! list of schemas tried in order, most specific markup first. Update this
//! file when extraction starts coming back empty.

use scraper::Selector;
use std::sync::LazyLock;

fn sel(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e:?}"))
}

/// Where to find each field of a listing card in one markup dialect
#[derive(Debug)]
pub struct SelectorSchema {
    pub label: &'static str,
    pub card: Selector,
    pub name: Selector,
    pub price: Selector,
    pub url: Selector,
    pub img: Selector,
}

/// Listing schemas in the order they are tried
pub static LISTING_SCHEMAS: LazyLock<Vec<SelectorSchema>> = LazyLock::new(|| {
    vec![
        // Category listing markup
        SelectorSchema {
            label: "product-item",
            card: sel("div.product-item"),
            name: sel("a.product__title, a.product__title span, h3.product__title"),
            price: sel(".price .actual, .price b, .price__main, .price span"),
            url: sel("a.product__title, a.product__link"),
            img: sel("img"),
        },
        // Grid cards
        SelectorSchema {
            label: "grid",
            card: sel("div.grid__item, li.grid__item, article.product"),
            name: sel(".product-name, .product__title, h3 a, h3"),
            price: sel(".product-price, .price, .price__main, .price__value"),
            url: sel("a[href]"),
            img: sel("img"),
        },
        // Anything whose class mentions a title and a price
        SelectorSchema {
            label: "generic",
            card: sel("article, li, div"),
            name: sel("[class*='title'], [class*='name']"),
            price: sel("[class*='price']"),
            url: sel("a[href]"),
            img: sel("img"),
        },
    ]
});

/// Card attributes that sometimes carry the price when no node does
pub const PRICE_DATA_ATTRS: [&str; 3] = ["data-price", "data-product-price", "data-price-value"];

/// Selectors for a single product page
pub mod product {
    use super::*;

    /// Name candidates, tried in order
    pub static NAME: LazyLock<Vec<Selector>> = LazyLock::new(|| {
        vec![
            sel("h1.product__title"),
            sel("h1"),
            sel("#pdHeader h2, .pd-header__title, .product-header__title"),
            sel(".product-name"),
            sel("meta[property='og:title']"),
        ]
    });

    /// Price candidates, tried in order
    pub static PRICE: LazyLock<Vec<Selector>> = LazyLock::new(|| {
        vec![
            sel(".price .actual"),
            sel("#pd-price"),
            sel("[data-testid='pd-price']"),
            sel(".price__main, .product-price, .price"),
            sel("meta[itemprop='price']"),
        ]
    });

    pub static CURRENCY: LazyLock<Selector> =
        LazyLock::new(|| sel("meta[itemprop='priceCurrency']"));

    /// Image candidates, tried in order
    pub static IMAGE: LazyLock<Vec<Selector>> = LazyLock::new(|| {
        vec![
            sel("meta[property='og:image']"),
            sel("#pd-image-main img, .product-gallery img, .pd-image img"),
            sel("img"),
        ]
    });

    pub static SCRIPT: LazyLock<Selector> = LazyLock::new(|| sel("script"));
}
