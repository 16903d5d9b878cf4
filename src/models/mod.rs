use serde::{Deserialize, Serialize};

/// Shop a price record was scraped from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Notino,
}

/// Normalized price record for one perfume.
///
/// Listing pages produce many of these; a product page produces exactly one,
/// whose `url` is the requested page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerfumeItem {
    pub source: Source,
    pub name: String,
    pub price: f64,
    pub currency: String,
    pub url: String,
    pub image: Option<String>,
}

/// Catalogue entry served by the sample endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Perfume {
    pub name: String,
    pub brand: String,
    pub price: f64,
    pub url: String,
}

/// Fixed sample catalogue, handy for wiring a frontend without hitting the shop
pub fn sample_perfumes() -> Vec<Perfume> {
    vec![
        Perfume {
            name: "Oud for Greatness".to_string(),
            brand: "Initio".to_string(),
            price: 245.00,
            url: "https://example.com/oud-for-greatness".to_string(),
        },
        Perfume {
            name: "Herod".to_string(),
            brand: "Parfums de Marly".to_string(),
            price: 180.00,
            url: "https://example.com/herod".to_string(),
        },
    ]
}
