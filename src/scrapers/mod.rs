pub mod http;
pub mod listing;
pub mod notino;
pub mod price;
pub mod product;
pub mod selectors;
pub mod traits;
pub mod types;

pub use listing::{extract_listing, parse_listing};
pub use notino::{default_shop_domains, validate_product_url, NotinoScraper, ShopDomain};
pub use price::{clean_text, parse_price};
pub use product::{extract_product, parse_product};
pub use traits::ScraperTrait;
pub use types::{ListingParams, RetryPolicy, ScraperConfig};
