//! Search provider trait and RapidAPI-backed implementations

mod amazon;
mod google;
mod rapidapi;

pub use amazon::{AmazonSearchProvider, AMAZON_ITEM_SCHEMA};
pub use google::{is_storefront_url, GoogleShoppingProvider, GOOGLE_ITEM_SCHEMA, STOREFRONT_MARKERS};
pub use rapidapi::{RapidApiClient, REQUEST_TIMEOUT_SECS};

use crate::types::{Product, Result};

/// A remote shopping search backend
pub trait SearchProvider: Send + Sync {
    /// Provider name used in cache keys and warnings (e.g., "google")
    fn name(&self) -> &str;

    /// Run one search and return normalized products in provider order
    fn search(&self, query: &str, country: &str) -> Result<Vec<Product>>;
}

/// Parse a provider payload into products without touching the network
pub fn products_from_response(provider: &str, response: &serde_json::Value) -> Vec<Product> {
    match provider {
        google::GOOGLE_TAG => google::products_from_response(response),
        amazon::AMAZON_TAG => amazon::products_from_response(response),
        _ => Vec::new(),
    }
}
