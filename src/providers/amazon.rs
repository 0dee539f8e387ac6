//! Amazon product search provider

use super::{RapidApiClient, SearchProvider};
use crate::config::RapidApiEndpoint;
use crate::services::cache::ResponseCache;
use crate::services::normalizer::{ItemSchema, SourceRule};
use crate::types::{Product, Result};
use serde_json::Value;
use std::sync::Arc;

pub(crate) const AMAZON_TAG: &str = "amazon";

/// Top-level keys that may hold the item list, in priority order
const ITEM_LIST_KEYS: &[&str] = &["results", "products", "items", "search_results"];

pub const AMAZON_ITEM_SCHEMA: ItemSchema = ItemSchema {
    title: &["title", "product_title"],
    price: &[
        "price",
        "product_price",
        "product_minimum_offer_price",
        "price_current",
    ],
    url: &["url", "product_link", "detail_page_url", "product_url"],
    image: &["image", "thumbnail", "product_photo"],
    source: SourceRule::Fixed("Amazon.in"),
};

/// Locate the item list: the first top-level array among [`ITEM_LIST_KEYS`],
/// else `data.products` when that first match is missing or empty.
fn collect_items(response: &Value) -> &[Value] {
    let top_level = ITEM_LIST_KEYS
        .iter()
        .find_map(|key| response.get(*key).and_then(Value::as_array));

    match top_level {
        Some(items) if !items.is_empty() => items,
        _ => response
            .get("data")
            .and_then(|data| data.get("products"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]),
    }
}

pub(crate) fn products_from_response(response: &Value) -> Vec<Product> {
    collect_items(response)
        .iter()
        .map(|item| AMAZON_ITEM_SCHEMA.normalize(item))
        .collect()
}

/// Amazon search via RapidAPI
pub struct AmazonSearchProvider {
    client: RapidApiClient,
}

impl AmazonSearchProvider {
    pub fn new(endpoint: RapidApiEndpoint, cache: Arc<ResponseCache>) -> Result<Self> {
        Ok(Self {
            client: RapidApiClient::new(endpoint, cache)?,
        })
    }
}

impl SearchProvider for AmazonSearchProvider {
    fn name(&self) -> &str {
        AMAZON_TAG
    }

    fn search(&self, query: &str, country: &str) -> Result<Vec<Product>> {
        let params = [("query", query), ("page", "1"), ("country", country)];
        let response = self.client.get_json(AMAZON_TAG, "/search", &params)?;
        let products = products_from_response(&response);
        tracing::debug!(count = products.len(), country, "amazon products normalized");
        Ok(products)
    }
}
