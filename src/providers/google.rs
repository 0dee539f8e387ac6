//! Google search provider (shopping results plus organic storefront links)

use super::{RapidApiClient, SearchProvider};
use crate::config::RapidApiEndpoint;
use crate::services::cache::ResponseCache;
use crate::services::normalizer::{ItemSchema, SourceRule};
use crate::types::{Product, Result};
use serde_json::Value;
use std::sync::Arc;

pub(crate) const GOOGLE_TAG: &str = "google";

/// Results requested per search
const RESULT_LIMIT: &str = "18";

/// URL fragments identifying storefront pages among organic results
pub const STOREFRONT_MARKERS: &[&str] = &[
    "amazon.",
    "flipkart.",
    "myntra.",
    "ajio.",
    "tatacliq",
    "nykaa",
    "meesho",
    "reliance",
    "snapdeal",
    "croma",
    "shopclues",
    "limeroad",
    "shoppersstop",
    "pantaloons",
    "nike.",
    "adidas.",
];

pub const GOOGLE_ITEM_SCHEMA: ItemSchema = ItemSchema {
    title: &["title", "name"],
    price: &["price", "price_string"],
    url: &["link", "url"],
    image: &["thumbnail", "thumbnail_highres", "image"],
    source: SourceRule::Fields(&["source", "displayed_url"]),
};

/// Whether an organic result links to a known storefront.
/// Amazon pages are excluded since the Amazon provider covers them.
pub fn is_storefront_url(url: &str) -> bool {
    let url = url.to_lowercase();
    if url.contains("amazon") {
        return false;
    }
    STOREFRONT_MARKERS.iter().any(|marker| url.contains(marker))
}

/// Shopping results first, then organic results that point at storefronts
fn collect_items(response: &Value) -> Vec<&Value> {
    let mut items: Vec<&Value> = Vec::new();

    if let Some(shopping) = response.get("shopping_results").and_then(Value::as_array) {
        items.extend(shopping.iter());
    }

    if let Some(results) = response.get("results").and_then(Value::as_array) {
        items.extend(results.iter().filter(|res| {
            let url = res.get("url").and_then(Value::as_str).unwrap_or("");
            is_storefront_url(url)
        }));
    }

    items
}

pub(crate) fn products_from_response(response: &Value) -> Vec<Product> {
    collect_items(response)
        .into_iter()
        .map(|item| GOOGLE_ITEM_SCHEMA.normalize(item))
        .collect()
}

/// Google search via RapidAPI
pub struct GoogleShoppingProvider {
    client: RapidApiClient,
}

impl GoogleShoppingProvider {
    pub fn new(endpoint: RapidApiEndpoint, cache: Arc<ResponseCache>) -> Result<Self> {
        Ok(Self {
            client: RapidApiClient::new(endpoint, cache)?,
        })
    }
}

impl SearchProvider for GoogleShoppingProvider {
    fn name(&self) -> &str {
        GOOGLE_TAG
    }

    fn search(&self, query: &str, _country: &str) -> Result<Vec<Product>> {
        let params = [
            ("query", query),
            ("limit", RESULT_LIMIT),
            ("related_keywords", "false"),
        ];
        let response = self.client.get_json(GOOGLE_TAG, "/", &params)?;
        let products = products_from_response(&response);
        tracing::debug!(count = products.len(), "google products normalized");
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::cache::make_cache_key;
    use serde_json::json;

    fn fixture() -> Value {
        serde_json::from_str(include_str!("../../tests/fixtures/google_search.json")).unwrap()
    }

    // ========== is_storefront_url ==========

    #[test]
    fn test_storefront_url_known_store() {
        assert!(is_storefront_url("https://www.myntra.com/shoes/123"));
        assert!(is_storefront_url("https://www.TataCliq.com/p-1"));
    }

    #[test]
    fn test_storefront_url_excludes_amazon() {
        assert!(!is_storefront_url("https://www.amazon.in/dp/B01"));
    }

    #[test]
    fn test_storefront_url_rejects_unknown_site() {
        assert!(!is_storefront_url("https://en.wikipedia.org/wiki/Shoe"));
        assert!(!is_storefront_url(""));
    }

    // ========== collect_items / products_from_response ==========

    #[test]
    fn test_collect_items_shopping_then_filtered_organic() {
        let response = json!({
            "shopping_results": [{"title": "S1"}, {"title": "S2"}],
            "results": [
                {"title": "R-wiki", "url": "https://en.wikipedia.org/wiki/Shoe"},
                {"title": "R-amazon", "url": "https://www.amazon.in/dp/1"},
                {"title": "R-flipkart", "url": "https://www.flipkart.com/p/1"}
            ]
        });

        let titles: Vec<&str> = collect_items(&response)
            .iter()
            .filter_map(|i| i["title"].as_str())
            .collect();

        assert_eq!(titles, vec!["S1", "S2", "R-flipkart"]);
    }

    #[test]
    fn test_collect_items_ignores_non_arrays() {
        let response = json!({"shopping_results": {"title": "x"}, "results": "none"});
        assert!(collect_items(&response).is_empty());
        assert!(collect_items(&json!([1, 2])).is_empty());
    }

    #[test]
    fn test_products_from_fixture() {
        let products = products_from_response(&fixture());

        assert_eq!(products.len(), 4);

        let first = &products[0];
        assert_eq!(first.title, "Nike Revolution 6 Running Shoes");
        assert_eq!(first.price, Some(3295.0));
        assert_eq!(first.price_display.as_deref(), Some("₹3,295"));
        assert_eq!(first.domain, "myntra.com");
        assert_eq!(first.image, "https://encrypted-tbn0.gstatic.com/images?q=1");

        let string_price = &products[1];
        assert_eq!(string_price.price, Some(2799.0));
        assert_eq!(string_price.price_display.as_deref(), Some("₹2,799.00"));
        assert_eq!(string_price.source, "Flipkart");

        let organic = &products[3];
        assert_eq!(organic.title, "Puma Black Sneakers - AJIO");
        assert_eq!(organic.url, "https://www.ajio.com/puma-black-sneakers/p/1");
        assert_eq!(organic.source, "www.ajio.com");
        assert_eq!(organic.domain, "ajio.com");
        assert!(organic.price.is_none());
    }

    #[test]
    fn test_search_served_from_cache() {
        let cache = Arc::new(ResponseCache::new());
        let key = make_cache_key(
            GOOGLE_TAG,
            &[("query", "black shoes"), ("limit", "18"), ("related_keywords", "false")],
        );
        cache.put(key, fixture());

        let endpoint = RapidApiEndpoint::new("k", "google.test").with_base_url("http://127.0.0.1:1");
        let provider = GoogleShoppingProvider::new(endpoint, cache).unwrap();

        let products = provider.search("black shoes", "IN").unwrap();
        assert_eq!(products.len(), 4);
        assert_eq!(provider.name(), "google");
    }
}
