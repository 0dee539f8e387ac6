//! Blocking RapidAPI client with response caching

use crate::config::RapidApiEndpoint;
use crate::services::cache::{make_cache_key, ResponseCache};
use crate::types::{Result, ShopmixError};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// HTTP request timeout in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 8;

/// Issues GET requests to one RapidAPI service, consulting the shared cache first
pub struct RapidApiClient {
    http: reqwest::blocking::Client,
    endpoint: RapidApiEndpoint,
    cache: Arc<ResponseCache>,
}

impl RapidApiClient {
    pub fn new(endpoint: RapidApiEndpoint, cache: Arc<ResponseCache>) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ShopmixError::Config(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            http,
            endpoint,
            cache,
        })
    }

    /// GET `path` with `params`, returning the cached payload when fresh.
    ///
    /// `tag` namespaces the cache key per provider. Only successful,
    /// parseable responses are cached.
    pub fn get_json(&self, tag: &str, path: &str, params: &[(&str, &str)]) -> Result<Value> {
        let cache_key = make_cache_key(tag, params);
        if let Some(cached) = self.cache.get(&cache_key) {
            tracing::debug!(provider = tag, key = %cache_key, "cache hit");
            return Ok(cached);
        }

        let url = format!("{}{}", self.endpoint.base_url.trim_end_matches('/'), path);
        tracing::debug!(provider = tag, %url, "cache miss, sending request");

        let response = self
            .http
            .get(&url)
            .header("x-rapidapi-key", &self.endpoint.key)
            .header("x-rapidapi-host", &self.endpoint.host)
            .query(params)
            .send()?
            .error_for_status()?;

        let payload: Value = response.json()?;
        self.cache.put(cache_key, payload.clone());
        Ok(payload)
    }
}
