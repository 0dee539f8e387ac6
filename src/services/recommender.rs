//! Recommendation pipeline
//!
//! Builds the search query, drives the primary (Google) and secondary
//! (Amazon) providers, budget-filters each provider's products, and hands the
//! merged candidates to the [`Aggregator`] for dedup, ranking and selection.
//! Provider failures are collected as warnings and never abort the request.

use std::fmt;
use std::sync::Arc;

use crate::config::ProviderConfig;
use crate::providers::{AmazonSearchProvider, GoogleShoppingProvider, SearchProvider};
use crate::services::budget::{filter_by_budget, parse_budget};
use crate::services::cache::ResponseCache;
use crate::services::{Aggregator, DESIRED_RESULTS};
use crate::types::{BudgetRange, Product, Result, ShopmixError};

/// Marketplace used when the caller does not pick one
pub const DEFAULT_COUNTRY: &str = "IN";

/// Inputs collected from the user
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationRequest {
    pub keywords: String,
    pub color: String,
    pub gender: String,
    pub budget: String,
    pub country: String,
}

impl Default for RecommendationRequest {
    fn default() -> Self {
        Self {
            keywords: String::new(),
            color: String::new(),
            gender: String::new(),
            budget: String::new(),
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

impl RecommendationRequest {
    /// Start a request from item keywords, falling back to a category.
    /// Fails when both are blank.
    pub fn from_terms(keywords: &str, category: &str) -> Result<Self> {
        let terms = [keywords, category]
            .into_iter()
            .map(str::trim)
            .find(|t| !t.is_empty())
            .ok_or_else(|| ShopmixError::Config("Please enter items or category".into()))?;

        Ok(Self {
            keywords: terms.to_string(),
            ..Default::default()
        })
    }
}

/// A provider call that failed; reported to the caller, not fatal
#[derive(Debug)]
pub struct ProviderFailure {
    pub provider: String,
    pub error: ShopmixError,
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} search failed: {}", display_provider(&self.provider), self.error)
    }
}

fn display_provider(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Outcome of one recommendation request
#[derive(Debug)]
pub struct Recommendations {
    /// Query string sent to the providers
    pub query: String,
    pub budget: BudgetRange,
    /// Final list, at most [`DESIRED_RESULTS`] long
    pub products: Vec<Product>,
    pub failures: Vec<ProviderFailure>,
}

impl Recommendations {
    /// True when no provider produced a usable product
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Build the provider query from keywords, color and gender.
///
/// Color is appended unless the keywords already mention it
/// (case-insensitive). Recognized genders append "men" or "women".
pub fn build_query(keywords: &str, color: &str, gender: &str) -> String {
    let mut query = keywords.trim().to_string();

    let color = color.trim();
    if !color.is_empty() && !query.to_lowercase().contains(&color.to_lowercase()) {
        query = format!("{} {}", query, color);
    }

    match gender.trim().to_lowercase().as_str() {
        "male" | "man" | "men" => query = format!("{} men", query),
        "female" | "woman" | "women" => query = format!("{} women", query),
        _ => {}
    }

    query
}

/// Drives both providers and assembles the final recommendation list
pub struct Recommender {
    primary: Box<dyn SearchProvider>,
    secondary: Box<dyn SearchProvider>,
}

impl Recommender {
    /// Google as primary, Amazon as secondary, sharing one cache
    pub fn new(config: &ProviderConfig, cache: Arc<ResponseCache>) -> Result<Self> {
        Ok(Self {
            primary: Box::new(GoogleShoppingProvider::new(
                config.google.clone(),
                cache.clone(),
            )?),
            secondary: Box::new(AmazonSearchProvider::new(config.amazon.clone(), cache)?),
        })
    }

    /// Create a recommender with custom providers (for testing)
    pub fn with_providers(
        primary: Box<dyn SearchProvider>,
        secondary: Box<dyn SearchProvider>,
    ) -> Self {
        Self { primary, secondary }
    }

    /// Run the full pipeline. Never fails: provider errors end up in
    /// [`Recommendations::failures`] and an empty product list means no results.
    pub fn fetch_recommendations(&self, request: &RecommendationRequest) -> Recommendations {
        let query = build_query(&request.keywords, &request.color, &request.gender);
        let budget = parse_budget(&request.budget);
        let country = match request.country.trim() {
            "" => DEFAULT_COUNTRY,
            c => c,
        };

        let mut candidates: Vec<Product> = Vec::new();
        let mut failures: Vec<ProviderFailure> = Vec::new();

        self.collect_from(
            self.primary.as_ref(),
            &query,
            country,
            &budget,
            &mut candidates,
            &mut failures,
        );

        // Secondary provider only tops up a thin primary result
        if candidates.len() < DESIRED_RESULTS {
            self.collect_from(
                self.secondary.as_ref(),
                &query,
                country,
                &budget,
                &mut candidates,
                &mut failures,
            );
        } else {
            tracing::debug!(
                candidates = candidates.len(),
                provider = self.secondary.name(),
                "skipping secondary provider"
            );
        }

        let products = if candidates.is_empty() {
            Vec::new()
        } else {
            Aggregator::assemble(candidates, &budget)
        };

        tracing::debug!(%query, selected = products.len(), "recommendations assembled");

        Recommendations {
            query,
            budget,
            products,
            failures,
        }
    }

    fn collect_from(
        &self,
        provider: &dyn SearchProvider,
        query: &str,
        country: &str,
        budget: &BudgetRange,
        candidates: &mut Vec<Product>,
        failures: &mut Vec<ProviderFailure>,
    ) {
        match provider.search(query, country) {
            Ok(products) => {
                let found = products.len();
                let kept = filter_by_budget(products, budget);
                tracing::debug!(
                    provider = provider.name(),
                    found,
                    kept = kept.len(),
                    "provider results"
                );
                candidates.extend(kept);
            }
            Err(error) => {
                tracing::warn!(provider = provider.name(), %error, "search failed");
                failures.push(ProviderFailure {
                    provider: provider.name().to_string(),
                    error,
                });
            }
        }
    }
}
