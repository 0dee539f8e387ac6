//! Product and budget types shared across the pipeline

use serde::{Deserialize, Serialize};

/// Currency symbol used for every formatted price
pub const CURRENCY_SYMBOL: &str = "₹";

/// Canonical product record produced by normalizing a provider item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Product {
    pub title: String,
    /// Numeric price, absent when the raw value could not be parsed
    pub price: Option<f64>,
    /// Pre-formatted price shown to the user
    pub price_display: Option<String>,
    pub url: String,
    pub image: String,
    /// Human-readable store label (e.g. "Amazon.in", "Myntra")
    pub source: String,
    /// Lowercase host without a leading `www.`
    pub domain: String,
}

impl Product {
    /// Title for display, falling back to "Untitled"
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "Untitled"
        } else {
            &self.title
        }
    }

    /// Price for display: the provider's own text first, then the numeric value
    pub fn display_price(&self) -> Option<String> {
        if let Some(text) = self.price_display.as_deref().filter(|t| !t.is_empty()) {
            return Some(text.to_string());
        }
        self.price.map(|p| format!("{}{:.0}", CURRENCY_SYMBOL, p))
    }

    /// Identity used for duplicate suppression
    pub fn dedup_key(&self) -> (&str, &str) {
        (&self.domain, &self.title)
    }
}

/// Budget bounds parsed from free text. Both bounds are absent when the
/// text contained no numbers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BudgetRange {
    pub low: Option<f64>,
    pub high: Option<f64>,
}

/// Lower tolerance multiplier (-20%)
pub const BUDGET_LOWER_TOLERANCE: f64 = 0.8;

/// Upper tolerance multiplier (+20%)
pub const BUDGET_UPPER_TOLERANCE: f64 = 1.2;

impl BudgetRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self {
            low: Some(low),
            high: Some(high),
        }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_bounded(&self) -> bool {
        self.low.is_some()
    }

    /// Price the ranking step aims for: the high bound when set, else the low one
    pub fn target(&self) -> Option<f64> {
        let low = self.low?;
        Some(self.high.filter(|h| *h != 0.0).unwrap_or(low))
    }

    /// Inclusive `[min, max]` window admitted by the budget filter
    pub fn tolerance_band(&self) -> Option<(f64, f64)> {
        let low = self.low?;
        let upper = self.target().unwrap_or(low);
        Some((low * BUDGET_LOWER_TOLERANCE, upper * BUDGET_UPPER_TOLERANCE))
    }
}
