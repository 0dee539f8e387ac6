//! Budget parsing and filtering

use crate::types::{BudgetRange, Product};
use regex::Regex;

/// Parse a free-text budget such as "3000", "2,000-5,000" or "₹1500 to 2500".
///
/// Commas are stripped first. Only ASCII digit runs count as numbers. Two or
/// more numbers give a sorted `(low, high)` from the first two; a single
/// number gives `low == high`; no numbers gives an unbounded range.
///
/// # Examples
/// ```
/// use shopmix::services::budget::parse_budget;
///
/// let budget = parse_budget("2,000-5,000");
/// assert_eq!((budget.low, budget.high), (Some(2000.0), Some(5000.0)));
/// ```
pub fn parse_budget(text: &str) -> BudgetRange {
    let cleaned = text.replace(',', "");
    let re = Regex::new(r"[0-9]+").expect("valid regex");
    let numbers: Vec<f64> = re
        .find_iter(&cleaned)
        .take(2)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect();

    match numbers.as_slice() {
        [a, b, ..] => BudgetRange::new(a.min(*b), a.max(*b)),
        [single] => BudgetRange::new(*single, *single),
        [] => BudgetRange::unbounded(),
    }
}

/// Keep products whose known price lies inside the budget's tolerance band.
///
/// Products without a numeric price are dropped. If nothing survives, the
/// input list is returned so filtering never empties the candidates.
pub fn filter_by_budget(products: Vec<Product>, budget: &BudgetRange) -> Vec<Product> {
    let Some((min_allowed, max_allowed)) = budget.tolerance_band() else {
        return products;
    };

    let filtered: Vec<Product> = products
        .iter()
        .filter(|p| {
            p.price
                .is_some_and(|price| price >= min_allowed && price <= max_allowed)
        })
        .cloned()
        .collect();

    if filtered.is_empty() {
        tracing::debug!(
            candidates = products.len(),
            "no products inside budget band, keeping all"
        );
        products
    } else {
        filtered
    }
}
