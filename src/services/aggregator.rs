//! Aggregator service for merging provider results into a final shortlist

use crate::types::{BudgetRange, Product};
use std::collections::{HashMap, HashSet};

/// Number of products in a recommendation list
pub const DESIRED_RESULTS: usize = 6;

/// Products allowed per domain before the cap is relaxed
pub const PER_DOMAIN_LIMIT: usize = 2;

/// Aggregator for deduplicating, ranking and selecting products
pub struct Aggregator;

impl Aggregator {
    /// Drop repeated products by `(domain, title)`, keeping first occurrences in order
    pub fn deduplicate(products: Vec<Product>) -> Vec<Product> {
        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut unique: Vec<Product> = Vec::with_capacity(products.len());

        for product in products {
            let (domain, title) = product.dedup_key();
            if seen.insert((domain.to_string(), title.to_string())) {
                unique.push(product);
            }
        }

        unique
    }

    /// Stable sort by distance from the budget target.
    ///
    /// Products without a price count as matching the target. Without a
    /// budget the order is left alone.
    pub fn rank_by_price(mut products: Vec<Product>, budget: &BudgetRange) -> Vec<Product> {
        let Some(target) = budget.target() else {
            return products;
        };

        let distance = |p: &Product| (p.price.unwrap_or(target) - target).abs();
        products.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
        products
    }

    /// Pick up to `desired` products, at most `per_domain_limit` per domain.
    ///
    /// A second pass admits remaining products regardless of domain when the
    /// capped pass falls short. If both passes still fall short, the first
    /// `desired` ranked products are returned as-is.
    pub fn enforce_domain_mix(
        products: &[Product],
        desired: usize,
        per_domain_limit: usize,
    ) -> Vec<Product> {
        if desired == 0 {
            return Vec::new();
        }

        let mut selected: Vec<usize> = Vec::with_capacity(desired);
        let mut taken: HashSet<usize> = HashSet::new();
        let mut counts: HashMap<&str, usize> = HashMap::new();

        let mut admit = |limit: Option<usize>, selected: &mut Vec<usize>| {
            for (idx, product) in products.iter().enumerate() {
                if selected.len() >= desired {
                    return;
                }
                let count = counts.entry(product.domain.as_str()).or_insert(0);
                if limit.is_some_and(|l| *count >= l) || taken.contains(&idx) {
                    continue;
                }
                taken.insert(idx);
                selected.push(idx);
                *count += 1;
            }
        };

        admit(Some(per_domain_limit), &mut selected);
        if selected.len() < desired {
            admit(None, &mut selected);
        }

        if selected.len() < desired {
            return products.iter().take(desired).cloned().collect();
        }

        selected.into_iter().map(|idx| products[idx].clone()).collect()
    }

    /// Deduplicate, rank and select the final list from merged candidates
    pub fn assemble(candidates: Vec<Product>, budget: &BudgetRange) -> Vec<Product> {
        let unique = Self::deduplicate(candidates);
        let ranked = Self::rank_by_price(unique, budget);
        let mut selected = Self::enforce_domain_mix(&ranked, DESIRED_RESULTS, PER_DOMAIN_LIMIT);
        selected.truncate(DESIRED_RESULTS);
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_product(domain: &str, title: &str, price: Option<f64>) -> Product {
        Product {
            title: title.to_string(),
            price,
            domain: domain.to_string(),
            source: domain.to_string(),
            url: format!("https://{}/{}", domain, title),
            ..Default::default()
        }
    }

    fn domain_counts(products: &[Product]) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for p in products {
            *counts.entry(p.domain.clone()).or_insert(0) += 1;
        }
        counts
    }

    fn titles(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.title.as_str()).collect()
    }

    // ========== deduplicate() tests ==========

    #[test]
    fn test_deduplicate_empty() {
        assert!(Aggregator::deduplicate(Vec::new()).is_empty());
    }

    #[test]
    fn test_deduplicate_keeps_first_occurrence() {
        let products = vec![
            make_product("a.com", "shoe", Some(100.0)),
            make_product("b.com", "bag", Some(200.0)),
            make_product("a.com", "shoe", Some(90.0)),
        ];

        let result = Aggregator::deduplicate(products);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].price, Some(100.0));
        assert_eq!(titles(&result), vec!["shoe", "bag"]);
    }

    #[test]
    fn test_deduplicate_same_title_different_domain_kept() {
        let products = vec![
            make_product("a.com", "shoe", None),
            make_product("b.com", "shoe", None),
        ];
        assert_eq!(Aggregator::deduplicate(products).len(), 2);
    }

    #[test]
    fn test_deduplicate_no_identical_keys_remain() {
        let products: Vec<Product> = (0..30)
            .map(|i| make_product(&format!("d{}.com", i % 3), &format!("t{}", i % 5), None))
            .collect();

        let result = Aggregator::deduplicate(products);

        let keys: HashSet<(&str, &str)> = result.iter().map(|p| p.dedup_key()).collect();
        assert_eq!(keys.len(), result.len());
        assert_eq!(result.len(), 15);
    }

    // ========== rank_by_price() tests ==========

    #[test]
    fn test_rank_without_budget_keeps_order() {
        let products = vec![
            make_product("a.com", "x", Some(900.0)),
            make_product("b.com", "y", Some(100.0)),
        ];
        let result = Aggregator::rank_by_price(products, &BudgetRange::unbounded());
        assert_eq!(titles(&result), vec!["x", "y"]);
    }

    #[test]
    fn test_rank_by_distance_to_high_bound() {
        let products = vec![
            make_product("a.com", "far", Some(1000.0)),
            make_product("a.com", "near", Some(1950.0)),
            make_product("a.com", "exact", Some(2000.0)),
        ];

        let result = Aggregator::rank_by_price(products, &BudgetRange::new(1000.0, 2000.0));

        assert_eq!(titles(&result), vec!["exact", "near", "far"]);
    }

    #[test]
    fn test_rank_unknown_price_treated_as_exact_match() {
        let products = vec![
            make_product("a.com", "close", Some(3100.0)),
            make_product("a.com", "unknown", None),
        ];

        let result = Aggregator::rank_by_price(products, &BudgetRange::new(3000.0, 3000.0));

        assert_eq!(titles(&result), vec!["unknown", "close"]);
    }

    #[test]
    fn test_rank_is_stable_for_ties() {
        let products = vec![
            make_product("a.com", "first", Some(900.0)),
            make_product("b.com", "second", Some(1100.0)),
        ];
        let result = Aggregator::rank_by_price(products, &BudgetRange::new(1000.0, 1000.0));
        assert_eq!(titles(&result), vec!["first", "second"]);
    }

    // ========== enforce_domain_mix() tests ==========

    #[test]
    fn test_domain_mix_caps_each_domain() {
        let mut products = Vec::new();
        for domain in ["a.com", "b.com", "c.com", "d.com"] {
            for i in 0..3 {
                products.push(make_product(domain, &format!("{}-{}", domain, i), None));
            }
        }

        let result = Aggregator::enforce_domain_mix(&products, 6, 2);

        assert_eq!(result.len(), 6);
        assert!(domain_counts(&result).values().all(|&c| c <= 2));
        assert_eq!(
            titles(&result),
            vec!["a.com-0", "a.com-1", "b.com-0", "b.com-1", "c.com-0", "c.com-1"]
        );
    }

    #[test]
    fn test_domain_mix_relaxes_cap_when_short() {
        let products = vec![
            make_product("a.com", "a1", None),
            make_product("a.com", "a2", None),
            make_product("a.com", "a3", None),
            make_product("a.com", "a4", None),
            make_product("b.com", "b1", None),
            make_product("a.com", "a5", None),
            make_product("a.com", "a6", None),
        ];

        let result = Aggregator::enforce_domain_mix(&products, 6, 2);

        // Pass 1 takes a1, a2, b1; pass 2 fills from the top of the list
        assert_eq!(titles(&result), vec!["a1", "a2", "b1", "a3", "a4", "a5"]);
    }

    #[test]
    fn test_domain_mix_fewer_than_desired_returns_all_in_order() {
        let products = vec![
            make_product("a.com", "a1", None),
            make_product("a.com", "a2", None),
            make_product("a.com", "a3", None),
            make_product("b.com", "b1", None),
        ];

        let result = Aggregator::enforce_domain_mix(&products, 6, 2);

        assert_eq!(result, products);
    }

    #[test]
    fn test_domain_mix_empty_input() {
        assert!(Aggregator::enforce_domain_mix(&[], 6, 2).is_empty());
    }

    #[test]
    fn test_domain_mix_zero_desired() {
        let products = vec![make_product("a.com", "a1", None)];
        assert!(Aggregator::enforce_domain_mix(&products, 0, 2).is_empty());
    }

    #[test]
    fn test_domain_mix_never_exceeds_desired() {
        let products: Vec<Product> = (0..20)
            .map(|i| make_product(&format!("d{}.com", i % 7), &format!("t{}", i), None))
            .collect();
        for desired in 1..10 {
            let result = Aggregator::enforce_domain_mix(&products, desired, 2);
            assert_eq!(result.len(), desired);
        }
    }

    // ========== assemble() tests ==========

    #[test]
    fn test_assemble_dedups_ranks_and_selects() {
        let candidates = vec![
            make_product("a.com", "a-far", Some(1000.0)),
            make_product("a.com", "a-near", Some(1900.0)),
            make_product("a.com", "a-exact", Some(2000.0)),
            make_product("b.com", "b1", Some(1800.0)),
            make_product("b.com", "b1", Some(1800.0)),
            make_product("c.com", "c1", Some(1700.0)),
            make_product("c.com", "c2", Some(1600.0)),
            make_product("d.com", "d1", Some(1500.0)),
        ];

        let result = Aggregator::assemble(candidates, &BudgetRange::new(1000.0, 2000.0));

        assert_eq!(
            titles(&result),
            vec!["a-exact", "a-near", "b1", "c1", "c2", "d1"]
        );
    }

    #[test]
    fn test_assemble_empty() {
        assert!(Aggregator::assemble(Vec::new(), &BudgetRange::unbounded()).is_empty());
    }
}
