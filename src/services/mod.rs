//! Services for caching, normalization, filtering and selection

pub mod aggregator;
pub mod budget;
pub mod cache;
pub mod normalizer;
pub mod recommender;

pub use aggregator::{Aggregator, DESIRED_RESULTS, PER_DOMAIN_LIMIT};
pub use budget::{filter_by_budget, parse_budget};
pub use cache::{Clock, ResponseCache, SystemClock};
pub use normalizer::{extract_domain, normalize_url};
pub use recommender::{
    build_query, ProviderFailure, RecommendationRequest, Recommendations, Recommender,
};
