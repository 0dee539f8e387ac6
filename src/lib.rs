//! shopmix: budget-aware, store-diverse product recommendations aggregated
//! from Google Shopping and Amazon search.

pub mod cli;
pub mod config;
pub mod providers;
pub mod services;
pub mod types;
