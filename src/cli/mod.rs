use std::fmt::Write as _;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::ProviderConfig;
use crate::services::budget::parse_budget;
use crate::services::{RecommendationRequest, Recommender, ResponseCache};
use crate::types::{BudgetRange, Product};

/// Budget-aware product recommendations from Google Shopping and Amazon
#[derive(Parser)]
#[command(name = "shopmix")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search both stores and print up to six recommendations
    Search(SearchArgs),

    /// Show how a budget text is interpreted
    Budget {
        /// Budget text, e.g. "3000" or "2,000-5,000"
        text: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Country {
    #[value(name = "IN")]
    In,
    #[value(name = "US")]
    Us,
    #[value(name = "UK")]
    Uk,
}

impl Country {
    fn code(self) -> &'static str {
        match self {
            Country::In => "IN",
            Country::Us => "US",
            Country::Uk => "UK",
        }
    }
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Items or keywords to search for
    #[arg(value_name = "KEYWORDS")]
    keywords: Vec<String>,

    /// Category used when no keywords are given
    #[arg(long, default_value = "")]
    category: String,

    /// Preferred color
    #[arg(long, default_value = "")]
    color: String,

    /// Gender (male/female; anything else is ignored)
    #[arg(long, default_value = "")]
    gender: String,

    /// Budget in ₹, a single amount or a range
    #[arg(long, default_value = "")]
    budget: String,

    /// Marketplace country
    #[arg(long, value_enum, default_value = "IN")]
    country: Country,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Search(args) => run_search(args),
            Commands::Budget { text } => {
                println!("{}", describe_budget(&parse_budget(&text)));
                Ok(())
            }
        }
    }
}

fn run_search(args: SearchArgs) -> anyhow::Result<()> {
    let mut request = RecommendationRequest::from_terms(&args.keywords.join(" "), &args.category)?;
    request.color = args.color;
    request.gender = args.gender;
    request.budget = args.budget;
    request.country = args.country.code().to_string();

    let config = ProviderConfig::from_env();
    let recommender = Recommender::new(&config, Arc::new(ResponseCache::new()))?;
    let recommendations = recommender.fetch_recommendations(&request);

    for failure in &recommendations.failures {
        eprintln!("[shopmix] Warning: {}", failure);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&recommendations.products)?);
        return Ok(());
    }

    if recommendations.is_empty() {
        println!("No products found for those filters.");
        return Ok(());
    }

    print!("{}", render_products(&recommendations.products));
    Ok(())
}

/// Render products as a numbered list
fn render_products(products: &[Product]) -> String {
    let mut out = format!("Showing {} products\n", products.len());
    for (idx, product) in products.iter().enumerate() {
        let _ = writeln!(out, "\n{}. {}", idx + 1, product.display_title());
        if let Some(price) = product.display_price() {
            let _ = writeln!(out, "   Price: {}", price);
        }
        if !product.source.is_empty() {
            let _ = writeln!(out, "   Source: {}", product.source);
        }
        if !product.url.is_empty() {
            let _ = writeln!(out, "   {}", product.url);
        }
    }
    out
}

fn describe_budget(budget: &BudgetRange) -> String {
    match (budget.low, budget.high, budget.tolerance_band()) {
        (Some(low), Some(high), Some((min, max))) => format!(
            "Budget ₹{:.0}-₹{:.0} (accepting ₹{:.0}-₹{:.0})",
            low, high, min, max
        ),
        _ => "No budget: all prices accepted".to_string(),
    }
}
