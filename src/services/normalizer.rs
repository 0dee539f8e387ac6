//! Product normalization service
//!
//! Maps provider items, whose field names vary per provider and even per item,
//! onto the canonical [`Product`] record. Each provider describes its items
//! with an [`ItemSchema`]: an ordered list of candidate field names per
//! product attribute, tried in priority order until one yields a value.

use crate::types::{Product, CURRENCY_SYMBOL};
use serde_json::Value;
use url::Url;

/// Origin used to resolve root-relative links (`/dp/...`)
pub const DEFAULT_MARKETPLACE_ORIGIN: &str = "https://www.amazon.in";

/// Where a product's store label comes from
#[derive(Debug, Clone, Copy)]
pub enum SourceRule {
    /// First present field among these names
    Fields(&'static [&'static str]),
    /// Same label for every item of the provider
    Fixed(&'static str),
}

/// Field-extraction rules for one provider's items
#[derive(Debug, Clone, Copy)]
pub struct ItemSchema {
    pub title: &'static [&'static str],
    pub price: &'static [&'static str],
    pub url: &'static [&'static str],
    pub image: &'static [&'static str],
    pub source: SourceRule,
}

impl ItemSchema {
    /// Map one raw item onto a [`Product`]
    pub fn normalize(&self, item: &Value) -> Product {
        let (price, price_display) = extract_price(first_present(item, self.price));

        let source = match self.source {
            SourceRule::Fields(fields) => first_string(item, fields),
            SourceRule::Fixed(label) => label.to_string(),
        };

        let product = Product {
            title: first_string(item, self.title),
            price,
            price_display,
            url: normalize_url(&first_string(item, self.url)),
            image: normalize_url(&first_string(item, self.image)),
            source,
            domain: String::new(),
        };

        ensure_domain(product)
    }
}

/// Whether a JSON value counts as supplied: not null, not an empty string,
/// not `false`, not zero, and not an empty array or object.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// First present value among `fields`, in priority order
pub fn first_present<'a>(item: &'a Value, fields: &[&str]) -> Option<&'a Value> {
    fields
        .iter()
        .filter_map(|field| item.get(*field))
        .find(|value| is_present(value))
}

/// First present field rendered as a string (numbers are stringified)
fn first_string(item: &Value, fields: &[&str]) -> String {
    match first_present(item, fields) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Extract `(price, price_display)` from a raw price value.
///
/// - Numbers are taken as-is and formatted with the currency symbol
/// - Strings are kept (trimmed) as display text; digits and dots are parsed
/// - Anything else yields neither
pub fn extract_price(raw: Option<&Value>) -> (Option<f64>, Option<String>) {
    match raw {
        Some(Value::Number(n)) => match n.as_f64() {
            Some(price) => (Some(price), Some(format_price(price))),
            None => (None, None),
        },
        Some(Value::String(s)) => {
            let text = s.trim().to_string();
            (parse_price_text(&text), Some(text))
        }
        _ => (None, None),
    }
}

/// Parse the numeric part of a price string ("₹1,299.00" → 1299.0)
pub fn parse_price_text(text: &str) -> Option<f64> {
    let digits: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<f64>().ok()
}

/// Format a price with the currency symbol, thousands separators and no decimals.
///
/// # Examples
/// ```
/// use shopmix::services::normalizer::format_price;
///
/// assert_eq!(format_price(1234567.0), "₹1,234,567");
/// assert_eq!(format_price(999.6), "₹1,000");
/// ```
pub fn format_price(price: f64) -> String {
    let rounded = format!("{:.0}", price.abs());
    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (i, c) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if price < 0.0 && rounded != "0" { "-" } else { "" };
    format!("{}{}{}", CURRENCY_SYMBOL, sign, grouped)
}

/// Normalize a link to absolute form.
///
/// - `//host/path` → `https://host/path`
/// - `/path` → resolved against [`DEFAULT_MARKETPLACE_ORIGIN`]
/// - `host/path` → `https://host/path`
/// - absolute `http(s)://` URLs pass through
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    if url.is_empty() {
        return String::new();
    }
    if url.starts_with("//") {
        return format!("https:{}", url);
    }
    if url.starts_with('/') {
        return format!("{}{}", DEFAULT_MARKETPLACE_ORIGIN, url);
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return format!("https://{}", url);
    }
    url.to_string()
}

/// Lowercase host of `url` without a leading `www.`.
///
/// URLs the parser rejects (spaces, bad ports) fall back to the raw authority
/// after `://`, minus any `user@` and `:port`. Empty only when neither yields a host.
pub fn extract_domain(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }
    let host = match Url::parse(url) {
        Ok(parsed) => parsed.host_str().unwrap_or_default().to_string(),
        Err(_) => String::new(),
    };
    let host = if host.is_empty() {
        raw_authority_host(url).to_string()
    } else {
        host
    };
    strip_www(&host.to_lowercase()).to_string()
}

/// Host part of the authority in `scheme://[user@]host[:port]/...`
fn raw_authority_host(url: &str) -> &str {
    let Some((_, rest)) = url.split_once("://") else {
        return "";
    };
    let end = rest.find(|c| matches!(c, '/' | '?' | '#')).unwrap_or(rest.len());
    let authority = &rest[..end];
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, h)| h);

    if host_port.starts_with('[') {
        return match host_port.find(']') {
            Some(close) => &host_port[..=close],
            None => host_port,
        };
    }
    host_port.split_once(':').map_or(host_port, |(h, _)| h)
}

fn strip_www(host: &str) -> &str {
    host.trim_start_matches("www.")
}

/// Domain synthesized from a store label ("Myntra" → "myntra.com")
pub fn domain_from_source(source: &str) -> String {
    let source = source.trim().to_lowercase();
    if source.is_empty() {
        return String::new();
    }
    if source.contains('.') {
        strip_www(&source).to_string()
    } else {
        format!("{}.com", source)
    }
}

/// Fill in `domain` from the URL or, failing that, the source label.
/// An empty source label is then filled with the domain.
pub fn ensure_domain(mut product: Product) -> Product {
    if product.domain.is_empty() {
        product.domain = extract_domain(&product.url);
    }
    if product.domain.is_empty() {
        product.domain = domain_from_source(&product.source);
    }
    if product.source.is_empty() && !product.domain.is_empty() {
        product.source = product.domain.clone();
    }
    product
}
