//! Provider configuration loaded from the environment

use std::env;

/// Default RapidAPI host for Google search
pub const DEFAULT_GOOGLE_HOST: &str = "google-search74.p.rapidapi.com";

/// Default RapidAPI host for Amazon product search
pub const DEFAULT_AMAZON_HOST: &str = "real-time-amazon-data.p.rapidapi.com";

/// Credentials and location of one RapidAPI service
#[derive(Debug, Clone, PartialEq)]
pub struct RapidApiEndpoint {
    pub key: String,
    pub host: String,
    /// Scheme and authority requests are sent to, `https://{host}` by default
    pub base_url: String,
}

impl RapidApiEndpoint {
    pub fn new(key: impl Into<String>, host: impl Into<String>) -> Self {
        let host = host.into();
        Self {
            key: key.into(),
            base_url: format!("https://{}", host),
            host,
        }
    }

    /// Send requests to `base_url` instead of the host (for testing)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn has_key(&self) -> bool {
        !self.key.trim().is_empty()
    }
}

/// Configuration for both search providers
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    pub google: RapidApiEndpoint,
    pub amazon: RapidApiEndpoint,
}

impl ProviderConfig {
    /// Load from the process environment, reading a `.env` file first if present.
    ///
    /// Keys: `GOOGLE_RAPIDAPI_KEY`, `AMAZON_RAPIDAPI_KEY`.
    /// Hosts: `GOOGLE_RAPIDAPI_HOST`, `AMAZON_RAPIDAPI_HOST`.
    pub fn from_env() -> Self {
        if let Err(e) = dotenv::dotenv() {
            tracing::debug!(error = %e, "no .env file loaded");
        }
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str, default: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let config = Self {
            google: RapidApiEndpoint::new(
                read("GOOGLE_RAPIDAPI_KEY", ""),
                read("GOOGLE_RAPIDAPI_HOST", DEFAULT_GOOGLE_HOST),
            ),
            amazon: RapidApiEndpoint::new(
                read("AMAZON_RAPIDAPI_KEY", ""),
                read("AMAZON_RAPIDAPI_HOST", DEFAULT_AMAZON_HOST),
            ),
        };

        for (name, endpoint) in [("google", &config.google), ("amazon", &config.amazon)] {
            if !endpoint.has_key() {
                tracing::warn!(provider = name, "RapidAPI key not set, requests will likely fail");
            }
        }

        config
    }
}
