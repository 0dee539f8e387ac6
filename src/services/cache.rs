//! In-process response cache for provider payloads
//!
//! Entries live for a fixed TTL and are evicted lazily: an expired entry is
//! removed the first time a read finds it stale. There is no size bound.

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Cache TTL in seconds
pub const CACHE_TTL_SECS: i64 = 60;

/// Time source for cache expiry
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Cached payload with the time it was stored
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub stored_at: DateTime<Utc>,
    pub payload: Value,
}

impl CacheEntry {
    fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.stored_at > ttl
    }
}

/// Build a canonical cache key: `tag|name=value|name=value` with names sorted.
///
/// # Examples
/// ```
/// use shopmix::services::cache::make_cache_key;
///
/// let key = make_cache_key("amazon", &[("query", "shoes"), ("country", "IN"), ("page", "1")]);
/// assert_eq!(key, "amazon|country=IN|page=1|query=shoes");
/// ```
pub fn make_cache_key(tag: &str, params: &[(&str, &str)]) -> String {
    let mut sorted: Vec<&(&str, &str)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let fingerprint = sorted
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("|");

    format!("{}|{}", tag, fingerprint)
}

/// Shared TTL cache keyed by request fingerprint
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl ResponseCache {
    /// Create a cache backed by the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a cache with a custom clock (for testing)
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
            ttl: Duration::seconds(CACHE_TTL_SECS),
        }
    }

    /// Return a fresh payload for `key`, evicting it if it has expired
    pub fn get(&self, key: &str) -> Option<Value> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());

        let expired = entries.get(key)?.is_expired(now, self.ttl);
        if expired {
            entries.remove(key);
            tracing::debug!(key, "cache entry expired");
            return None;
        }

        entries.get(key).map(|entry| entry.payload.clone())
    }

    /// Store `payload` under `key`, replacing any previous entry
    pub fn put(&self, key: impl Into<String>, payload: Value) {
        let entry = CacheEntry {
            stored_at: self.clock.now(),
            payload,
        };
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.into(), entry);
    }

    /// Number of entries currently held (expired ones included until read)
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}
