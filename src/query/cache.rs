//! Keyed cache for server data with freshness and retention windows.
//!
//! SYSTEM CONTEXT
//! ==============
//! Menu trees, configuration lookup tables and list pages are all fetched
//! through one [`QueryCache`], so optimistic updates and label enrichment can
//! read what another page already loaded.
//!
//! DESIGN
//! ======
//! Each entry remembers when it was fetched (`updated_at`) and last read
//! (`last_used`). It is *stale* once older than `stale_time` or explicitly
//! invalidated, which makes the next read refetch; it is *expired* once unread
//! for `gc_time`, which makes it eligible for removal. Values are stored as
//! `serde_json::Value` so one cache holds heterogeneous query results.
//!
//! Failed fetches retry `retry` times with exponential backoff. The lock is
//! never held across an await.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "cache_test.rs"]
mod cache_test;

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::net::api::ApiError;

// =============================================================================
// CLOCK
// =============================================================================

/// Millisecond wall clock.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// `Date.now()` in the browser, `SystemTime` elsewhere.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn now_ms(&self) -> u64 {
        #[cfg(feature = "hydrate")]
        {
            js_sys::Date::now() as u64
        }
        #[cfg(not(feature = "hydrate"))]
        {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map_or(0, duration_ms)
        }
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self { now: AtomicU64::new(start_ms) }
    }

    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(duration_ms(by), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

// =============================================================================
// KEYS AND OPTIONS
// =============================================================================

/// Hierarchical cache key, e.g. `["menu", "router"]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

/// Per-query behavior. Defaults: always stale, kept 5 minutes, 3 retries
/// starting at 1 s and doubling up to 30 s, refetch on focus and reconnect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryOptions {
    pub stale_time: Duration,
    pub gc_time: Duration,
    /// Retries after the first failed attempt.
    pub retry: u32,
    pub retry_delay: Duration,
    pub max_retry_delay: Duration,
    pub refetch_on_window_focus: bool,
    pub refetch_on_reconnect: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            stale_time: Duration::ZERO,
            gc_time: Duration::from_secs(5 * 60),
            retry: 3,
            retry_delay: Duration::from_secs(1),
            max_retry_delay: Duration::from_secs(30),
            refetch_on_window_focus: true,
            refetch_on_reconnect: true,
        }
    }
}

/// Explicitly set fields of a [`QueryOptions`]; `None` keeps the base value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryOverrides {
    pub stale_time: Option<Duration>,
    pub gc_time: Option<Duration>,
    pub retry: Option<u32>,
    pub retry_delay: Option<Duration>,
    pub max_retry_delay: Option<Duration>,
    pub refetch_on_window_focus: Option<bool>,
    pub refetch_on_reconnect: Option<bool>,
}

impl QueryOptions {
    /// Shallow merge: every override that is set wins.
    #[must_use]
    pub fn merge(self, overrides: QueryOverrides) -> Self {
        Self {
            stale_time: overrides.stale_time.unwrap_or(self.stale_time),
            gc_time: overrides.gc_time.unwrap_or(self.gc_time),
            retry: overrides.retry.unwrap_or(self.retry),
            retry_delay: overrides.retry_delay.unwrap_or(self.retry_delay),
            max_retry_delay: overrides.max_retry_delay.unwrap_or(self.max_retry_delay),
            refetch_on_window_focus: overrides.refetch_on_window_focus.unwrap_or(self.refetch_on_window_focus),
            refetch_on_reconnect: overrides.refetch_on_reconnect.unwrap_or(self.refetch_on_reconnect),
        }
    }

    /// Backoff before retry number `attempt + 1`.
    pub fn retry_delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.retry_delay.saturating_mul(factor).min(self.max_retry_delay)
    }
}

// =============================================================================
// CACHE
// =============================================================================

#[derive(Clone, Debug)]
struct CacheEntry {
    value: Value,
    updated_at: u64,
    last_used: u64,
    invalidated: bool,
    options: QueryOptions,
}

impl CacheEntry {
    fn is_stale(&self, now: u64) -> bool {
        self.invalidated || now.saturating_sub(self.updated_at) >= duration_ms(self.options.stale_time)
    }

    fn is_expired(&self, now: u64) -> bool {
        now.saturating_sub(self.last_used) > duration_ms(self.options.gc_time)
    }
}

/// Shared query cache. Clones share the same entries.
#[derive(Clone)]
pub struct QueryCache {
    entries: Arc<Mutex<HashMap<QueryKey, CacheEntry>>>,
    clock: Arc<dyn Clock>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache").field("entries", &self.len()).finish_non_exhaustive()
    }
}

impl QueryCache {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { entries: Arc::new(Mutex::new(HashMap::new())), clock }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn now(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.lock().contains_key(key)
    }

    /// Serve fresh cached data, otherwise fetch (with retries) and store it.
    ///
    /// # Errors
    ///
    /// Returns the fetcher's last error once retries are exhausted. Any
    /// previously cached value is kept.
    pub async fn fetch_query<T, F, Fut>(&self, key: &QueryKey, options: &QueryOptions, fetcher: F) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        self.collect_garbage();
        if let Some(data) = self.fresh_data(key) {
            return Ok(data);
        }
        let value = fetch_with_retry(key, options, fetcher).await?;
        self.store(key, options.clone(), &value);
        Ok(value)
    }

    /// Populate the cache unless it already holds fresh data. Errors are logged.
    pub async fn prefetch_query<T, F, Fut>(&self, key: &QueryKey, options: &QueryOptions, fetcher: F)
    where
        T: Serialize + DeserializeOwned,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        if let Err(e) = self.fetch_query(key, options, fetcher).await {
            log::warn!("prefetch of {key} failed: {e}");
        }
    }

    /// Cached value regardless of freshness. Never fetches.
    pub fn get_query_data<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let now = self.now();
        let value = {
            let mut entries = self.lock();
            if entries.get(key)?.is_expired(now) {
                entries.remove(key);
                return None;
            }
            let entry = entries.get_mut(key)?;
            entry.last_used = now;
            entry.value.clone()
        };
        decode(key, value)
    }

    /// Replace the cached value, as if it had just been fetched.
    pub fn set_query_data<T: Serialize>(&self, key: &QueryKey, value: &T) {
        let options = self.lock().get(key).map(|e| e.options.clone()).unwrap_or_default();
        self.store(key, options, value);
    }

    /// Mark `key` stale so the next read refetches. Returns whether it was cached.
    pub fn invalidate(&self, key: &QueryKey) -> bool {
        match self.lock().get_mut(key) {
            Some(entry) => {
                entry.invalidated = true;
                true
            }
            None => false,
        }
    }

    /// Mark every key under `prefix` stale. Returns how many were marked.
    pub fn invalidate_prefix(&self, prefix: &QueryKey) -> usize {
        let mut entries = self.lock();
        let mut count = 0;
        for (key, entry) in entries.iter_mut() {
            if key.starts_with(prefix) {
                entry.invalidated = true;
                count += 1;
            }
        }
        count
    }

    pub fn remove(&self, key: &QueryKey) {
        self.lock().remove(key);
    }

    /// True when absent, invalidated or older than its stale time.
    pub fn is_stale(&self, key: &QueryKey) -> bool {
        let now = self.now();
        self.lock().get(key).map_or(true, |e| e.is_stale(now))
    }

    /// Drop entries unread for longer than their retention window.
    pub fn collect_garbage(&self) -> usize {
        let now = self.now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, e| !e.is_expired(now));
        before - entries.len()
    }

    /// Stale keys whose options ask for a refetch when the window regains focus.
    pub fn keys_to_refetch_on_focus(&self) -> Vec<QueryKey> {
        self.stale_keys_where(|o| o.refetch_on_window_focus)
    }

    /// Stale keys whose options ask for a refetch after the network returns.
    pub fn keys_to_refetch_on_reconnect(&self) -> Vec<QueryKey> {
        self.stale_keys_where(|o| o.refetch_on_reconnect)
    }

    fn stale_keys_where(&self, pred: impl Fn(&QueryOptions) -> bool) -> Vec<QueryKey> {
        let now = self.now();
        let mut keys: Vec<QueryKey> = self
            .lock()
            .iter()
            .filter(|(_, e)| pred(&e.options) && e.is_stale(now))
            .map(|(k, _)| k.clone())
            .collect();
        keys.sort();
        keys
    }

    fn fresh_data<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let now = self.now();
        let value = {
            let mut entries = self.lock();
            let entry = entries.get_mut(key)?;
            if entry.is_stale(now) {
                return None;
            }
            entry.last_used = now;
            entry.value.clone()
        };
        decode(key, value)
    }

    fn store<T: Serialize>(&self, key: &QueryKey, options: QueryOptions, value: &T) {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("not caching {key}: {e}");
                return;
            }
        };
        let now = self.now();
        self.lock().insert(
            key.clone(),
            CacheEntry { value, updated_at: now, last_used: now, invalidated: false, options },
        );
    }
}

fn decode<T: DeserializeOwned>(key: &QueryKey, value: Value) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(data) => Some(data),
        Err(e) => {
            log::warn!("cached {key} has unexpected shape: {e}");
            None
        }
    }
}

async fn fetch_with_retry<T, F, Fut>(key: &QueryKey, options: &QueryOptions, fetcher: F) -> Result<T, ApiError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut attempt = 0u32;
    loop {
        match fetcher().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < options.retry => {
                let delay = options.retry_delay_for(attempt);
                log::debug!("query {key} attempt {} failed: {e}; retrying in {delay:?}", attempt + 1);
                sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                log::warn!("query {key} failed after {} attempt(s): {e}", attempt + 1);
                return Err(e);
            }
        }
    }
}

async fn sleep(delay: Duration) {
    #[cfg(feature = "hydrate")]
    {
        if !delay.is_zero() {
            gloo_timers::future::sleep(delay).await;
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        // Queries only run in the browser; SSR and native tests retry immediately.
        let _ = delay;
    }
}
