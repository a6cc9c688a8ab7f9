//! Navigation menu tree, cached under a fixed key.
//!
//! The menu changes rarely: it stays fresh for 10 minutes and is kept for 30
//! minutes after its last read. A failed fetch retries twice; window focus
//! never triggers a refetch, a reconnect does when the entry is stale.

#[cfg(test)]
#[path = "menu_test.rs"]
mod menu_test;

use std::time::Duration;

use super::cache::{QueryCache, QueryKey, QueryOptions, QueryOverrides};
use crate::net::api::{ApiError, MenuApi};
use crate::net::types::MenuNode;

pub const MENU_STALE_TIME: Duration = Duration::from_secs(10 * 60);
pub const MENU_GC_TIME: Duration = Duration::from_secs(30 * 60);
pub const MENU_RETRY: u32 = 2;

pub fn menu_query_key() -> QueryKey {
    QueryKey::new(["menu", "router"])
}

pub fn menu_query_options() -> QueryOptions {
    QueryOptions::default().merge(QueryOverrides {
        stale_time: Some(MENU_STALE_TIME),
        gc_time: Some(MENU_GC_TIME),
        retry: Some(MENU_RETRY),
        refetch_on_window_focus: Some(false),
        refetch_on_reconnect: Some(true),
        ..QueryOverrides::default()
    })
}

/// Menu reads over a shared [`QueryCache`].
#[derive(Clone, Debug)]
pub struct MenuQuery<A> {
    cache: QueryCache,
    api: A,
    key: QueryKey,
    options: QueryOptions,
}

impl<A: MenuApi> MenuQuery<A> {
    pub fn new(cache: QueryCache, api: A) -> Self {
        Self { cache, api, key: menu_query_key(), options: menu_query_options() }
    }

    /// Override the retry backoff; everything else stays fixed.
    #[must_use]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.options.retry_delay = delay;
        self
    }

    /// Cached tree if fresh, otherwise fetch it.
    ///
    /// # Errors
    ///
    /// Returns the last fetch error once retries are exhausted.
    pub async fn read(&self) -> Result<Vec<MenuNode>, ApiError> {
        self.cache.fetch_query(&self.key, &self.options, || self.api.get_tree()).await
    }

    /// Mark the tree stale and fetch it again.
    ///
    /// # Errors
    ///
    /// Returns the last fetch error once retries are exhausted.
    pub async fn invalidate_and_refetch(&self) -> Result<Vec<MenuNode>, ApiError> {
        self.cache.invalidate(&self.key);
        self.read().await
    }

    /// Warm the cache without handing the result to anyone.
    pub async fn prefetch(&self) {
        self.cache.prefetch_query(&self.key, &self.options, || self.api.get_tree()).await;
    }

    /// Last known tree, or `None`. Never touches the network.
    pub fn read_cached_only(&self) -> Option<Vec<MenuNode>> {
        self.cache.get_query_data(&self.key)
    }

    /// Refetch after the network comes back, if the tree is stale.
    pub async fn on_reconnect(&self) -> Option<Result<Vec<MenuNode>, ApiError>> {
        if !self.cache.keys_to_refetch_on_reconnect().contains(&self.key) {
            return None;
        }
        Some(self.read().await)
    }

    /// Refetch when the window regains focus. The menu opts out, so this only
    /// ever returns `None` with the default options.
    pub async fn on_window_focus(&self) -> Option<Result<Vec<MenuNode>, ApiError>> {
        if !self.cache.keys_to_refetch_on_focus().contains(&self.key) {
            return None;
        }
        Some(self.read().await)
    }
}

/// Flatten the tree depth-first into `(depth, node)` pairs for rendering.
pub fn flatten_menu(nodes: &[MenuNode]) -> Vec<(usize, &MenuNode)> {
    fn walk<'a>(nodes: &'a [MenuNode], depth: usize, out: &mut Vec<(usize, &'a MenuNode)>) {
        for node in nodes {
            out.push((depth, node));
            walk(&node.children, depth + 1, out);
        }
    }
    let mut out = Vec::new();
    walk(nodes, 0, &mut out);
    out
}
