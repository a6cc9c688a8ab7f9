//! Configuration lookup tables (`{value, label}` lists) in the query cache.
//!
//! Tables live under `["config", <key>]`. Once loaded they double as the
//! lookup source for label enrichment.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use super::cache::{QueryCache, QueryKey, QueryOptions, QueryOverrides};
use crate::net::api::{ApiError, ConfigApi};
use crate::net::types::ConfigOption;
use crate::util::enrich::LookupSource;

pub const CONFIG_STALE_TIME: Duration = Duration::from_secs(30 * 60);
pub const CONFIG_GC_TIME: Duration = Duration::from_secs(60 * 60);

pub fn config_query_key(config_key: &str) -> QueryKey {
    QueryKey::new(["config", config_key])
}

pub fn config_query_options() -> QueryOptions {
    QueryOptions::default().merge(QueryOverrides {
        stale_time: Some(CONFIG_STALE_TIME),
        gc_time: Some(CONFIG_GC_TIME),
        refetch_on_window_focus: Some(false),
        ..QueryOverrides::default()
    })
}

/// Fetch (or serve cached) the lookup table named `config_key`.
///
/// # Errors
///
/// Returns the last fetch error once retries are exhausted.
pub async fn load_config_table<A>(cache: &QueryCache, api: &A, config_key: &str) -> Result<Vec<ConfigOption>, ApiError>
where
    A: ConfigApi + ?Sized,
{
    cache
        .fetch_query(&config_query_key(config_key), &config_query_options(), || api.get_options(config_key))
        .await
}

impl LookupSource for QueryCache {
    fn lookup_table(&self, config_key: &str) -> Option<Vec<ConfigOption>> {
        self.get_query_data(&config_query_key(config_key))
    }
}
