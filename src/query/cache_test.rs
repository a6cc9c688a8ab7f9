use std::cell::Cell;

use futures::executor::block_on;

use super::*;

const MINUTE: Duration = Duration::from_secs(60);

fn cache_with_clock() -> (QueryCache, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(1_000_000));
    (QueryCache::with_clock(clock.clone()), clock)
}

fn options(stale_min: u64, gc_min: u64, retry: u32) -> QueryOptions {
    QueryOptions::default().merge(QueryOverrides {
        stale_time: Some(MINUTE * u32::try_from(stale_min).unwrap()),
        gc_time: Some(MINUTE * u32::try_from(gc_min).unwrap()),
        retry: Some(retry),
        retry_delay: Some(Duration::ZERO),
        ..QueryOverrides::default()
    })
}

fn key() -> QueryKey {
    QueryKey::new(["items", "list"])
}

// =============================================================
// options
// =============================================================

#[test]
fn merge_keeps_unset_defaults() {
    let merged = QueryOptions::default().merge(QueryOverrides { retry: Some(2), ..QueryOverrides::default() });
    assert_eq!(merged.retry, 2);
    assert_eq!(merged.stale_time, Duration::ZERO);
    assert_eq!(merged.gc_time, Duration::from_secs(300));
    assert!(merged.refetch_on_window_focus);
}

#[test]
fn retry_delay_doubles_and_caps() {
    let opts = QueryOptions::default();
    assert_eq!(opts.retry_delay_for(0), Duration::from_secs(1));
    assert_eq!(opts.retry_delay_for(1), Duration::from_secs(2));
    assert_eq!(opts.retry_delay_for(4), Duration::from_secs(16));
    assert_eq!(opts.retry_delay_for(5), Duration::from_secs(30));
    assert_eq!(opts.retry_delay_for(40), Duration::from_secs(30));
}

#[test]
fn query_key_display_and_prefix() {
    let k = QueryKey::new(["config", "users"]);
    assert_eq!(k.to_string(), "config/users");
    assert!(k.starts_with(&QueryKey::new(["config"])));
    assert!(!k.starts_with(&QueryKey::new(["menu"])));
}

// =============================================================
// fetch_query
// =============================================================

#[test]
fn fresh_data_is_served_without_refetch() {
    let (cache, clock) = cache_with_clock();
    let calls = Cell::new(0);
    let fetch = || {
        calls.set(calls.get() + 1);
        async { Ok::<_, ApiError>(vec![1, 2, 3]) }
    };
    let opts = options(10, 30, 0);

    assert_eq!(block_on(cache.fetch_query(&key(), &opts, fetch)).unwrap(), vec![1, 2, 3]);
    clock.advance(MINUTE * 9);
    assert_eq!(block_on(cache.fetch_query(&key(), &opts, fetch)).unwrap(), vec![1, 2, 3]);
    assert_eq!(calls.get(), 1);
}

#[test]
fn stale_data_is_refetched() {
    let (cache, clock) = cache_with_clock();
    let calls = Cell::new(0);
    let fetch = || {
        calls.set(calls.get() + 1);
        let n = calls.get();
        async move { Ok::<_, ApiError>(n) }
    };
    let opts = options(10, 30, 0);

    assert_eq!(block_on(cache.fetch_query(&key(), &opts, fetch)).unwrap(), 1);
    clock.advance(MINUTE * 10);
    assert!(cache.is_stale(&key()));
    assert_eq!(block_on(cache.fetch_query(&key(), &opts, fetch)).unwrap(), 2);
}

#[test]
fn retries_up_to_budget_then_succeeds() {
    let (cache, _) = cache_with_clock();
    let calls = Cell::new(0);
    let fetch = || {
        calls.set(calls.get() + 1);
        let n = calls.get();
        async move {
            if n < 3 { Err(ApiError::Network("flaky".to_owned())) } else { Ok(n) }
        }
    };

    let result = block_on(cache.fetch_query(&key(), &options(10, 30, 2), fetch));
    assert_eq!(result, Ok(3));
    assert_eq!(calls.get(), 3);
}

#[test]
fn exhausted_retries_return_last_error_and_keep_old_value() {
    let (cache, _) = cache_with_clock();
    cache.set_query_data(&key(), &"old");
    cache.invalidate(&key());

    let calls = Cell::new(0);
    let fetch = || {
        calls.set(calls.get() + 1);
        async { Err::<String, _>(ApiError::Status { status: 503 }) }
    };

    let result = block_on(cache.fetch_query(&key(), &options(10, 30, 2), fetch));
    assert_eq!(result, Err(ApiError::Status { status: 503 }));
    assert_eq!(calls.get(), 3);
    assert_eq!(cache.get_query_data::<String>(&key()).as_deref(), Some("old"));
}

#[test]
fn prefetch_swallows_errors() {
    let (cache, _) = cache_with_clock();
    block_on(cache.prefetch_query(&key(), &options(1, 1, 0), || async {
        Err::<u32, _>(ApiError::Network("down".to_owned()))
    }));
    assert!(cache.is_empty());

    block_on(cache.prefetch_query(&key(), &options(1, 1, 0), || async { Ok::<_, ApiError>(5u32) }));
    assert_eq!(cache.get_query_data::<u32>(&key()), Some(5));
}

// =============================================================
// direct access
// =============================================================

#[test]
fn get_query_data_never_fetches_and_ignores_staleness() {
    let (cache, clock) = cache_with_clock();
    assert_eq!(cache.get_query_data::<u32>(&key()), None);

    cache.set_query_data(&key(), &7u32);
    clock.advance(MINUTE * 4);
    assert!(cache.is_stale(&key()));
    assert_eq!(cache.get_query_data::<u32>(&key()), Some(7));
}

#[test]
fn get_query_data_with_wrong_type_is_none() {
    let (cache, _) = cache_with_clock();
    cache.set_query_data(&key(), &"text");
    assert_eq!(cache.get_query_data::<u32>(&key()), None);
}

#[test]
fn invalidate_marks_stale_until_next_store() {
    let (cache, _) = cache_with_clock();
    assert!(!cache.invalidate(&key()));

    block_on(cache.fetch_query(&key(), &options(10, 30, 0), || async { Ok::<_, ApiError>(1u8) })).unwrap();
    assert!(!cache.is_stale(&key()));
    assert!(cache.invalidate(&key()));
    assert!(cache.is_stale(&key()));

    block_on(cache.fetch_query(&key(), &options(10, 30, 0), || async { Ok::<_, ApiError>(2u8) })).unwrap();
    assert!(!cache.is_stale(&key()));
}

#[test]
fn invalidate_prefix_hits_matching_keys_only() {
    let (cache, _) = cache_with_clock();
    cache.set_query_data(&QueryKey::new(["config", "users"]), &1);
    cache.set_query_data(&QueryKey::new(["config", "units"]), &2);
    cache.set_query_data(&QueryKey::new(["menu", "router"]), &3);
    assert_eq!(cache.invalidate_prefix(&QueryKey::new(["config"])), 2);
}

// =============================================================
// garbage collection
// =============================================================

#[test]
fn unread_entries_expire_after_gc_time() {
    let (cache, clock) = cache_with_clock();
    block_on(cache.fetch_query(&key(), &options(10, 30, 0), || async { Ok::<_, ApiError>(1u8) })).unwrap();

    clock.advance(MINUTE * 30);
    assert_eq!(cache.collect_garbage(), 0);
    clock.advance(Duration::from_millis(1));
    assert_eq!(cache.collect_garbage(), 1);
    assert!(!cache.contains(&key()));
}

#[test]
fn reads_extend_retention() {
    let (cache, clock) = cache_with_clock();
    block_on(cache.fetch_query(&key(), &options(10, 30, 0), || async { Ok::<_, ApiError>(1u8) })).unwrap();

    clock.advance(MINUTE * 20);
    assert_eq!(cache.get_query_data::<u8>(&key()), Some(1));
    clock.advance(MINUTE * 20);
    assert_eq!(cache.collect_garbage(), 0);
    assert_eq!(cache.get_query_data::<u8>(&key()), Some(1));
}

#[test]
fn expired_entry_reads_as_absent() {
    let (cache, clock) = cache_with_clock();
    cache.set_query_data(&key(), &1u8);
    clock.advance(MINUTE * 6);
    assert_eq!(cache.get_query_data::<u8>(&key()), None);
    assert!(cache.is_empty());
}

// =============================================================
// refetch triggers
// =============================================================

#[test]
fn refetch_trigger_lists_respect_options_and_staleness() {
    let (cache, clock) = cache_with_clock();
    let no_focus = QueryOptions { refetch_on_window_focus: false, ..options(10, 30, 0) };
    let a = QueryKey::new(["a"]);
    let b = QueryKey::new(["b"]);
    block_on(cache.fetch_query(&a, &no_focus, || async { Ok::<_, ApiError>(1u8) })).unwrap();
    block_on(cache.fetch_query(&b, &options(10, 30, 0), || async { Ok::<_, ApiError>(1u8) })).unwrap();

    assert!(cache.keys_to_refetch_on_reconnect().is_empty());

    clock.advance(MINUTE * 11);
    assert_eq!(cache.keys_to_refetch_on_focus(), vec![b.clone()]);
    assert_eq!(cache.keys_to_refetch_on_reconnect(), vec![a, b]);
}
