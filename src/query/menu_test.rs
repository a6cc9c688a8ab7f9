use std::sync::Arc;

use futures::executor::block_on;

use super::*;
use crate::query::cache::ManualClock;
use crate::test_support::{ScriptedMenuApi, menu_leaf};

const MINUTE: Duration = Duration::from_secs(60);

fn tree(label: &str) -> Vec<MenuNode> {
    vec![menu_leaf("1", label, "/")]
}

fn setup(api: ScriptedMenuApi) -> (MenuQuery<ScriptedMenuApi>, QueryCache, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(0));
    let cache = QueryCache::with_clock(clock.clone());
    (MenuQuery::new(cache.clone(), api).with_retry_delay(Duration::ZERO), cache, clock)
}

#[test]
fn options_are_fixed() {
    let opts = menu_query_options();
    assert_eq!(opts.stale_time, MINUTE * 10);
    assert_eq!(opts.gc_time, MINUTE * 30);
    assert_eq!(opts.retry, 2);
    assert!(!opts.refetch_on_window_focus);
    assert!(opts.refetch_on_reconnect);
    assert_eq!(menu_query_key(), QueryKey::new(["menu", "router"]));
}

#[test]
fn read_fetches_once_within_freshness_window() {
    let (menu, _, clock) = setup(ScriptedMenuApi::always(Ok(tree("Home"))));
    assert_eq!(block_on(menu.read()).unwrap(), tree("Home"));
    clock.advance(MINUTE * 5);
    assert_eq!(block_on(menu.read()).unwrap(), tree("Home"));
    assert_eq!(menu.api.calls.get(), 1);
}

#[test]
fn read_retries_twice_then_fails() {
    let (menu, _, _) = setup(ScriptedMenuApi::always(Err(ApiError::Network("down".to_owned()))));
    let result = block_on(menu.read());
    assert_eq!(result, Err(ApiError::Network("down".to_owned())));
    assert_eq!(menu.api.calls.get(), 3);
}

#[test]
fn read_recovers_within_retry_budget() {
    let api = ScriptedMenuApi::new(
        vec![Err(ApiError::Status { status: 502 }), Err(ApiError::Status { status: 502 })],
        Ok(tree("Home")),
    );
    let (menu, _, _) = setup(api);
    assert_eq!(block_on(menu.read()).unwrap(), tree("Home"));
    assert_eq!(menu.api.calls.get(), 3);
}

#[test]
fn invalidate_and_refetch_bypasses_freshness() {
    let api = ScriptedMenuApi::new(vec![Ok(tree("Old"))], Ok(tree("New")));
    let (menu, _, _) = setup(api);
    assert_eq!(block_on(menu.read()).unwrap(), tree("Old"));
    assert_eq!(block_on(menu.invalidate_and_refetch()).unwrap(), tree("New"));
    assert_eq!(menu.read_cached_only(), Some(tree("New")));
}

#[test]
fn prefetch_populates_cache_for_cached_reads() {
    let (menu, _, _) = setup(ScriptedMenuApi::always(Ok(tree("Home"))));
    assert_eq!(menu.read_cached_only(), None);
    block_on(menu.prefetch());
    assert_eq!(menu.read_cached_only(), Some(tree("Home")));
    assert_eq!(menu.api.calls.get(), 1);
}

#[test]
fn read_cached_only_never_calls_network() {
    let (menu, _, _) = setup(ScriptedMenuApi::always(Ok(tree("Home"))));
    assert_eq!(menu.read_cached_only(), None);
    assert_eq!(menu.api.calls.get(), 0);
}

#[test]
fn cached_tree_is_evicted_after_retention_window() {
    let (menu, cache, clock) = setup(ScriptedMenuApi::always(Ok(tree("Home"))));
    block_on(menu.prefetch());
    clock.advance(MINUTE * 31);
    assert_eq!(cache.collect_garbage(), 1);
    assert_eq!(menu.read_cached_only(), None);
}

#[test]
fn reconnect_refetches_only_when_stale() {
    let api = ScriptedMenuApi::new(vec![Ok(tree("Old"))], Ok(tree("New")));
    let (menu, _, clock) = setup(api);
    block_on(menu.read()).unwrap();

    assert_eq!(block_on(menu.on_reconnect()), None);
    clock.advance(MINUTE * 11);
    assert_eq!(block_on(menu.on_window_focus()), None);
    assert_eq!(block_on(menu.on_reconnect()), Some(Ok(tree("New"))));
    assert_eq!(menu.api.calls.get(), 2);
}

#[test]
fn flatten_menu_walks_depth_first() {
    let mut root = menu_leaf("1", "System", "/system");
    root.children = vec![menu_leaf("1-1", "Indicators", "/indicators"), menu_leaf("1-2", "Users", "/users")];
    let nodes = vec![root, menu_leaf("2", "Home", "/")];

    let flat: Vec<(usize, &str)> = flatten_menu(&nodes).into_iter().map(|(d, n)| (d, n.name.as_str())).collect();
    assert_eq!(flat, vec![(0, "System"), (1, "Indicators"), (1, "Users"), (0, "Home")]);
}
