use futures::executor::block_on;
use serde_json::json;

use super::*;
use crate::test_support::{FakeConfigApi, option};
use crate::util::enrich::{FieldMapping, FieldMappings, enrich};

fn users_api() -> FakeConfigApi {
    FakeConfigApi {
        tables: vec![("users".to_owned(), vec![option(json!("u1"), "Alice"), option(json!(2), "Bob")])],
        ..FakeConfigApi::default()
    }
}

#[test]
fn load_config_table_caches_under_config_key() {
    let cache = QueryCache::new();
    let api = users_api();

    let table = block_on(load_config_table(&cache, &api, "users")).unwrap();
    assert_eq!(table.len(), 2);
    block_on(load_config_table(&cache, &api, "users")).unwrap();

    assert_eq!(api.calls.borrow().clone(), vec!["users".to_owned()]);
    assert!(cache.contains(&config_query_key("users")));
}

#[test]
fn query_cache_serves_as_lookup_source() {
    let cache = QueryCache::new();
    assert_eq!(cache.lookup_table("users"), None);

    block_on(load_config_table(&cache, &users_api(), "users")).unwrap();
    let mut mappings = FieldMappings::new();
    mappings.insert("ownerId".to_owned(), FieldMapping::new("ownerName", "users"));

    let record = json!({ "ownerId": 2 });
    let out = enrich(record.as_object().unwrap(), &mappings, &cache);
    assert_eq!(out.get("ownerName"), Some(&json!("Bob")));
}

#[test]
fn unknown_table_fails_after_retries() {
    let cache = QueryCache::new();
    let api = FakeConfigApi::default();
    let result = block_on(load_config_table(&cache, &api, "missing"));
    assert_eq!(result, Err(ApiError::Status { status: 404 }));
    assert_eq!(api.calls.borrow().len(), 4);
}
