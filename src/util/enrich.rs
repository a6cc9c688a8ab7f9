//! Backfill human-readable labels into records from cached lookup tables.
//!
//! SYSTEM CONTEXT
//! ==============
//! Optimistic updates insert a row into a cached list before the server has
//! answered, so display columns such as `ownerName` are not filled in yet.
//! [`enrich`] looks each id field up in an already-cached `{value, label}`
//! table and writes the label next to it.
//!
//! A missing or empty table, or a null/absent id, leaves the record as is.

#[cfg(test)]
#[path = "enrich_test.rs"]
mod enrich_test;

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::net::types::ConfigOption;

/// Where the label for an id field goes, and which table to look it up in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldMapping {
    pub name_field: String,
    pub config_key: String,
}

impl FieldMapping {
    pub fn new(name_field: impl Into<String>, config_key: impl Into<String>) -> Self {
        Self { name_field: name_field.into(), config_key: config_key.into() }
    }
}

/// `id field -> mapping`.
pub type FieldMappings = BTreeMap<String, FieldMapping>;

/// Source of previously cached lookup tables.
pub trait LookupSource {
    fn lookup_table(&self, config_key: &str) -> Option<Vec<ConfigOption>>;
}

impl LookupSource for HashMap<String, Vec<ConfigOption>> {
    fn lookup_table(&self, config_key: &str) -> Option<Vec<ConfigOption>> {
        self.get(config_key).cloned()
    }
}

impl LookupSource for BTreeMap<String, Vec<ConfigOption>> {
    fn lookup_table(&self, config_key: &str) -> Option<Vec<ConfigOption>> {
        self.get(config_key).cloned()
    }
}

/// Return a copy of `record` with every resolvable mapping's label filled in.
/// `record` itself is never modified.
pub fn enrich(record: &Map<String, Value>, mappings: &FieldMappings, lookup: &impl LookupSource) -> Map<String, Value> {
    let mut out = record.clone();
    for (id_field, mapping) in mappings {
        let Some(id) = record.get(id_field).and_then(option_key) else {
            continue;
        };
        let Some(table) = lookup.lookup_table(&mapping.config_key).filter(|t| !t.is_empty()) else {
            continue;
        };
        let index = label_index(&table);
        if let Some(label) = index.get(id.as_str()) {
            out.insert(mapping.name_field.clone(), Value::String((*label).to_owned()));
        }
    }
    out
}

/// [`enrich`] for arbitrary JSON; non-object values are returned unchanged.
pub fn enrich_value(record: &Value, mappings: &FieldMappings, lookup: &impl LookupSource) -> Value {
    match record {
        Value::Object(map) => Value::Object(enrich(map, mappings, lookup)),
        other => other.clone(),
    }
}

/// [`enrich`] for typed records via their serde representation.
/// Falls back to an unchanged clone if the record does not round-trip.
pub fn enrich_as<T>(record: &T, mappings: &FieldMappings, lookup: &impl LookupSource) -> T
where
    T: Serialize + DeserializeOwned + Clone,
{
    let enriched = serde_json::to_value(record)
        .map(|value| enrich_value(&value, mappings, lookup))
        .and_then(serde_json::from_value);
    match enriched {
        Ok(value) => value,
        Err(e) => {
            log::warn!("enrichment skipped: {e}");
            record.clone()
        }
    }
}

/// `value -> label`, with values coerced to their string form.
fn label_index(table: &[ConfigOption]) -> HashMap<String, &str> {
    table
        .iter()
        .filter_map(|opt| option_key(&opt.value).map(|key| (key, opt.label.as_str())))
        .collect()
}

/// Whole-valued floats print without a fraction, so `3.0` and `3` share a key.
#[allow(clippy::float_cmp)]
fn number_key(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 => format!("{f:.0}"),
        _ => n.to_string(),
    }
}

/// String form of an id or option value; `None` for null.
pub(crate) fn option_key(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_key(n)),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}
