//! Option bags and option helpers for select and cascading-select fields.
//!
//! Every select starts from [`SelectConfig::default`] and applies only the
//! fields a form sets in [`SelectOverrides`].

#[cfg(test)]
#[path = "select_test.rs"]
mod select_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::net::types::ConfigOption;
use crate::util::enrich::option_key;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectConfig {
    pub placeholder: String,
    pub clearable: bool,
    pub searchable: bool,
    pub multiple: bool,
    /// Row field holding the option value.
    pub value_field: String,
    /// Row field holding the option label.
    pub label_field: String,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            placeholder: "Please select".to_owned(),
            clearable: true,
            searchable: false,
            multiple: false,
            value_field: "value".to_owned(),
            label_field: "label".to_owned(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectOverrides {
    pub placeholder: Option<String>,
    pub clearable: Option<bool>,
    pub searchable: Option<bool>,
    pub multiple: Option<bool>,
    pub value_field: Option<String>,
    pub label_field: Option<String>,
}

impl SelectConfig {
    /// Shallow merge: every override that is set wins.
    #[must_use]
    pub fn merge(self, overrides: SelectOverrides) -> Self {
        Self {
            placeholder: overrides.placeholder.unwrap_or(self.placeholder),
            clearable: overrides.clearable.unwrap_or(self.clearable),
            searchable: overrides.searchable.unwrap_or(self.searchable),
            multiple: overrides.multiple.unwrap_or(self.multiple),
            value_field: overrides.value_field.unwrap_or(self.value_field),
            label_field: overrides.label_field.unwrap_or(self.label_field),
        }
    }
}

/// Map raw rows to options using the configured fields. Rows without a
/// value are skipped; a missing label falls back to the value's text.
pub fn options_from_rows(rows: &[Value], config: &SelectConfig) -> Vec<ConfigOption> {
    rows.iter()
        .filter_map(|row| {
            let value = row.get(&config.value_field).filter(|v| !v.is_null())?.clone();
            let label = row
                .get(&config.label_field)
                .and_then(Value::as_str)
                .map(str::to_owned)
                .or_else(|| option_key(&value))?;
            Some(ConfigOption { value, label })
        })
        .collect()
}

/// Label of the option whose value matches `value` (compared as text).
pub fn label_for<'a>(options: &'a [ConfigOption], value: &str) -> Option<&'a str> {
    options
        .iter()
        .find(|opt| option_key(&opt.value).as_deref() == Some(value))
        .map(|opt| opt.label.as_str())
}

/// Case-insensitive label filter for searchable selects.
pub fn filter_options<'a>(options: &'a [ConfigOption], query: &str) -> Vec<&'a ConfigOption> {
    let needle = query.trim().to_lowercase();
    options
        .iter()
        .filter(|opt| needle.is_empty() || opt.label.to_lowercase().contains(&needle))
        .collect()
}

/// One level of a cascading select.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascaderNode {
    pub value: String,
    pub label: String,
    #[serde(default)]
    pub children: Vec<CascaderNode>,
}

/// Path of nodes from a root down to the node whose value is `value`.
pub fn find_path<'a>(nodes: &'a [CascaderNode], value: &str) -> Option<Vec<&'a CascaderNode>> {
    for node in nodes {
        if node.value == value {
            return Some(vec![node]);
        }
        if let Some(mut rest) = find_path(&node.children, value) {
            rest.insert(0, node);
            return Some(rest);
        }
    }
    None
}

/// Labels along the path to `value`, joined by `separator`.
pub fn path_labels(nodes: &[CascaderNode], value: &str, separator: &str) -> Option<String> {
    let path = find_path(nodes, value)?;
    Some(path.iter().map(|n| n.label.as_str()).collect::<Vec<_>>().join(separator))
}

/// Options for the next level after the selected `path` of values.
/// An empty path yields the roots; an unknown value yields nothing.
pub fn children_of<'a>(nodes: &'a [CascaderNode], path: &[String]) -> &'a [CascaderNode] {
    let mut level = nodes;
    for value in path {
        match level.iter().find(|n| &n.value == value) {
            Some(node) => level = &node.children,
            None => return &[],
        }
    }
    level
}
