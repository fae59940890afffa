//! Conversions between field names and their external spellings.

use serde_json::{Map, Value};

/// External spelling of a field name: underscores become hyphens.
///
/// ```rust
/// assert_eq!(structparse::to_arg_name("child.str_arg"), "child.str-arg");
/// ```
#[must_use]
pub fn to_arg_name(name: &str) -> String {
    name.replace('_', "-")
}

/// Internal spelling of an external name: hyphens become underscores.
///
/// ```rust
/// assert_eq!(structparse::to_var_name("load-defaults"), "load_defaults");
/// ```
#[must_use]
pub fn to_var_name(name: &str) -> String {
    name.replace('-', "_")
}

/// Whether two names differ only in their use of `-` and `_`.
pub(crate) fn same_spelling(left: &str, right: &str) -> bool {
    left.len() == right.len()
        && left
            .chars()
            .zip(right.chars())
            .all(|(l, r)| l == r || matches!((l, r), ('-', '_') | ('_', '-')))
}

/// Rename every key of `map` to its external spelling, recursively.
#[must_use]
pub fn to_external_dict(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| (to_arg_name(key), externalise(value)))
        .collect()
}

fn externalise(value: &Value) -> Value {
    match value {
        Value::Object(inner) => Value::Object(to_external_dict(inner)),
        Value::Array(items) => Value::Array(items.iter().map(externalise).collect()),
        other => other.clone(),
    }
}

/// Join a prefix and a field name into a dotted path.
pub(crate) fn join_path(prefix: &[String], name: &str) -> String {
    if prefix.is_empty() {
        return name.to_owned();
    }
    let mut path = prefix.join(".");
    path.push('.');
    path.push_str(name);
    path
}
