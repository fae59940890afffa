//! Overlaying value layers.

use serde_json::{Map, Value};

/// Overlay `layer` onto `target`, updating `target` in place.
///
/// Behaviour:
/// - When merging an object into a non-object target, the target becomes
///   `{}` first.
/// - Objects merge recursively: keys are added or overwritten and nested
///   objects are overlaid.
/// - Arrays and scalars replace `target` wholesale.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use structparse::merge_value;
///
/// let mut defaults = json!({"count": 5, "child": {"name": "a", "size": 1}});
/// merge_value(&mut defaults, json!({"child": {"size": 2}, "tags": ["x"]}));
/// assert_eq!(
///     defaults,
///     json!({"count": 5, "child": {"name": "a", "size": 2}, "tags": ["x"]})
/// );
///
/// // Arrays replace existing values.
/// merge_value(&mut defaults, json!({"tags": ["y", "z"]}));
/// assert_eq!(defaults["tags"], json!(["y", "z"]));
/// ```
pub fn merge_value(target: &mut Value, layer: Value) {
    match layer {
        Value::Object(map) => merge_object(target, map),
        _ => *target = layer,
    }
}

fn merge_object(target: &mut Value, map: Map<String, Value>) {
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }

    let Some(target_map) = target.as_object_mut() else {
        return;
    };

    for (key, value) in map {
        match target_map.get_mut(&key) {
            Some(existing) => merge_value(existing, value),
            None => {
                target_map.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::merge_value;

    #[rstest]
    #[case::scalar_replaces(json!({"a": 1}), json!({"a": 2}), json!({"a": 2}))]
    #[case::array_replaces(json!({"a": [1, 2]}), json!({"a": [3]}), json!({"a": [3]}))]
    #[case::nested_merges(
        json!({"c": {"x": 1, "y": 2}}),
        json!({"c": {"y": 3}}),
        json!({"c": {"x": 1, "y": 3}})
    )]
    #[case::object_over_scalar(json!({"c": 1}), json!({"c": {"x": 1}}), json!({"c": {"x": 1}}))]
    #[case::null_replaces(json!({"a": 1}), json!({"a": null}), json!({"a": null}))]
    fn overlays_layers(#[case] base: Value, #[case] layer: Value, #[case] expected: Value) {
        let mut target = base;
        merge_value(&mut target, layer);
        assert_eq!(target, expected);
    }
}
