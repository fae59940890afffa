//! Evaluation of literal tokens such as `1.5`, `true` or `'text'`.

use serde_json::Value;

/// Evaluate a token as a scalar literal.
///
/// Accepts JSON scalars, single- or double-quoted strings, and the
/// capitalised `True`, `False` and `None` spellings.
pub(crate) fn literal_eval(input: &str) -> Option<Value> {
    let trimmed = input.trim();
    match trimmed {
        "True" => return Some(Value::Bool(true)),
        "False" => return Some(Value::Bool(false)),
        "None" => return Some(Value::Null),
        _ => {}
    }
    if let Some(inner) = trimmed
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
    {
        return Some(Value::String(inner.to_owned()));
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(value @ (Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_))) => {
            Some(value)
        }
        _ => None,
    }
}
