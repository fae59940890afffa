//! Integer and float coercion with digit separators.

use serde_json::{Number, Value};

use super::CoercionError;

/// Remove `_` separators, which are only valid between two digits.
fn strip_separators(input: &str) -> Option<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut cleaned = String::with_capacity(chars.len());
    for (idx, c) in chars.iter().enumerate() {
        if *c != '_' {
            cleaned.push(*c);
            continue;
        }
        let before = idx.checked_sub(1).and_then(|i| chars.get(i));
        let after = chars.get(idx + 1);
        let between_digits = before.is_some_and(char::is_ascii_digit)
            && after.is_some_and(char::is_ascii_digit);
        if !between_digits {
            return None;
        }
    }
    Some(cleaned)
}

/// Parse an integer of the given width and signedness.
pub(crate) fn parse_integer(input: &str, bits: u8, signed: bool) -> Result<Value, CoercionError> {
    let invalid = || CoercionError::new(format!("invalid integer value: '{input}'"));
    let cleaned = strip_separators(input.trim()).ok_or_else(invalid)?;
    let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    let parsed: i128 = digits.parse().map_err(|_| invalid())?;
    let (min, max) = if signed {
        let half = 1_i128 << (bits - 1);
        (-half, half - 1)
    } else {
        (0, (1_i128 << bits) - 1)
    };
    if parsed < min || parsed > max {
        return Err(CoercionError::new(format!(
            "{input} is out of range for {}{bits} ({min}..={max})",
            if signed { "i" } else { "u" }
        )));
    }
    i64::try_from(parsed)
        .map(Value::from)
        .or_else(|_| u64::try_from(parsed).map(Value::from))
        .map_err(|_| invalid())
}

/// Parse a finite float of the given width.
pub(crate) fn parse_float(input: &str, bits: u8) -> Result<Value, CoercionError> {
    let invalid = || CoercionError::new(format!("invalid float value: '{input}'"));
    let cleaned = strip_separators(input.trim()).ok_or_else(invalid)?;
    let parsed: f64 = cleaned.parse().map_err(|_| invalid())?;
    if bits == 32 && parsed.is_finite() && parsed.abs() > f64::from(f32::MAX) {
        return Err(CoercionError::new(format!("{input} is out of range for f32")));
    }
    Number::from_f64(parsed)
        .map(Value::Number)
        .ok_or_else(|| CoercionError::new(format!("{input} is not a finite number")))
}
