//! Conversion of single command-line tokens into values.
//!
//! Every resolved argument carries a [`Coercer`]: a named function from one
//! token to a [`serde_json::Value`]. The built-in coercers here cover the
//! primitive types, booleans, enumerations, literal choice sets and unions.

mod literal;
mod numeric;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::types::{DeclaredType, EnumType, Primitive, render_value};

pub(crate) use literal::literal_eval;
pub(crate) use numeric::{parse_float, parse_integer};

/// A token could not be converted into the expected type.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct CoercionError {
    message: String,
}

impl CoercionError {
    /// Create an error with a human-readable message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

type CoerceFn = dyn Fn(&str) -> Result<Value, CoercionError> + Send + Sync;

/// A named conversion from one token to a value.
#[derive(Clone)]
pub struct Coercer {
    name: Arc<str>,
    func: Arc<CoerceFn>,
}

impl Coercer {
    /// Wrap `func` under the display name `name`.
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&str) -> Result<Value, CoercionError> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name.into()),
            func: Arc::new(func),
        }
    }

    /// Display name of the target type.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Convert one token.
    ///
    /// # Errors
    ///
    /// Returns [`CoercionError`] when the token is not a valid value of the
    /// target type.
    pub fn coerce(&self, input: &str) -> Result<Value, CoercionError> {
        (self.func)(input)
    }
}

impl fmt::Debug for Coercer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Coercer").field(&self.name).finish()
    }
}

const TRUE_WORDS: [&str; 4] = ["t", "true", "y", "yes"];
const FALSE_WORDS: [&str; 4] = ["f", "false", "n", "no"];

/// Interpret a boolean word, case-insensitively.
pub(crate) fn parse_bool(input: &str) -> Option<bool> {
    let lowered = input.trim().to_lowercase();
    if TRUE_WORDS.contains(&lowered.as_str()) {
        Some(true)
    } else if FALSE_WORDS.contains(&lowered.as_str()) {
        Some(false)
    } else {
        None
    }
}

pub(crate) fn boolean() -> Coercer {
    Coercer::new("bool", |input| {
        parse_bool(input).map(Value::Bool).ok_or_else(|| {
            CoercionError::new(format!(
                "{input} is not a valid boolean; use one of {} or {}",
                TRUE_WORDS.join("/"),
                FALSE_WORDS.join("/")
            ))
        })
    })
}

pub(crate) fn primitive(kind: Primitive) -> Coercer {
    let name = kind.to_string();
    match kind {
        Primitive::Str => Coercer::new(name, |input| Ok(Value::String(input.to_owned()))),
        Primitive::Integer { bits, signed } => {
            Coercer::new(name, move |input| parse_integer(input, bits, signed))
        }
        Primitive::Float { bits } => Coercer::new(name, move |input| parse_float(input, bits)),
        Primitive::Path => Coercer::new(name, |input| {
            if input.is_empty() {
                Err(CoercionError::new("path must not be empty"))
            } else {
                Ok(Value::String(input.to_owned()))
            }
        }),
    }
}

/// Coerce to an enumeration member, returning the member name.
pub(crate) fn enumeration(ty: &EnumType) -> Coercer {
    let target = ty.clone();
    Coercer::new(ty.name.clone(), move |input| {
        let members = &target.members;
        let by_number = input
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(|n| members.iter().find(|m| m.value.as_i64() == Some(n)));
        let found = by_number
            .or_else(|| members.iter().find(|m| m.name == input))
            .or_else(|| members.iter().find(|m| render_value(&m.value) == input))
            .or_else(|| {
                let evaluated = literal_eval(input)?;
                members.iter().find(|m| m.value == evaluated)
            });
        found
            .map(|m| Value::String(m.name.clone()))
            .ok_or_else(|| CoercionError::new(format!("{input} is not a valid {}", target.name)))
    })
}

/// Coerce by matching against a set of literal values.
///
/// With `strict` unset, unmatched input passes through as a string so that a
/// later membership check can report it.
pub(crate) fn literal(values: &[Value], strict: bool) -> Coercer {
    let choices = values.to_vec();
    let name = format!(
        "Literal[{}]",
        choices
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );
    let label = name.clone();
    Coercer::new(name, move |input| {
        if let Some(found) = choices.iter().find(|v| literal_matches(v, input)) {
            return Ok(found.clone());
        }
        if strict {
            Err(CoercionError::new(format!("{input} is not one of {label}")))
        } else {
            Ok(Value::String(input.to_owned()))
        }
    })
}

fn literal_matches(choice: &Value, input: &str) -> bool {
    if render_value(choice) == input {
        return true;
    }
    match choice {
        Value::String(s) => s == input,
        Value::Bool(b) => parse_bool(input) == Some(*b),
        Value::Number(n) if n.is_f64() => parse_float(input, 64).is_ok_and(|v| &v == choice),
        Value::Number(_) => parse_integer(input, 64, true)
            .or_else(|_| parse_integer(input, 64, false))
            .is_ok_and(|v| &v == choice),
        Value::Null => matches!(input, "None" | "null"),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Coerce by trying each typed branch in order.
///
/// Text branches are the fallback once every typed branch has failed.
pub(crate) fn union(branches: &[DeclaredType]) -> Result<Coercer, DeclaredType> {
    let fallback = branches.iter().any(DeclaredType::is_str);
    let parsers = branches
        .iter()
        .filter(|b| !b.is_str() && !matches!(b, DeclaredType::Null | DeclaredType::Any))
        .map(for_branch)
        .collect::<Result<Vec<_>, _>>()?;
    let name = format!("{}", DeclaredType::Union(branches.to_vec()));
    let label = name.clone();
    Ok(Coercer::new(name, move |input| {
        let mut failures = Vec::with_capacity(parsers.len());
        for parser in &parsers {
            match parser.coerce(input) {
                Ok(value) => return Ok(value),
                Err(err) => failures.push(format!("{}: {err}", parser.name())),
            }
        }
        if fallback {
            return Ok(Value::String(input.to_owned()));
        }
        Err(CoercionError::new(format!(
            "{input} cannot be interpreted as {label} ({})",
            failures.join("; ")
        )))
    }))
}

/// The single-token coercion for a union branch.
fn for_branch(ty: &DeclaredType) -> Result<Coercer, DeclaredType> {
    match ty {
        DeclaredType::Primitive(p) => Ok(primitive(*p)),
        DeclaredType::Custom(c) => Ok(c.coercer().clone()),
        DeclaredType::Boolean => Ok(boolean()),
        DeclaredType::Enum(e) => Ok(enumeration(e)),
        DeclaredType::Literal(values) => Ok(literal(values, true)),
        DeclaredType::Optional(inner) => for_branch(inner),
        DeclaredType::Union(inner) => union(inner),
        DeclaredType::Any
        | DeclaredType::Null
        | DeclaredType::Sequence(_)
        | DeclaredType::Record(_) => Err(ty.clone()),
    }
}

#[cfg(test)]
mod tests;
