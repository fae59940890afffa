//! Serialized documents: YAML, TOML and JSON round trips.
//!
//! Documents use the external (hyphenated) field spelling. Loading decodes a
//! mapping and re-hydrates string leaves through the record's [`TypeMap`],
//! so `count: "7"` becomes the integer the field expects.

mod file;

use std::collections::BTreeMap;

use camino::Utf8Path;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::analyze::{TypeMap, same_spelling};
use crate::coerce::CoercionError;

pub(crate) use file::read_text;

/// Document formats understood by dump and load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Format {
    /// YAML (`yaml` feature).
    #[default]
    Yaml,
    /// TOML (`toml` feature).
    Toml,
    /// JSON.
    Json,
}

impl Format {
    /// Choose a format from a file extension; anything unrecognised is YAML.
    #[must_use]
    pub fn from_path(path: &Utf8Path) -> Self {
        match path.extension().map(str::to_ascii_lowercase).as_deref() {
            Some("toml") => Self::Toml,
            Some("json") => Self::Json,
            _ => Self::Yaml,
        }
    }

    /// Lower-case name of the format, matching its cargo feature.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Toml => "toml",
            Self::Json => "json",
        }
    }
}

/// Encoding or decoding a document failed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FormatError {
    /// The format's cargo feature is disabled.
    #[error("{feature} feature disabled: enable the '{feature}' feature to support this format")]
    Disabled {
        /// Name of the missing feature.
        feature: &'static str,
    },

    /// The document's top level is not a mapping.
    #[error("expected a mapping at the top level, found {found}")]
    NotAMapping {
        /// Kind of value found instead.
        found: &'static str,
    },

    /// A string leaf could not be converted to its field's type.
    #[error("invalid value for '{key}': {source}")]
    Coercion {
        /// Dotted path of the offending key.
        key: String,
        /// Underlying coercion failure.
        #[source]
        source: CoercionError,
    },

    /// YAML syntax or encoding error.
    #[cfg(feature = "yaml")]
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML syntax error.
    #[cfg(feature = "toml")]
    #[error("TOML error: {0}")]
    TomlDecode(#[from] toml::de::Error),

    /// TOML encoding error.
    #[cfg(feature = "toml")]
    #[error("TOML error: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    /// JSON syntax or encoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Encode `map` as a document.
pub(crate) fn encode(map: &Map<String, Value>, format: Format) -> Result<String, FormatError> {
    match format {
        Format::Yaml => {
            #[cfg(feature = "yaml")]
            {
                Ok(serde_yaml::to_string(map)?)
            }
            #[cfg(not(feature = "yaml"))]
            {
                Err(FormatError::Disabled {
                    feature: format.name(),
                })
            }
        }
        Format::Toml => {
            #[cfg(feature = "toml")]
            {
                Ok(toml::to_string(map)?)
            }
            #[cfg(not(feature = "toml"))]
            {
                Err(FormatError::Disabled {
                    feature: format.name(),
                })
            }
        }
        Format::Json => Ok(serde_json::to_string_pretty(map)?),
    }
}

/// Decode a document into a mapping. An empty document is an empty mapping.
pub(crate) fn decode(text: &str, format: Format) -> Result<Map<String, Value>, FormatError> {
    if text.trim().is_empty() {
        return Ok(Map::new());
    }
    let value: Value = match format {
        Format::Yaml => {
            #[cfg(feature = "yaml")]
            {
                serde_yaml::from_str(text)?
            }
            #[cfg(not(feature = "yaml"))]
            {
                return Err(FormatError::Disabled {
                    feature: format.name(),
                });
            }
        }
        Format::Toml => {
            #[cfg(feature = "toml")]
            {
                toml::from_str(text)?
            }
            #[cfg(not(feature = "toml"))]
            {
                return Err(FormatError::Disabled {
                    feature: format.name(),
                });
            }
        }
        Format::Json => serde_json::from_str(text)?,
    };
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(FormatError::NotAMapping {
            found: kind_name(&other),
        }),
    }
}

const fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

/// Convert string leaves of `map` with the coercions in `types`.
///
/// Keys may use either spelling and keep the spelling they arrived with.
/// Keys without an entry in `types` are left alone.
pub(crate) fn rehydrate(
    map: Map<String, Value>,
    types: &BTreeMap<String, TypeMap>,
    prefix: &str,
) -> Result<Map<String, Value>, FormatError> {
    map.into_iter()
        .map(|(key, value)| {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            let converted = match entry_for_path(types, &key) {
                Some(entry) => rehydrate_value(value, entry, &path)?,
                None => value,
            };
            Ok((key, converted))
        })
        .collect()
}

/// Find the coercions for `key`, following dotted segments into nested records.
fn entry_for_path<'a>(types: &'a BTreeMap<String, TypeMap>, key: &str) -> Option<&'a TypeMap> {
    let mut segments = key.split('.');
    let first = entry_for(types, segments.next()?)?;
    segments.try_fold(first, |entry, segment| match entry {
        TypeMap::Record(fields) => entry_for(fields, segment),
        TypeMap::Leaf(_) => None,
    })
}

fn entry_for<'a>(types: &'a BTreeMap<String, TypeMap>, name: &str) -> Option<&'a TypeMap> {
    types.get(name).or_else(|| {
        types
            .iter()
            .find(|(declared, _)| same_spelling(declared, name))
            .map(|(_, entry)| entry)
    })
}

fn rehydrate_value(value: Value, entry: &TypeMap, path: &str) -> Result<Value, FormatError> {
    match (entry, value) {
        (TypeMap::Record(fields), Value::Object(inner)) => {
            rehydrate(inner, fields, path).map(Value::Object)
        }
        (TypeMap::Leaf(Some(coercer)), Value::String(text)) => {
            coercer.coerce(&text).map_err(|source| FormatError::Coercion {
                key: path.to_owned(),
                source,
            })
        }
        (TypeMap::Leaf(Some(coercer)), Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(text) => {
                    coercer.coerce(&text).map_err(|source| FormatError::Coercion {
                        key: path.to_owned(),
                        source,
                    })
                }
                other => Ok(other),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        (_, other) => Ok(other),
    }
}
