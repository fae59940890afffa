//! Parsed values keyed by field path.

use std::collections::BTreeSet;

use clap::ArgMatches;
use clap::parser::ValueSource;
use serde_json::{Map, Value};

use super::command::negated_id;
use crate::analyze::RecordAnalyzer;
use crate::argument::ArgKind;
use crate::error::{StructParseError, StructParseResult};

/// Result of looking up a field path in a [`Namespace`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// The user supplied a value.
    Supplied(&'a Value),
    /// The path names a field the user did not supply.
    Unset,
    /// The path does not name a field.
    Unknown,
}

/// Values the user supplied on the command line.
///
/// Every field path of the record is known; paths the user did not supply
/// report [`Lookup::Unset`] so record defaults stay in force.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Namespace {
    known: BTreeSet<String>,
    values: Map<String, Value>,
}

impl Namespace {
    /// An empty namespace that knows `paths`.
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known: paths.into_iter().map(Into::into).collect(),
            values: Map::new(),
        }
    }

    /// Record a supplied value. Returns `false` when `path` is unknown.
    pub fn supply(&mut self, path: &str, value: Value) -> bool {
        if !self.known.contains(path) {
            return false;
        }
        self.values.insert(path.to_owned(), value);
        true
    }

    /// Look up a field path.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Lookup<'_> {
        match self.values.get(path) {
            Some(value) => Lookup::Supplied(value),
            None if self.known.contains(path) => Lookup::Unset,
            None => Lookup::Unknown,
        }
    }

    /// Supplied values keyed by dotted path.
    #[must_use]
    pub const fn supplied(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Collect the values the user supplied in `matches`.
    pub(crate) fn from_matches(
        analyzer: &RecordAnalyzer,
        matches: &ArgMatches,
    ) -> StructParseResult<Self> {
        let mut namespace = Self::new(analyzer.flattened_field_paths().iter().cloned());
        for spec in analyzer.arguments() {
            let supplied = match spec.kind {
                ArgKind::Value => {
                    if from_command_line(matches, &spec.id) {
                        let values: Vec<Value> = matches
                            .try_get_many::<Value>(&spec.id)
                            .map_err(|source| StructParseError::Matches {
                                id: spec.id.clone(),
                                source,
                            })?
                            .map(|found| found.cloned().collect())
                            .unwrap_or_default();
                        Some(if spec.arity.collects() {
                            Value::Array(values)
                        } else {
                            values.into_iter().next().unwrap_or(Value::Null)
                        })
                    } else {
                        None
                    }
                }
                ArgKind::BooleanSwitch if from_command_line(matches, &negated_id(&spec.id)) => {
                    Some(Value::Bool(false))
                }
                ArgKind::BooleanSwitch | ArgKind::PresenceFlag => {
                    from_command_line(matches, &spec.id).then_some(Value::Bool(true))
                }
            };
            if let Some(value) = supplied {
                namespace.supply(&spec.id, value);
            }
        }
        Ok(namespace)
    }
}

fn from_command_line(matches: &ArgMatches, id: &str) -> bool {
    matches.value_source(id) == Some(ValueSource::CommandLine)
}
