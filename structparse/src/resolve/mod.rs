//! Type-driven resolution of argument settings.
//!
//! A field's declared type is classified by a fixed list of rules. Each rule
//! rewrites the in-progress [`Draft`] once and may hand a new candidate type
//! back for another round; [`Draft::resolve`] repeats until the candidate is
//! settled.

use serde_json::Value;
use tracing::trace;

use crate::argument::{ArgKind, Arity};
use crate::coerce::{self, Coercer};
use crate::error::ConfigError;
use crate::types::{DeclaredType, EnumType, Primitive, SequenceType, render_value};

/// Upper bound on resolution rounds for one field.
pub(crate) const RESOLUTION_LIMIT: usize = 1024;

/// What the next round will look at.
#[derive(Clone, Debug)]
pub(crate) enum Candidate {
    /// A type that still needs classifying.
    Type(DeclaredType),
    /// A settled conversion function.
    Coerce(Coercer),
    /// Tokens are kept as raw strings.
    Raw,
}

/// Argument settings while resolution is in progress.
#[derive(Clone, Debug)]
pub(crate) struct Draft {
    pub field: String,
    pub candidate: Candidate,
    pub arity: Option<Arity>,
    pub choices: Option<Vec<Value>>,
    pub default: Option<Value>,
    pub display_name: Option<String>,
    pub kind: ArgKind,
    pub negatable: bool,
}

enum Step {
    Settled,
    Reinspect,
}

impl Draft {
    pub(crate) fn new(field: impl Into<String>, ty: DeclaredType) -> Self {
        Self {
            field: field.into(),
            candidate: Candidate::Type(ty),
            arity: None,
            choices: None,
            default: None,
            display_name: None,
            kind: ArgKind::Value,
            negatable: true,
        }
    }

    /// Apply rules until the candidate settles.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for types without a command-line form and when
    /// [`RESOLUTION_LIMIT`] rounds pass without settling.
    pub(crate) fn resolve(mut self) -> Result<Self, ConfigError> {
        for round in 0..RESOLUTION_LIMIT {
            let Candidate::Type(ty) = self.candidate.clone() else {
                return Ok(self);
            };
            trace!(field = %self.field, round, ty = %ty, "resolving argument type");
            match self.step(ty)? {
                Step::Settled => return Ok(self),
                Step::Reinspect => {}
            }
        }
        Err(ConfigError::ResolutionLimit {
            field: self.field,
            limit: RESOLUTION_LIMIT,
        })
    }

    fn step(&mut self, ty: DeclaredType) -> Result<Step, ConfigError> {
        match ty {
            DeclaredType::Any | DeclaredType::Null => {
                self.candidate = Candidate::Raw;
                Ok(Step::Settled)
            }
            DeclaredType::Optional(inner) => Ok(self.union(&[*inner, DeclaredType::Null])),
            DeclaredType::Union(branches) => Ok(self.union(&branches)),
            DeclaredType::Sequence(seq) => self.sequence(seq),
            DeclaredType::Enum(e) => {
                self.enumeration(&e);
                Ok(Step::Settled)
            }
            DeclaredType::Literal(values) => self.literal(values),
            DeclaredType::Boolean => {
                self.boolean();
                Ok(Step::Settled)
            }
            DeclaredType::Primitive(p) => {
                self.candidate = Candidate::Coerce(coerce::primitive(p));
                Ok(Step::Settled)
            }
            DeclaredType::Custom(c) => {
                self.candidate = Candidate::Coerce(c.coercer().clone());
                Ok(Step::Settled)
            }
            DeclaredType::Record(_) => Err(self.unsupported(&ty)),
        }
    }

    fn union(&mut self, branches: &[DeclaredType]) -> Step {
        let mut live = Vec::new();
        flatten_union(branches, &mut live);
        match live.as_slice() {
            [] => {
                self.candidate = Candidate::Raw;
                Step::Settled
            }
            [only] => {
                self.candidate = Candidate::Type(only.clone());
                Step::Reinspect
            }
            _ => {
                self.candidate = match coerce::union(&live) {
                    Ok(coercer) => Candidate::Coerce(coercer),
                    // Branches without a single-token form leave the text as is.
                    Err(_) => Candidate::Raw,
                };
                Step::Settled
            }
        }
    }

    fn sequence(&mut self, seq: SequenceType) -> Result<Step, ConfigError> {
        let arity = if seq.variadic {
            Arity::OneOrMore
        } else {
            Arity::Fixed(seq.elements.len())
        };
        self.arity.get_or_insert(arity);

        let mut distinct: Vec<DeclaredType> = Vec::new();
        for element in seq.elements {
            if !single_token(&element) {
                return Err(ConfigError::UnresolvableElement {
                    field: self.field.clone(),
                    ty: element.to_string(),
                });
            }
            if !distinct.contains(&element) {
                distinct.push(element);
            }
        }
        if distinct.is_empty() {
            self.candidate = Candidate::Raw;
            return Ok(Step::Settled);
        }
        let next = if distinct.len() == 1 {
            distinct.pop()
        } else {
            Some(DeclaredType::Union(distinct))
        };
        self.candidate = next.map_or(Candidate::Raw, Candidate::Type);
        Ok(Step::Reinspect)
    }

    fn enumeration(&mut self, ty: &EnumType) {
        self.choices = Some(
            ty.members
                .iter()
                .map(|m| Value::String(m.name.clone()))
                .collect(),
        );
        if self.display_name.is_none() {
            let members: Vec<String> = ty
                .members
                .iter()
                .map(|m| format!("{}/{}", m.name, render_value(&m.value)))
                .collect();
            self.display_name = Some(format!("{{{}}}", members.join(",")));
        }
        if let Some(default) = self.default.take() {
            self.default = Some(normalise_enum_default(ty, default));
        }
        self.candidate = Candidate::Coerce(coerce::enumeration(ty));
    }

    fn literal(&mut self, values: Vec<Value>) -> Result<Step, ConfigError> {
        if values.is_empty() {
            return Err(self.unsupported(&DeclaredType::Literal(values)));
        }
        if self.display_name.is_none() {
            let rendered: Vec<String> = values.iter().map(render_value).collect();
            self.display_name = Some(format!("{{{}}}", rendered.join(",")));
        }
        self.choices = Some(values.clone());
        if let Some(shared) = shared_primitive(&values) {
            self.candidate = Candidate::Type(shared);
            return Ok(Step::Reinspect);
        }
        self.candidate = Candidate::Coerce(coerce::literal(&values, false));
        Ok(Step::Settled)
    }

    fn boolean(&mut self) {
        if self.negatable {
            self.kind = ArgKind::BooleanSwitch;
            self.candidate = Candidate::Coerce(coerce::boolean());
        } else {
            self.kind = ArgKind::PresenceFlag;
            self.candidate = Candidate::Raw;
        }
    }

    fn unsupported(&self, ty: &DeclaredType) -> ConfigError {
        ConfigError::UnsupportedType {
            field: self.field.clone(),
            ty: ty.to_string(),
        }
    }

    /// The settled conversion, if any.
    pub(crate) fn coercion(&self) -> Option<Coercer> {
        match &self.candidate {
            Candidate::Coerce(c) => Some(c.clone()),
            Candidate::Type(_) | Candidate::Raw => None,
        }
    }
}

fn flatten_union(branches: &[DeclaredType], out: &mut Vec<DeclaredType>) {
    for branch in branches {
        match branch {
            DeclaredType::Null | DeclaredType::Any => {}
            DeclaredType::Optional(inner) => flatten_union(std::slice::from_ref(inner), out),
            DeclaredType::Union(inner) => flatten_union(inner, out),
            other => {
                if !out.contains(other) {
                    out.push(other.clone());
                }
            }
        }
    }
}

fn single_token(ty: &DeclaredType) -> bool {
    match ty {
        DeclaredType::Sequence(_) | DeclaredType::Record(_) => false,
        DeclaredType::Optional(inner) => single_token(inner),
        DeclaredType::Union(branches) => branches.iter().all(single_token),
        _ => true,
    }
}

/// The primitive type every literal value shares, if there is one.
fn shared_primitive(values: &[Value]) -> Option<DeclaredType> {
    let kinds: Vec<Option<DeclaredType>> = values
        .iter()
        .map(|v| match v {
            Value::String(_) => Some(DeclaredType::str()),
            Value::Number(n) if n.is_f64() => Some(DeclaredType::float()),
            Value::Number(n) if n.is_u64() && !n.is_i64() => {
                Some(DeclaredType::Primitive(Primitive::Integer {
                    bits: 64,
                    signed: false,
                }))
            }
            Value::Number(_) => Some(DeclaredType::int()),
            Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
        })
        .collect();
    let first = kinds.first().cloned().flatten()?;
    kinds
        .iter()
        .all(|k| k.as_ref() == Some(&first))
        .then_some(first)
}

fn normalise_enum_default(ty: &EnumType, default: Value) -> Value {
    match default {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| normalise_enum_default(ty, item))
                .collect(),
        ),
        other => ty
            .member_for(&other)
            .map(|m| Value::String(m.name.clone()))
            .unwrap_or(other),
    }
}
