//! Declared field types understood by the argument resolver.
//!
//! A [`DeclaredType`] is the runtime description of a field's Rust type. It
//! is produced by [`ArgType::declared_type`] (usually through the derive
//! macros) and consumed by the resolver to decide how many tokens a field
//! takes and how each token becomes a value.

mod impls;

use std::fmt;

use serde_json::Value;

use crate::coerce::{Coercer, CoercionError};
use crate::schema::RecordSchema;

pub use impls::ArgType;

/// Scalar types with a built-in coercion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Text passed through unchanged.
    Str,
    /// Integer of the given width and signedness.
    Integer {
        /// Width in bits.
        bits: u8,
        /// Whether negative values are accepted.
        signed: bool,
    },
    /// Floating-point number of the given width.
    Float {
        /// Width in bits.
        bits: u8,
    },
    /// Filesystem path.
    Path,
}

/// Collection family of a [`SequenceType`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SequenceKind {
    /// Ordered, variable length.
    List,
    /// Unordered, variable length.
    Set,
    /// Ordered, fixed length unless variadic.
    Tuple,
}

/// A sequence of element types.
#[derive(Clone, Debug, PartialEq)]
pub struct SequenceType {
    /// Collection family.
    pub kind: SequenceKind,
    /// Element types; empty for a bare sequence.
    pub elements: Vec<DeclaredType>,
    /// `true` for lists, sets and `Tuple[T, ...]`.
    pub variadic: bool,
}

/// One member of an [`EnumType`].
#[derive(Clone, Debug, PartialEq)]
pub struct EnumMember {
    /// Member name as serialised by `serde`.
    pub name: String,
    /// Raw member value.
    pub value: Value,
}

impl EnumMember {
    /// Create a member from its name and raw value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An enumeration with named members carrying raw values.
#[derive(Clone, Debug, PartialEq)]
pub struct EnumType {
    /// Display name of the enumeration.
    pub name: String,
    /// Members in declaration order.
    pub members: Vec<EnumMember>,
}

impl EnumType {
    /// Create an enumeration from its members.
    #[must_use]
    pub fn new(name: impl Into<String>, members: impl IntoIterator<Item = EnumMember>) -> Self {
        Self {
            name: name.into(),
            members: members.into_iter().collect(),
        }
    }

    /// Find the member whose name or raw value equals `value`.
    #[must_use]
    pub fn member_for(&self, value: &Value) -> Option<&EnumMember> {
        self.members
            .iter()
            .find(|m| value.as_str() == Some(m.name.as_str()))
            .or_else(|| self.members.iter().find(|m| &m.value == value))
    }
}

/// A type converted from text by a caller-supplied function.
#[derive(Clone, Debug)]
pub struct CustomType {
    coercer: Coercer,
}

impl CustomType {
    /// Wrap `parse` under the display name `name`.
    pub fn new<F>(name: impl Into<String>, parse: F) -> Self
    where
        F: Fn(&str) -> Result<Value, CoercionError> + Send + Sync + 'static,
    {
        Self {
            coercer: Coercer::new(name, parse),
        }
    }

    /// Display name of the type.
    #[must_use]
    pub fn name(&self) -> &str {
        self.coercer.name()
    }

    /// The conversion function.
    #[must_use]
    pub const fn coercer(&self) -> &Coercer {
        &self.coercer
    }
}

impl PartialEq for CustomType {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

/// Lazy reference to a nested record's schema.
#[derive(Clone, Copy)]
pub struct RecordRef {
    name: &'static str,
    schema: fn() -> RecordSchema,
}

impl RecordRef {
    /// Reference the schema of `T`.
    #[must_use]
    pub fn of<T: crate::Record>() -> Self {
        Self {
            name: std::any::type_name::<T>(),
            schema: T::schema,
        }
    }

    /// Reference a hand-written schema function.
    #[must_use]
    pub const fn new(name: &'static str, schema: fn() -> RecordSchema) -> Self {
        Self { name, schema }
    }

    /// Fully qualified type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Produce the referenced schema.
    #[must_use]
    pub fn schema(&self) -> RecordSchema {
        (self.schema)()
    }
}

impl PartialEq for RecordRef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordRef").field(&self.name).finish()
    }
}

/// Runtime description of a field's declared type.
#[derive(Clone, Debug, PartialEq)]
pub enum DeclaredType {
    /// Any value; tokens are kept as strings.
    Any,
    /// The unit/none type; only meaningful inside unions.
    Null,
    /// A scalar with a built-in coercion.
    Primitive(Primitive),
    /// A scalar converted by a caller-supplied function.
    Custom(CustomType),
    /// `T` or nothing.
    Optional(Box<DeclaredType>),
    /// One of several types, tried in order.
    Union(Vec<DeclaredType>),
    /// A list, set or tuple.
    Sequence(SequenceType),
    /// An enumeration.
    Enum(EnumType),
    /// A fixed set of allowed values.
    Literal(Vec<Value>),
    /// `true` or `false`.
    Boolean,
    /// A nested record exposed as its own option group.
    Record(RecordRef),
}

impl DeclaredType {
    /// Plain text.
    #[must_use]
    pub const fn str() -> Self {
        Self::Primitive(Primitive::Str)
    }

    /// A signed 64-bit integer.
    #[must_use]
    pub const fn int() -> Self {
        Self::Primitive(Primitive::Integer {
            bits: 64,
            signed: true,
        })
    }

    /// A 64-bit float.
    #[must_use]
    pub const fn float() -> Self {
        Self::Primitive(Primitive::Float { bits: 64 })
    }

    /// A filesystem path.
    #[must_use]
    pub const fn path() -> Self {
        Self::Primitive(Primitive::Path)
    }

    /// `Optional[inner]`.
    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// `Union[branches...]`.
    #[must_use]
    pub fn union(branches: impl IntoIterator<Item = Self>) -> Self {
        Self::Union(branches.into_iter().collect())
    }

    /// `List[element]`.
    #[must_use]
    pub fn list(element: Self) -> Self {
        Self::Sequence(SequenceType {
            kind: SequenceKind::List,
            elements: vec![element],
            variadic: true,
        })
    }

    /// `Set[element]`.
    #[must_use]
    pub fn set(element: Self) -> Self {
        Self::Sequence(SequenceType {
            kind: SequenceKind::Set,
            elements: vec![element],
            variadic: true,
        })
    }

    /// A fixed-length tuple.
    #[must_use]
    pub fn tuple(elements: impl IntoIterator<Item = Self>) -> Self {
        Self::Sequence(SequenceType {
            kind: SequenceKind::Tuple,
            elements: elements.into_iter().collect(),
            variadic: false,
        })
    }

    /// `Tuple[element, ...]`.
    #[must_use]
    pub fn variadic_tuple(element: Self) -> Self {
        Self::Sequence(SequenceType {
            kind: SequenceKind::Tuple,
            elements: vec![element],
            variadic: true,
        })
    }

    /// A list without an element type.
    #[must_use]
    pub const fn bare_list() -> Self {
        Self::Sequence(SequenceType {
            kind: SequenceKind::List,
            elements: Vec::new(),
            variadic: true,
        })
    }

    /// `Literal[values...]`.
    #[must_use]
    pub fn literal<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        Self::Literal(values.into_iter().map(Into::into).collect())
    }

    /// The declared type of a nested record.
    #[must_use]
    pub fn record<T: crate::Record>() -> Self {
        Self::Record(RecordRef::of::<T>())
    }

    /// A type converted by `parse`.
    pub fn custom<F>(name: impl Into<String>, parse: F) -> Self
    where
        F: Fn(&str) -> Result<Value, CoercionError> + Send + Sync + 'static,
    {
        Self::Custom(CustomType::new(name, parse))
    }

    /// Whether this is plain text.
    #[must_use]
    pub const fn is_str(&self) -> bool {
        matches!(self, Self::Primitive(Primitive::Str))
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str => f.write_str("str"),
            Self::Integer { bits, signed: true } => write!(f, "i{bits}"),
            Self::Integer {
                bits,
                signed: false,
            } => write!(f, "u{bits}"),
            Self::Float { bits } => write!(f, "f{bits}"),
            Self::Path => f.write_str("path"),
        }
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("Any"),
            Self::Null => f.write_str("None"),
            Self::Primitive(p) => write!(f, "{p}"),
            Self::Custom(c) => f.write_str(c.name()),
            Self::Optional(inner) => write!(f, "Optional[{inner}]"),
            Self::Union(branches) => {
                f.write_str("Union[")?;
                write_list(f, branches)?;
                f.write_str("]")
            }
            Self::Sequence(seq) => {
                let label = match seq.kind {
                    SequenceKind::List => "List",
                    SequenceKind::Set => "Set",
                    SequenceKind::Tuple => "Tuple",
                };
                if seq.elements.is_empty() {
                    return f.write_str(label);
                }
                write!(f, "{label}[")?;
                write_list(f, &seq.elements)?;
                if seq.variadic && seq.kind == SequenceKind::Tuple {
                    f.write_str(", ...")?;
                }
                f.write_str("]")
            }
            Self::Enum(e) => f.write_str(&e.name),
            Self::Literal(values) => {
                let rendered: Vec<String> = values.iter().map(Value::to_string).collect();
                write!(f, "Literal[{}]", rendered.join(", "))
            }
            Self::Boolean => f.write_str("bool"),
            Self::Record(r) => f.write_str(short_type_name(r.name())),
        }
    }
}

/// Strip module paths from a fully qualified type name.
pub(crate) fn short_type_name(name: &str) -> &str {
    let base = name.split('<').next().unwrap_or(name);
    base.rsplit("::").next().unwrap_or(base)
}

/// Render a value the way it appears on the command line.
///
/// Strings are written without quotes and sequences are space separated.
#[must_use]
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(render_value)
            .collect::<Vec<_>>()
            .join(" "),
        Value::Null => "None".to_owned(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests;
