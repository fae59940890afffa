//! Declarative description of a record and its fields.
//!
//! `#[derive(Record)]` generates a [`RecordSchema`]; hand-written schemas use
//! the same builder methods.

use serde::Serialize;
use serde_json::Value;

use crate::argument::Arity;
use crate::types::{DeclaredType, short_type_name};

/// Per-field settings that refine what the field's type implies.
///
/// The same structure carries the caller's blanket settings, which apply to
/// every field that does not set the value itself. Only `help`, `metavar`,
/// `required` and `default` are taken from blanket settings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldOverrides {
    pub(crate) flag: Option<String>,
    pub(crate) positional: bool,
    pub(crate) excluded: bool,
    pub(crate) ty: Option<DeclaredType>,
    pub(crate) help: Option<String>,
    pub(crate) default: Option<Value>,
    pub(crate) arity: Option<Arity>,
    pub(crate) choices: Option<Vec<Value>>,
    pub(crate) metavar: Option<String>,
    pub(crate) required: Option<bool>,
}

impl FieldOverrides {
    /// Overrides that change nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a short flag (`-x`) or long alias (`--name`).
    #[must_use]
    pub fn flag(mut self, flag: impl Into<String>) -> Self {
        self.flag = Some(flag.into());
        self
    }

    /// Force the field to be positional.
    #[must_use]
    pub const fn positional(mut self) -> Self {
        self.positional = true;
        self
    }

    /// Keep the field out of the command line.
    #[must_use]
    pub const fn skip(mut self) -> Self {
        self.excluded = true;
        self
    }

    /// Replace the declared type.
    #[must_use]
    pub fn ty(mut self, ty: DeclaredType) -> Self {
        self.ty = Some(ty);
        self
    }

    /// Set the help text.
    #[must_use]
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Set a default that wins over the declared one.
    #[must_use]
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Set the number of tokens consumed.
    #[must_use]
    pub const fn arity(mut self, arity: Arity) -> Self {
        self.arity = Some(arity);
        self
    }

    /// Restrict the accepted values.
    #[must_use]
    pub fn choices<V: Into<Value>>(mut self, choices: impl IntoIterator<Item = V>) -> Self {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    /// Set the placeholder shown in help.
    #[must_use]
    pub fn metavar(mut self, metavar: impl Into<String>) -> Self {
        self.metavar = Some(metavar.into());
        self
    }

    /// Force the argument to be required or optional.
    #[must_use]
    pub const fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }
}

/// One field of a [`RecordSchema`].
#[derive(Clone, Debug)]
pub struct FieldSchema {
    name: String,
    ty: DeclaredType,
    default: Option<Result<Value, String>>,
    doc: Option<String>,
    overrides: FieldOverrides,
}

impl FieldSchema {
    /// Describe field `name` of type `ty`.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: DeclaredType) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
            doc: None,
            overrides: FieldOverrides::default(),
        }
    }

    /// Declare the field's default value.
    ///
    /// Values that cannot be serialised are reported when the record is
    /// analysed.
    #[must_use]
    pub fn default<V: Serialize>(mut self, value: V) -> Self {
        self.default = Some(serde_json::to_value(value).map_err(|e| e.to_string()));
        self
    }

    /// Attach documentation used as help text.
    #[must_use]
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        let text = doc.into();
        self.doc = (!text.trim().is_empty()).then_some(text);
        self
    }

    /// Attach per-field overrides.
    #[must_use]
    pub fn overrides(mut self, overrides: FieldOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Field name as written in the struct.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type.
    #[must_use]
    pub const fn ty(&self) -> &DeclaredType {
        &self.ty
    }

    /// Declared default, if any.
    #[must_use]
    pub const fn declared_default(&self) -> Option<&Result<Value, String>> {
        self.default.as_ref()
    }

    /// Documentation text.
    #[must_use]
    pub fn doc_text(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Per-field overrides.
    #[must_use]
    pub const fn field_overrides(&self) -> &FieldOverrides {
        &self.overrides
    }
}

/// The fields and documentation of a record type.
#[derive(Clone, Debug)]
pub struct RecordSchema {
    name: String,
    command_name: Option<String>,
    description: Option<String>,
    fields: Vec<FieldSchema>,
}

impl RecordSchema {
    /// Start a schema for the record called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command_name: None,
            description: None,
            fields: Vec::new(),
        }
    }

    /// Set the program name used in usage lines.
    #[must_use]
    pub fn command_name(mut self, name: impl Into<String>) -> Self {
        self.command_name = Some(name.into());
        self
    }

    /// Set the record description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        let text = description.into();
        self.description = (!text.trim().is_empty()).then_some(text);
        self
    }

    /// Append a field.
    #[must_use]
    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    /// Record name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record name without module path.
    #[must_use]
    pub fn short_name(&self) -> &str {
        short_type_name(&self.name)
    }

    /// Program name, if set.
    #[must_use]
    pub fn program_name(&self) -> Option<&str> {
        self.command_name.as_deref()
    }

    /// Record description, if any.
    #[must_use]
    pub fn about(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }
}
