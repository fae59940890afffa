//! Analysis of record schemas into argument descriptions.
//!
//! A [`RecordAnalyzer`] is built once per record (and once per nested
//! record). It owns the resolved field descriptors, the default snapshot, the
//! flattened field paths and the type map used to re-hydrate serialized
//! documents, and it projects raw mappings back onto record values.

mod field;
mod naming;
mod transform;

use std::collections::{BTreeMap, HashSet};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use tracing::debug;

use crate::argument::ArgumentSpec;
use crate::coerce::Coercer;
use crate::error::{ConfigError, StructParseError, StructParseResult};
use crate::schema::{FieldOverrides, RecordSchema};
use crate::types::DeclaredType;

pub(crate) use naming::{join_path, same_spelling};
pub use naming::{to_arg_name, to_external_dict, to_var_name};

/// Per-field coercions used to re-hydrate serialized documents.
#[derive(Clone, Debug)]
pub enum TypeMap {
    /// A leaf field and its coercion, if it has one.
    Leaf(Option<Coercer>),
    /// A nested record keyed by field name.
    Record(BTreeMap<String, TypeMap>),
}

/// How a field appears on the command line.
#[derive(Clone, Debug)]
pub enum FieldKind {
    /// A single argument.
    Argument(ArgumentSpec),
    /// A nested record exposed as its own option group.
    Nested(Box<RecordAnalyzer>),
    /// Kept out of the command line.
    Excluded,
}

/// The resolution result for one field.
#[derive(Clone, Debug)]
pub struct FieldDescriptor {
    name: String,
    path: String,
    default: Option<Value>,
    kind: FieldKind,
    types: TypeMap,
}

impl FieldDescriptor {
    /// Field name as declared.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dotted path from the root record.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Effective default value.
    #[must_use]
    pub const fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Command-line presentation.
    #[must_use]
    pub const fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Coercions used when loading serialized documents.
    #[must_use]
    pub const fn types(&self) -> &TypeMap {
        &self.types
    }
}

/// Settings shared by every field of an analysis.
#[derive(Clone, Debug)]
struct Scope<'a> {
    blanket: &'a FieldOverrides,
    negatable: bool,
    prefix: Vec<String>,
    ancestry: Vec<String>,
}

impl Scope<'_> {
    fn path_of(&self, name: &str) -> String {
        join_path(&self.prefix, name)
    }

    fn descend(&self, field: &str, record: &str) -> Self {
        let mut prefix = self.prefix.clone();
        prefix.push(field.to_owned());
        let mut ancestry = self.ancestry.clone();
        ancestry.push(record.to_owned());
        Self {
            blanket: self.blanket,
            negatable: self.negatable,
            prefix,
            ancestry,
        }
    }
}

/// Resolved view of a record schema.
#[derive(Clone, Debug)]
pub struct RecordAnalyzer {
    name: String,
    program_name: String,
    description: Option<String>,
    fields: Vec<FieldDescriptor>,
    defaults: Map<String, Value>,
    flat_paths: Vec<String>,
    types: BTreeMap<String, TypeMap>,
}

impl RecordAnalyzer {
    /// Analyse `schema`.
    ///
    /// `blanket` supplies help, metavar, requiredness and default settings
    /// for fields that do not set them; `negatable_booleans` chooses between
    /// `--flag/--no-flag` switches and presence-only flags.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a field cannot be expressed as an
    /// argument.
    pub fn new(
        schema: &RecordSchema,
        blanket: &FieldOverrides,
        negatable_booleans: bool,
    ) -> Result<Self, ConfigError> {
        let scope = Scope {
            blanket,
            negatable: negatable_booleans,
            prefix: Vec::new(),
            ancestry: vec![schema.name().to_owned()],
        };
        let analyzer = Self::build(schema, &scope, None)?;
        field::check_positionals(&analyzer.arguments())?;
        debug!(
            record = %analyzer.name,
            fields = analyzer.flat_paths.len(),
            "analysed record"
        );
        Ok(analyzer)
    }

    /// Analyse the record behind a declared type.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotARecord`] when `ty` is not a record, or any
    /// error [`RecordAnalyzer::new`] reports.
    pub fn for_type(
        ty: &DeclaredType,
        blanket: &FieldOverrides,
        negatable_booleans: bool,
    ) -> Result<Self, ConfigError> {
        match ty {
            DeclaredType::Record(record) => {
                Self::new(&record.schema(), blanket, negatable_booleans)
            }
            other => Err(ConfigError::NotARecord {
                ty: other.to_string(),
            }),
        }
    }

    fn build(
        schema: &RecordSchema,
        scope: &Scope<'_>,
        inherited: Option<&Map<String, Value>>,
    ) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(schema.fields().len());
        for field in schema.fields() {
            if field.name().contains('.') {
                return Err(ConfigError::DottedFieldName {
                    record: schema.short_name().to_owned(),
                    field: field.name().to_owned(),
                });
            }
            if !seen.insert(to_var_name(field.name())) {
                return Err(ConfigError::DuplicateField {
                    record: schema.short_name().to_owned(),
                    field: field.name().to_owned(),
                });
            }
            let inherited_default = inherited.and_then(|map| map.get(field.name()));
            fields.push(field::describe(field, scope, inherited_default)?);
        }

        let defaults = fields
            .iter()
            .filter_map(|f| f.default.clone().map(|d| (f.name.clone(), d)))
            .collect();
        let flat_paths = fields
            .iter()
            .flat_map(|f| match &f.kind {
                FieldKind::Nested(child) => child.flat_paths.clone(),
                FieldKind::Argument(_) | FieldKind::Excluded => vec![f.path.clone()],
            })
            .collect();
        let types = fields
            .iter()
            .map(|f| (f.name.clone(), f.types.clone()))
            .collect();
        let program_name = schema.program_name().map_or_else(
            || to_arg_name(&schema.short_name().to_lowercase()),
            ToOwned::to_owned,
        );

        Ok(Self {
            name: schema.short_name().to_owned(),
            program_name,
            description: schema.about().map(ToOwned::to_owned),
            fields,
            defaults,
            flat_paths,
            types,
        })
    }

    /// Record name without module path.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Program name used in usage lines.
    #[must_use]
    pub fn program_name(&self) -> &str {
        &self.program_name
    }

    /// Record documentation.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Field descriptors in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up a field by name.
    ///
    /// `name` may use either spelling, so `dry-run` and `dry_run` both find a
    /// field declared under either key.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .or_else(|| self.fields.iter().find(|f| same_spelling(&f.name, name)))
    }

    /// Every argument, nested ones included, in declaration order.
    #[must_use]
    pub fn arguments(&self) -> Vec<&ArgumentSpec> {
        let mut out = Vec::new();
        self.collect_arguments(&mut out);
        out
    }

    fn collect_arguments<'a>(&'a self, out: &mut Vec<&'a ArgumentSpec>) {
        for field in &self.fields {
            match &field.kind {
                FieldKind::Argument(spec) => out.push(spec),
                FieldKind::Nested(child) => child.collect_arguments(out),
                FieldKind::Excluded => {}
            }
        }
    }

    /// Defaults of the record type; fields without one are absent.
    #[must_use]
    pub const fn default_snapshot(&self) -> &Map<String, Value> {
        &self.defaults
    }

    /// Dotted paths of every leaf field.
    #[must_use]
    pub fn flattened_field_paths(&self) -> &[String] {
        &self.flat_paths
    }

    /// Coercions keyed by field name.
    #[must_use]
    pub const fn type_map(&self) -> &BTreeMap<String, TypeMap> {
        &self.types
    }

    /// Capture the field values of `instance`.
    ///
    /// # Errors
    ///
    /// Returns [`StructParseError::Snapshot`] when the instance does not
    /// serialise to a mapping.
    pub fn snapshot<T: Serialize>(&self, instance: &T) -> StructParseResult<Map<String, Value>> {
        let value = serde_json::to_value(instance).map_err(|source| self.snapshot_error(source))?;
        match value {
            Value::Object(map) => Ok(map),
            _ => Err(self.snapshot_error(<serde_json::Error as serde::ser::Error>::custom(
                "record did not serialise to a mapping",
            ))),
        }
    }

    fn snapshot_error(&self, source: serde_json::Error) -> StructParseError {
        StructParseError::Snapshot {
            record: self.name.clone(),
            source,
        }
    }

    /// Build a record from `base` overlaid with `raw`.
    ///
    /// # Errors
    ///
    /// Returns [`StructParseError::Construct`] when the merged values do not
    /// deserialise into `T`.
    pub fn construct<T: DeserializeOwned>(
        &self,
        base: &Map<String, Value>,
        raw: &Map<String, Value>,
    ) -> StructParseResult<T> {
        let merged = self.project(base, raw);
        serde_json::from_value(Value::Object(merged)).map_err(|source| {
            StructParseError::Construct {
                record: self.name.clone(),
                source,
            }
        })
    }
}

#[cfg(test)]
mod tests;
