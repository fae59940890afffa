//! Building one field descriptor from its schema.

use serde_json::Value;

use super::{FieldDescriptor, FieldKind, RecordAnalyzer, Scope, TypeMap, to_arg_name};
use crate::argument::{ArgKind, ArgumentSpec, Arity};
use crate::coerce;
use crate::error::ConfigError;
use crate::resolve::Draft;
use crate::schema::FieldSchema;
use crate::types::RecordRef;

/// Describe `field`, recursing into nested records.
///
/// `inherited` is the value a parent record's default assigns to this field.
pub(super) fn describe(
    field: &FieldSchema,
    scope: &Scope<'_>,
    inherited: Option<&Value>,
) -> Result<FieldDescriptor, ConfigError> {
    let own = field.field_overrides();
    let path = scope.path_of(field.name());
    let declared = field
        .declared_default()
        .cloned()
        .transpose()
        .map_err(|message| ConfigError::InvalidDefault {
            field: path.clone(),
            message,
        })?;
    let has_default = own.default.is_some() || declared.is_some();
    let default = own
        .default
        .clone()
        .or_else(|| inherited.cloned())
        .or(declared)
        .or_else(|| scope.blanket.default.clone());
    let ty = own.ty.clone().unwrap_or_else(|| field.ty().clone());

    if let crate::types::DeclaredType::Record(record) = &ty {
        return describe_nested(field, scope, path, *record, default);
    }

    let mut draft = Draft::new(path.clone(), ty.clone());
    draft.arity = own.arity;
    draft.default = default;
    draft.display_name = own.metavar.clone().or_else(|| scope.blanket.metavar.clone());
    draft.negatable = scope.negatable;
    let resolved = draft.resolve()?;

    let is_positional = own.positional || !has_default;
    let external = to_arg_name(&path);
    let mut names = Vec::with_capacity(2);
    if is_positional {
        if let Some(flag) = &own.flag {
            return Err(ConfigError::PositionalWithFlag {
                field: path,
                flag: flag.clone(),
            });
        }
        names.push(external);
    } else {
        names.push(format!("--{external}"));
        if let Some(flag) = &own.flag {
            validate_flag(&path, flag)?;
            names.push(flag.clone());
        }
    }

    let coercion = resolved.coercion();
    let (kind, arg_coercion) = if is_positional && resolved.kind != ArgKind::Value {
        (ArgKind::Value, Some(coerce::boolean()))
    } else {
        (resolved.kind, coercion.clone())
    };
    let spec = ArgumentSpec {
        id: path.clone(),
        names,
        coercion: arg_coercion,
        arity: resolved.arity.unwrap_or_default(),
        choices: own.choices.clone().or(resolved.choices),
        default: resolved.default.clone(),
        display_name: resolved.display_name,
        help: own
            .help
            .clone()
            .or_else(|| field.doc_text().map(ToOwned::to_owned))
            .or_else(|| scope.blanket.help.clone()),
        is_positional,
        required: own.required.or(scope.blanket.required),
        kind,
        type_name: ty.to_string(),
    };

    Ok(FieldDescriptor {
        name: field.name().to_owned(),
        path,
        default: resolved.default,
        kind: if own.excluded {
            FieldKind::Excluded
        } else {
            FieldKind::Argument(spec)
        },
        types: TypeMap::Leaf(coercion),
    })
}

fn describe_nested(
    field: &FieldSchema,
    scope: &Scope<'_>,
    path: String,
    record: RecordRef,
    default: Option<Value>,
) -> Result<FieldDescriptor, ConfigError> {
    let own = field.field_overrides();
    if own.positional {
        return Err(ConfigError::NestedPositional { field: path });
    }
    if let Some(flag) = &own.flag {
        return Err(ConfigError::NestedWithFlag {
            field: path,
            flag: flag.clone(),
        });
    }

    let schema = record.schema();
    if scope.ancestry.iter().any(|name| name == schema.name()) {
        return Err(ConfigError::RecursiveRecord {
            record: schema.short_name().to_owned(),
            field: path,
        });
    }
    let child_scope = scope.descend(field.name(), schema.name());
    let inherited = default.as_ref().and_then(Value::as_object);
    let mut child = RecordAnalyzer::build(&schema, &child_scope, inherited)?;
    if let Some(doc) = field.doc_text().or(own.help.as_deref())
        && child.description.is_none()
    {
        child.description = Some(doc.to_owned());
    }

    Ok(FieldDescriptor {
        name: field.name().to_owned(),
        path,
        default: Some(Value::Object(child.defaults.clone())),
        types: TypeMap::Record(child.types.clone()),
        kind: if own.excluded {
            FieldKind::Excluded
        } else {
            FieldKind::Nested(Box::new(child))
        },
    })
}

/// Check that the engine can split tokens between `arguments`' positionals.
///
/// Only the second-to-last positional may take several tokens. When it does,
/// the last one must be required and at most one of the two is unbounded.
/// Optional positionals come after every required one.
pub(super) fn check_positionals(arguments: &[&ArgumentSpec]) -> Result<(), ConfigError> {
    let positionals: Vec<&ArgumentSpec> = arguments
        .iter()
        .copied()
        .filter(|spec| spec.is_positional)
        .collect();
    let second_to_last = positionals.len().saturating_sub(2);
    for (index, pair) in positionals.windows(2).enumerate() {
        let [current, next] = pair else {
            continue;
        };
        if !current.is_required() && next.is_required() {
            return Err(ConfigError::OptionalBeforeRequired {
                optional: current.id.clone(),
                required: next.id.clone(),
            });
        }
        let several = current.arity.max_values() != Some(1);
        let both_unbounded = current.arity == Arity::OneOrMore && next.arity == Arity::OneOrMore;
        if several && (index != second_to_last || !next.is_required() || both_unbounded) {
            return Err(ConfigError::VariadicPositional {
                field: current.id.clone(),
                next: next.id.clone(),
            });
        }
    }
    Ok(())
}

/// Alternate flags are either `-x` or `--name`.
fn validate_flag(path: &str, flag: &str) -> Result<(), ConfigError> {
    let valid = match (flag.strip_prefix("--"), flag.strip_prefix('-')) {
        (Some(long), _) => !long.is_empty() && !long.starts_with('-'),
        (None, Some(short)) => short.chars().count() == 1,
        (None, None) => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidFlag {
            field: path.to_owned(),
            flag: flag.to_owned(),
        })
    }
}
