//! Input gathering for the derives.
//!
//! Every attribute is parsed up front so expansion fails fast with a span
//! pointing at the offending item.

use heck::ToKebabCase;
use syn::{Data, DeriveInput, Expr, ExprLit, ExprUnary, Fields, Lit, UnOp};

use super::doc::{description_text, help_text};
use super::serde_attrs::{serde_rename_all, serialized_name};
use super::{FieldAttrs, parse_field_attrs, parse_struct_attrs, parse_variant_attrs};

/// One named field of a record struct.
pub(crate) struct RecordField {
    /// Key under which serde serialises the field.
    pub key: String,
    pub ty: syn::Type,
    pub doc: Option<String>,
    pub attrs: FieldAttrs,
}

/// Everything `#[derive(Record)]` needs from the struct.
pub(crate) struct RecordInput {
    pub command_name: String,
    pub description: Option<String>,
    pub fields: Vec<RecordField>,
}

/// Raw value carried by an enum member.
pub(crate) enum MemberValue {
    Int(i64),
    Expr(Expr),
}

/// One variant of an `ArgEnum`.
pub(crate) struct EnumMemberInput {
    pub name: String,
    pub value: MemberValue,
}

/// Gathers the fields and attribute metadata of a record struct.
pub(crate) fn parse_record_input(input: &DeriveInput) -> syn::Result<RecordInput> {
    let struct_attrs = parse_struct_attrs(&input.attrs)?;
    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    data.struct_token,
                    "Record requires named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Record can only be derived for structs",
            ));
        }
    };
    let rename_all = serde_rename_all(&input.attrs)?;
    let fields = named
        .iter()
        .map(|field| {
            let Some(ident) = field.ident.as_ref() else {
                return Err(syn::Error::new_spanned(field, "unnamed fields are not supported"));
            };
            Ok(RecordField {
                key: serialized_name(ident, &field.attrs, rename_all)?,
                ty: field.ty.clone(),
                doc: help_text(&field.attrs),
                attrs: parse_field_attrs(&field.attrs)?,
            })
        })
        .collect::<syn::Result<Vec<_>>>()?;
    Ok(RecordInput {
        command_name: struct_attrs
            .name
            .unwrap_or_else(|| input.ident.to_string().to_kebab_case()),
        description: struct_attrs.about.or_else(|| description_text(&input.attrs)),
        fields,
    })
}

/// Reads an integer discriminant such as `3` or `-1`.
fn discriminant_value(expr: &Expr) -> syn::Result<i64> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Int(n), ..
        }) => n.base10_parse::<i64>(),
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr: inner,
            ..
        }) => discriminant_value(inner)?
            .checked_neg()
            .ok_or_else(|| syn::Error::new_spanned(expr, "discriminant out of range")),
        other => Err(syn::Error::new_spanned(
            other,
            "ArgEnum discriminants must be integer literals; use #[structparse(value = ...)]",
        )),
    }
}

/// Gathers the members of a unit-only enum.
///
/// Members without an explicit value are numbered from 1, continuing from
/// the last integer discriminant.
pub(crate) fn parse_enum_input(input: &DeriveInput) -> syn::Result<Vec<EnumMemberInput>> {
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "ArgEnum can only be derived for enums",
        ));
    };
    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "ArgEnum requires at least one variant",
        ));
    }
    let rename_all = serde_rename_all(&input.attrs)?;
    let mut next: i64 = 1;
    let mut members = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                &variant.fields,
                "ArgEnum variants must not carry data",
            ));
        }
        let attrs = parse_variant_attrs(&variant.attrs)?;
        let value = match (attrs.value, &variant.discriminant) {
            (Some(expr), _) => MemberValue::Expr(expr),
            (None, Some((_, expr))) => {
                let number = discriminant_value(expr)?;
                next = number.saturating_add(1);
                MemberValue::Int(number)
            }
            (None, None) => {
                let number = next;
                next = number.saturating_add(1);
                MemberValue::Int(number)
            }
        };
        members.push(EnumMemberInput {
            name: serialized_name(&variant.ident, &variant.attrs, rename_all)?,
            value,
        });
    }
    Ok(members)
}
