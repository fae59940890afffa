//! Attribute and input parsing for the `structparse` derives.

use syn::meta::ParseNestedMeta;
use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, Lit, Token, parenthesized};

mod doc;
mod input;
mod literals;
mod serde_attrs;

pub(crate) use input::{
    EnumMemberInput, MemberValue, RecordField, RecordInput, parse_enum_input, parse_record_input,
};
use literals::{lit_bool, lit_str};

/// Struct-level `#[structparse(...)]` settings.
#[derive(Default, Clone)]
pub(crate) struct StructAttrs {
    /// Program name shown in usage lines.
    pub name: Option<String>,
    /// Description replacing the doc comment.
    pub about: Option<String>,
}

/// Source of a field's declared default.
#[derive(Clone)]
pub(crate) enum FieldDefault {
    /// `default = expr`.
    Expr(Expr),
    /// Bare `default`: the type's `Default` implementation.
    Trait,
}

/// Value of `nargs = ...`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Nargs {
    Optional,
    OneOrMore,
    Fixed(usize),
}

/// Field-level `#[structparse(...)]` settings.
#[derive(Default, Clone)]
pub(crate) struct FieldAttrs {
    pub default: Option<FieldDefault>,
    pub flag: Option<String>,
    pub positional: bool,
    pub skip: bool,
    pub help: Option<String>,
    pub metavar: Option<String>,
    pub required: Option<bool>,
    pub nargs: Option<Nargs>,
    pub ty: Option<Expr>,
    pub literal: Option<Vec<Expr>>,
    pub choices: Option<Vec<Expr>>,
}

impl FieldAttrs {
    /// Whether any setting needs a `FieldOverrides` value.
    pub(crate) const fn has_overrides(&self) -> bool {
        self.flag.is_some()
            || self.positional
            || self.skip
            || self.help.is_some()
            || self.metavar.is_some()
            || self.required.is_some()
            || self.nargs.is_some()
            || self.choices.is_some()
    }
}

/// Variant-level `#[structparse(...)]` settings.
#[derive(Default, Clone)]
pub(crate) struct VariantAttrs {
    pub value: Option<Expr>,
}

/// Iterate all `#[structparse(...)]` attributes once and apply a callback.
fn parse_structparse<F>(attrs: &[Attribute], mut f: F) -> syn::Result<()>
where
    F: FnMut(&ParseNestedMeta) -> syn::Result<()>,
{
    for attr in attrs.iter().filter(|a| a.path().is_ident("structparse")) {
        attr.parse_nested_meta(|meta| f(&meta))?;
    }
    Ok(())
}

/// Consumes an unrecognised key-value or list without recording it.
fn discard_unknown(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<proc_macro2::TokenStream>()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        parenthesized!(content in meta.input);
        content.parse::<proc_macro2::TokenStream>()?;
    }
    Ok(())
}

fn unknown_key(meta: &ParseNestedMeta, scope: &str) -> syn::Error {
    let key = meta
        .path
        .get_ident()
        .map_or_else(|| String::from("<path>"), ToString::to_string);
    meta.error(format!("unknown {scope} attribute `{key}`"))
}

/// Reads `key` or `key = true|false`.
fn flag_or_bool(meta: &ParseNestedMeta, key: &str) -> syn::Result<bool> {
    if meta.input.peek(Token![=]) {
        lit_bool(meta, key)
    } else {
        Ok(true)
    }
}

/// Reads a parenthesised, comma-separated list of expressions.
fn expr_list(meta: &ParseNestedMeta) -> syn::Result<Vec<Expr>> {
    let content;
    parenthesized!(content in meta.input);
    let items = Punctuated::<Expr, Token![,]>::parse_terminated(&content)?;
    if items.is_empty() {
        return Err(meta.error("expected at least one value"));
    }
    Ok(items.into_iter().collect())
}

fn parse_nargs(meta: &ParseNestedMeta) -> syn::Result<Nargs> {
    let lit = meta.value()?.parse::<Lit>()?;
    match &lit {
        Lit::Str(s) => match s.value().as_str() {
            "?" => Ok(Nargs::Optional),
            "+" => Ok(Nargs::OneOrMore),
            other => Err(syn::Error::new(
                s.span(),
                format!("unknown nargs '{other}'; expected \"?\", \"+\" or a count"),
            )),
        },
        Lit::Int(n) => {
            let count = n.base10_parse::<usize>()?;
            if count == 0 {
                return Err(syn::Error::new(n.span(), "nargs count must be positive"));
            }
            Ok(Nargs::Fixed(count))
        }
        other => Err(syn::Error::new(
            other.span(),
            "nargs must be \"?\", \"+\" or an integer",
        )),
    }
}

/// Extracts `#[structparse(...)]` metadata applied to a struct.
pub(crate) fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<StructAttrs> {
    let mut out = StructAttrs::default();
    parse_structparse(attrs, |meta| {
        match meta.path.get_ident().map(ToString::to_string).as_deref() {
            Some("name") => {
                out.name = Some(lit_str(meta, "name")?.value());
                Ok(())
            }
            Some("about") => {
                out.about = Some(lit_str(meta, "about")?.value());
                Ok(())
            }
            _ => Err(unknown_key(meta, "struct")),
        }
    })?;
    Ok(out)
}

/// Applies a recognised field attribute, returning `true` if handled.
fn apply_field_attr(meta: &ParseNestedMeta, out: &mut FieldAttrs) -> syn::Result<bool> {
    let Some(ident) = meta.path.get_ident() else {
        return Ok(false);
    };
    match ident.to_string().as_str() {
        "default" => {
            out.default = Some(if meta.input.peek(Token![=]) {
                FieldDefault::Expr(meta.value()?.parse()?)
            } else {
                FieldDefault::Trait
            });
        }
        "flag" => out.flag = Some(lit_str(meta, "flag")?.value()),
        "positional" => out.positional = flag_or_bool(meta, "positional")?,
        "skip" => out.skip = flag_or_bool(meta, "skip")?,
        "help" => out.help = Some(lit_str(meta, "help")?.value()),
        "metavar" => out.metavar = Some(lit_str(meta, "metavar")?.value()),
        "required" => out.required = Some(flag_or_bool(meta, "required")?),
        "nargs" => out.nargs = Some(parse_nargs(meta)?),
        "ty" => out.ty = Some(meta.value()?.parse()?),
        "literal" => out.literal = Some(expr_list(meta)?),
        "choices" => out.choices = Some(expr_list(meta)?),
        _ => return Ok(false),
    }
    Ok(true)
}

/// Parses field-level `#[structparse(...)]` attributes.
///
/// Unknown keys are rejected so misspelt settings fail at compile time.
pub(crate) fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    parse_structparse(attrs, |meta| {
        if apply_field_attr(meta, &mut out)? {
            Ok(())
        } else {
            Err(unknown_key(meta, "field"))
        }
    })?;
    if out.literal.is_some() && out.ty.is_some() {
        return Err(syn::Error::new(
            proc_macro2::Span::call_site(),
            "`literal(...)` and `ty = ...` cannot be combined",
        ));
    }
    Ok(out)
}

/// Parses variant-level `#[structparse(...)]` attributes.
pub(crate) fn parse_variant_attrs(attrs: &[Attribute]) -> syn::Result<VariantAttrs> {
    let mut out = VariantAttrs::default();
    parse_structparse(attrs, |meta| {
        if meta.path.is_ident("value") {
            out.value = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(unknown_key(meta, "variant"))
        }
    })?;
    Ok(out)
}
