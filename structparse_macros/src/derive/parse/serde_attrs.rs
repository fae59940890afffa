//! Serde attribute parsing helpers.
//!
//! Record fields and enum members are looked up by the names serde emits, so
//! the derives honour `#[serde(rename = "...")]` and
//! `#[serde(rename_all = "...")]`.

use heck::{
    ToKebabCase, ToLowerCamelCase, ToShoutyKebabCase, ToShoutySnakeCase, ToSnakeCase,
    ToUpperCamelCase,
};
use syn::meta::ParseNestedMeta;
use syn::{Attribute, LitStr, Token};

/// Supported `#[serde(rename_all = "...")]` rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SerdeRenameAll {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl SerdeRenameAll {
    fn parse(value: &LitStr) -> syn::Result<Self> {
        match value.value().as_str() {
            "lowercase" => Ok(Self::Lower),
            "UPPERCASE" => Ok(Self::Upper),
            "PascalCase" => Ok(Self::Pascal),
            "camelCase" => Ok(Self::Camel),
            "snake_case" => Ok(Self::Snake),
            "SCREAMING_SNAKE_CASE" => Ok(Self::ScreamingSnake),
            "kebab-case" => Ok(Self::Kebab),
            "SCREAMING-KEBAB-CASE" => Ok(Self::ScreamingKebab),
            other => Err(syn::Error::new(
                value.span(),
                format!("unsupported serde rename_all value '{other}'"),
            )),
        }
    }

    pub(crate) fn apply(self, name: &str) -> String {
        match self {
            Self::Lower => name.to_ascii_lowercase(),
            Self::Upper => name.to_ascii_uppercase(),
            Self::Pascal => name.to_upper_camel_case(),
            Self::Camel => name.to_lower_camel_case(),
            Self::Snake => name.to_snake_case(),
            Self::ScreamingSnake => name.to_shouty_snake_case(),
            Self::Kebab => name.to_kebab_case(),
            Self::ScreamingKebab => name.to_shouty_kebab_case(),
        }
    }
}

/// Parse `#[serde(rename_all = "...")]` from container attributes.
pub(crate) fn serde_rename_all(attrs: &[Attribute]) -> syn::Result<Option<SerdeRenameAll>> {
    let mut out = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let value = meta.value()?.parse::<LitStr>()?;
                out = Some(SerdeRenameAll::parse(&value)?);
            } else {
                super::discard_unknown(&meta)?;
            }
            Ok(())
        })?;
    }
    Ok(out)
}

/// Parse `#[serde(rename = "...")]` (and `rename(serialize = "...")`).
fn serde_rename(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut out = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("rename") {
                return super::discard_unknown(&meta);
            }
            if meta.input.peek(Token![=]) {
                out = Some(meta.value()?.parse::<LitStr>()?.value());
                return Ok(());
            }
            if meta.input.peek(syn::token::Paren) {
                meta.parse_nested_meta(|nested| parse_rename_serialize(&nested, &mut out))?;
            }
            Ok(())
        })?;
    }
    Ok(out)
}

fn parse_rename_serialize(nested: &ParseNestedMeta, rename: &mut Option<String>) -> syn::Result<()> {
    if !nested.path.is_ident("serialize") {
        return super::discard_unknown(nested);
    }
    *rename = Some(nested.value()?.parse::<LitStr>()?.value());
    Ok(())
}

/// The key serde uses for a field or variant called `ident`.
pub(crate) fn serialized_name(
    ident: &syn::Ident,
    attrs: &[Attribute],
    rename_all: Option<SerdeRenameAll>,
) -> syn::Result<String> {
    if let Some(rename) = serde_rename(attrs)? {
        return Ok(rename);
    }
    let name = ident.to_string();
    let raw = name.strip_prefix("r#").unwrap_or(&name);
    Ok(rename_all.map_or_else(|| raw.to_owned(), |rule| rule.apply(raw)))
}
