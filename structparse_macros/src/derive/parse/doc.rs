//! Doc comment extraction.

use syn::{Attribute, Expr, ExprLit, Lit, Meta};

fn doc_lines(attrs: &[Attribute]) -> Vec<String> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(pair) => match &pair.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(text),
                    ..
                }) => Some(text.value().trim().to_owned()),
                _ => None,
            },
            _ => None,
        })
        .collect()
}

/// Field help: every non-blank doc line joined with single spaces.
pub(crate) fn help_text(attrs: &[Attribute]) -> Option<String> {
    let joined = doc_lines(attrs)
        .into_iter()
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!joined.is_empty()).then_some(joined)
}

/// Record description: doc lines with paragraph breaks kept.
pub(crate) fn description_text(attrs: &[Attribute]) -> Option<String> {
    let joined = doc_lines(attrs).join("\n");
    let trimmed = joined.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
