//! Derive implementations shared by the public macro entry points.

use proc_macro2::TokenStream;

mod generate;
mod parse;
#[cfg(test)]
mod tests;

/// Expand `#[derive(Record)]`.
pub(crate) fn derive_record(input: &syn::DeriveInput) -> syn::Result<TokenStream> {
    let record = parse::parse_record_input(input)?;
    Ok(generate::record_impl(input, &record))
}

/// Expand `#[derive(ArgEnum)]`.
pub(crate) fn derive_arg_enum(input: &syn::DeriveInput) -> syn::Result<TokenStream> {
    let members = parse::parse_enum_input(input)?;
    Ok(generate::arg_enum_impl(input, &members))
}
