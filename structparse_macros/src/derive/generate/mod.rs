//! Token generation for the derives.

use proc_macro2::TokenStream;
use quote::quote;

mod arg_enum;
mod record;

pub(crate) use arg_enum::arg_enum_impl;
pub(crate) use record::record_impl;

/// Wrap `expr` in `serde_json::Value::from`.
fn value_tokens(expr: &syn::Expr) -> TokenStream {
    quote! { ::structparse::__private::serde_json::Value::from(#expr) }
}
