//! Procedural macros for `structparse`.
//!
//! `#[derive(Record)]` turns a struct with named fields into a
//! `structparse::Record`, describing each field's type, default and
//! documentation. `#[derive(ArgEnum)]` exposes a unit-only enum as a set of
//! named choices.
//!
//! Field attributes live under `#[structparse(...)]`:
//!
//! - `default = expr` or bare `default` (uses `Default::default()`).
//! - `flag = "-x"` adds a short flag or long alias.
//! - `positional` forces a positional argument; `skip` hides the field.
//! - `help`, `metavar`, `required [= bool]`, `nargs = "?" | "+" | N`.
//! - `choices(...)` and `literal(...)` restrict accepted values; `ty = expr`
//!   replaces the declared type.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derive `structparse::Record` and `structparse::ArgType` for a struct.
#[proc_macro_derive(Record, attributes(structparse))]
pub fn derive_record(input_tokens: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input_tokens as DeriveInput);
    derive::derive_record(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Derive `structparse::ArgType` for a unit-only enum.
#[proc_macro_derive(ArgEnum, attributes(structparse))]
pub fn derive_arg_enum(input_tokens: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input_tokens as DeriveInput);
    derive::derive_arg_enum(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
