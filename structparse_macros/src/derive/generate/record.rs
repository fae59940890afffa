//! `#[derive(Record)]` expansion.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Expr, ExprLit, Lit};

use super::value_tokens;
use crate::derive::parse::{FieldAttrs, FieldDefault, Nargs, RecordField, RecordInput};

/// Implement `Record` and `ArgType` for the input struct.
pub(crate) fn record_impl(input: &DeriveInput, record: &RecordInput) -> TokenStream {
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let command_name = &record.command_name;
    let description = record
        .description
        .as_ref()
        .map(|text| quote! { .description(#text) });
    let fields = record.fields.iter().map(field_schema);
    quote! {
        impl #impl_generics ::structparse::Record for #ident #ty_generics #where_clause {
            fn schema() -> ::structparse::RecordSchema {
                ::structparse::RecordSchema::new(::core::any::type_name::<Self>())
                    .command_name(#command_name)
                    #description
                    #( .field(#fields) )*
            }
        }

        impl #impl_generics ::structparse::ArgType for #ident #ty_generics #where_clause {
            fn declared_type() -> ::structparse::DeclaredType {
                ::structparse::DeclaredType::Record(::structparse::RecordRef::of::<Self>())
            }
        }
    }
}

fn field_schema(field: &RecordField) -> TokenStream {
    let key = &field.key;
    let declared = declared_type(field);
    let doc = field.doc.as_ref().map(|text| quote! { .doc(#text) });
    let default = field
        .attrs
        .default
        .as_ref()
        .map(|source| default_tokens(source, &field.ty));
    let overrides = field
        .attrs
        .has_overrides()
        .then(|| overrides_tokens(&field.attrs));
    quote! {
        ::structparse::FieldSchema::new(#key, #declared)
            #doc
            #default
            #overrides
    }
}

fn declared_type(field: &RecordField) -> TokenStream {
    let attrs = &field.attrs;
    if let Some(values) = &attrs.literal {
        let values = values.iter().map(value_tokens);
        return quote! { ::structparse::DeclaredType::Literal(::std::vec![#(#values),*]) };
    }
    if let Some(expr) = &attrs.ty {
        return quote! { #expr };
    }
    if attrs.skip {
        return quote! { ::structparse::DeclaredType::Any };
    }
    let ty = &field.ty;
    quote! { <#ty as ::structparse::ArgType>::declared_type() }
}

fn default_tokens(source: &FieldDefault, ty: &syn::Type) -> TokenStream {
    match source {
        FieldDefault::Trait => quote! {
            .default(<#ty as ::core::default::Default>::default())
        },
        FieldDefault::Expr(
            expr @ Expr::Lit(ExprLit {
                lit: Lit::Str(_), ..
            }),
        ) => quote! {
            .default(<#ty as ::core::convert::From<&str>>::from(#expr))
        },
        FieldDefault::Expr(expr) => quote! {
            .default(::core::convert::identity::<#ty>(#expr))
        },
    }
}

fn overrides_tokens(attrs: &FieldAttrs) -> TokenStream {
    let mut calls = Vec::new();
    if let Some(flag) = &attrs.flag {
        calls.push(quote! { .flag(#flag) });
    }
    if attrs.positional {
        calls.push(quote! { .positional() });
    }
    if attrs.skip {
        calls.push(quote! { .skip() });
    }
    if let Some(help) = &attrs.help {
        calls.push(quote! { .help(#help) });
    }
    if let Some(metavar) = &attrs.metavar {
        calls.push(quote! { .metavar(#metavar) });
    }
    if let Some(required) = attrs.required {
        calls.push(quote! { .required(#required) });
    }
    if let Some(nargs) = attrs.nargs {
        let arity = match nargs {
            Nargs::Optional => quote! { ::structparse::Arity::Optional },
            Nargs::OneOrMore => quote! { ::structparse::Arity::OneOrMore },
            Nargs::Fixed(count) => quote! { ::structparse::Arity::Fixed(#count) },
        };
        calls.push(quote! { .arity(#arity) });
    }
    if let Some(choices) = &attrs.choices {
        let values = choices.iter().map(value_tokens);
        calls.push(quote! { .choices([#(#values),*]) });
    }
    quote! {
        .overrides(::structparse::FieldOverrides::new() #(#calls)*)
    }
}
