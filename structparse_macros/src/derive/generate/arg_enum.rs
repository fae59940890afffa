//! `#[derive(ArgEnum)]` expansion.

use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

use super::value_tokens;
use crate::derive::parse::{EnumMemberInput, MemberValue};

/// Implement `ArgType` for a unit-only enum.
pub(crate) fn arg_enum_impl(input: &DeriveInput, members: &[EnumMemberInput]) -> TokenStream {
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let display_name = ident.to_string();
    let members = members.iter().map(|member| {
        let name = &member.name;
        let value = match &member.value {
            MemberValue::Int(number) => {
                quote! { ::structparse::__private::serde_json::Value::from(#number) }
            }
            MemberValue::Expr(expr) => value_tokens(expr),
        };
        quote! { ::structparse::EnumMember::new(#name, #value) }
    });
    quote! {
        impl #impl_generics ::structparse::ArgType for #ident #ty_generics #where_clause {
            fn declared_type() -> ::structparse::DeclaredType {
                ::structparse::DeclaredType::Enum(::structparse::EnumType::new(
                    #display_name,
                    [#(#members),*],
                ))
            }
        }
    }
}
