//! Tests for the generated token streams.

use anyhow::{Result, anyhow, ensure};
use syn::{DeriveInput, parse_quote};

use super::{derive_arg_enum, derive_record};

fn squash(tokens: &proc_macro2::TokenStream) -> String {
    tokens.to_string().split_whitespace().collect()
}

#[test]
fn record_expansion_describes_fields() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        /// Greeter.
        struct Greet {
            /// Who to greet.
            name: String,
            #[structparse(default = "hi")]
            greeting: String,
            #[structparse(default = 3, flag = "-n")]
            count: u8,
            #[structparse(literal("a", 2))]
            pick: String,
        }
    };
    let tokens = squash(&derive_record(&input).map_err(|err| anyhow!(err))?);
    for needle in [
        "impl::structparse::RecordforGreet",
        "impl::structparse::ArgTypeforGreet",
        ".command_name(\"greet\")",
        ".description(\"Greeter.\")",
        "FieldSchema::new(\"name\",<Stringas::structparse::ArgType>::declared_type()).doc(\"Whotogreet.\")",
        ".default(<Stringas::core::convert::From<&str>>::from(\"hi\"))",
        ".default(::core::convert::identity::<u8>(3))",
        ".overrides(::structparse::FieldOverrides::new().flag(\"-n\"))",
        "DeclaredType::Literal(::std::vec![::structparse::__private::serde_json::Value::from(\"a\"),::structparse::__private::serde_json::Value::from(2)])",
    ] {
        ensure!(tokens.contains(needle), "missing {needle} in {tokens}");
    }
    Ok(())
}

#[test]
fn skipped_fields_do_not_need_arg_type() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct Cache {
            #[structparse(skip, default)]
            entries: std::collections::HashMap<String, u8>,
        }
    };
    let tokens = squash(&derive_record(&input).map_err(|err| anyhow!(err))?);
    ensure!(tokens.contains("DeclaredType::Any"), "skip should use Any: {tokens}");
    ensure!(!tokens.contains("ArgType>::declared_type"), "skip used ArgType: {tokens}");
    Ok(())
}

#[test]
fn arg_enum_expansion_lists_members() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        enum Mode {
            Fast,
            Slow = 4,
        }
    };
    let tokens = squash(&derive_arg_enum(&input).map_err(|err| anyhow!(err))?);
    for needle in [
        "impl::structparse::ArgTypeforMode",
        "EnumType::new(\"Mode\"",
        "EnumMember::new(\"Fast\",::structparse::__private::serde_json::Value::from(1i64))",
        "EnumMember::new(\"Slow\",::structparse::__private::serde_json::Value::from(4i64))",
    ] {
        ensure!(tokens.contains(needle), "missing {needle} in {tokens}");
    }
    Ok(())
}
