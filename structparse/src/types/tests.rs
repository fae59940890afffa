//! Tests for type descriptions and their display forms.

use rstest::rstest;
use serde_json::json;

use super::{ArgType, DeclaredType, EnumMember, EnumType, render_value, short_type_name};

#[rstest]
#[case::integer(<i32 as ArgType>::declared_type(), "i32")]
#[case::unsigned(<u8 as ArgType>::declared_type(), "u8")]
#[case::optional(<Option<String> as ArgType>::declared_type(), "Optional[str]")]
#[case::list(<Vec<f64> as ArgType>::declared_type(), "List[f64]")]
#[case::pair(<(i64, String) as ArgType>::declared_type(), "Tuple[i64, str]")]
#[case::variadic(DeclaredType::variadic_tuple(DeclaredType::int()), "Tuple[i64, ...]")]
#[case::union(DeclaredType::union([DeclaredType::int(), DeclaredType::str()]), "Union[i64, str]")]
#[case::literal(DeclaredType::literal([json!("a"), json!(2)]), "Literal[\"a\", 2]")]
fn displays_declared_types(#[case] ty: DeclaredType, #[case] expected: &str) {
    assert_eq!(ty.to_string(), expected);
}

#[rstest]
fn arrays_become_fixed_tuples() {
    let ty = <[u16; 3] as ArgType>::declared_type();
    assert_eq!(
        ty,
        DeclaredType::tuple(std::iter::repeat_n(<u16 as ArgType>::declared_type(), 3))
    );
}

#[rstest]
fn custom_types_compare_by_name() {
    let left = DeclaredType::custom("hex", |s| Ok(json!(s)));
    let right = DeclaredType::custom("hex", |_| Ok(json!(0)));
    assert_eq!(left, right);
}

#[rstest]
fn members_match_by_name_or_value() {
    let ty = EnumType::new(
        "Mode",
        [EnumMember::new("Fast", 1), EnumMember::new("Slow", "slow")],
    );
    assert_eq!(ty.member_for(&json!("Fast")).map(|m| m.name.as_str()), Some("Fast"));
    assert_eq!(ty.member_for(&json!(1)).map(|m| m.name.as_str()), Some("Fast"));
    assert_eq!(ty.member_for(&json!("slow")).map(|m| m.name.as_str()), Some("Slow"));
    assert!(ty.member_for(&json!(3)).is_none());
}

#[rstest]
#[case(json!("text"), "text")]
#[case(json!(4), "4")]
#[case(json!([1, 2]), "1 2")]
#[case(json!(true), "true")]
#[case(json!(null), "None")]
fn renders_values_for_help(#[case] value: serde_json::Value, #[case] expected: &str) {
    assert_eq!(render_value(&value), expected);
}

#[rstest]
#[case("crate::cli::Options", "Options")]
#[case("Options", "Options")]
#[case("app::Wrapper<app::Inner>", "Wrapper")]
fn shortens_type_names(#[case] name: &str, #[case] expected: &str) {
    assert_eq!(short_type_name(name), expected);
}
