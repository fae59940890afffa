//! Tests for token coercion.

use anyhow::{Result, anyhow, ensure};
use rstest::rstest;
use serde_json::{Value, json};

use super::{boolean, enumeration, literal, literal_eval, parse_bool, primitive, union};
use crate::types::{DeclaredType, EnumMember, EnumType, Primitive};

fn animal() -> EnumType {
    EnumType::new(
        "Animal",
        [
            EnumMember::new("Cat", 1),
            EnumMember::new("Dog", 2),
            EnumMember::new("Init", "init"),
        ],
    )
}

#[rstest]
#[case("1_000", 8, true, None)]
#[case("1_000", 16, true, Some(json!(1000)))]
#[case("-128", 8, true, Some(json!(-128)))]
#[case("-129", 8, true, None)]
#[case("-1", 32, false, None)]
#[case("+7", 32, false, Some(json!(7)))]
#[case("18446744073709551615", 64, false, Some(json!(u64::MAX)))]
#[case("1__0", 64, true, None)]
#[case("_1", 64, true, None)]
#[case("1.5", 64, true, None)]
fn integers_respect_width(
    #[case] input: &str,
    #[case] bits: u8,
    #[case] signed: bool,
    #[case] expected: Option<Value>,
) {
    let parsed = primitive(Primitive::Integer { bits, signed }).coerce(input).ok();
    assert_eq!(parsed, expected);
}

#[rstest]
#[case("1.5", Some(json!(1.5)))]
#[case("1_000.25", Some(json!(1000.25)))]
#[case("2e3", Some(json!(2000.0)))]
#[case("inf", None)]
#[case("NaN", None)]
#[case("one", None)]
fn floats_must_be_finite(#[case] input: &str, #[case] expected: Option<Value>) {
    let parsed = primitive(Primitive::Float { bits: 64 }).coerce(input).ok();
    assert_eq!(parsed, expected);
}

#[rstest]
#[case("t", Some(true))]
#[case("YES", Some(true))]
#[case("y", Some(true))]
#[case("False", Some(false))]
#[case("n", Some(false))]
#[case("maybe", None)]
fn boolean_words(#[case] input: &str, #[case] expected: Option<bool>) {
    assert_eq!(parse_bool(input), expected);
    assert_eq!(boolean().coerce(input).ok(), expected.map(Value::Bool));
}

#[rstest]
#[case::name("Cat", "Cat")]
#[case::value("2", "Dog")]
#[case::string_value("init", "Init")]
#[case::quoted("'init'", "Init")]
fn enums_accept_names_and_values(#[case] input: &str, #[case] expected: &str) -> Result<()> {
    let coerced = enumeration(&animal()).coerce(input)?;
    ensure!(coerced == json!(expected), "{input} gave {coerced}");
    Ok(())
}

#[rstest]
#[case("cat")]
#[case("3")]
#[case("Init2")]
fn enums_reject_other_input(#[case] input: &str) {
    let err = enumeration(&animal()).coerce(input);
    assert!(err.is_err(), "{input} should be rejected");
}

#[rstest]
#[case("1", json!(1))]
#[case("3", json!("3"))]
#[case("true", json!(true))]
#[case("other", json!("other"))]
fn mixed_literals_pass_unknown_input_through(#[case] input: &str, #[case] expected: Value) -> Result<()> {
    let values = [json!(1), json!(2), json!("3"), json!("4"), json!(true)];
    let coerced = literal(&values, false).coerce(input)?;
    ensure!(coerced == expected, "{input} gave {coerced}");
    Ok(())
}

#[rstest]
fn strict_literals_reject_unknown_input() {
    let values = [json!("a"), json!(2)];
    assert!(literal(&values, true).coerce("b").is_err());
}

#[rstest]
#[case::int_first("1", json!(1))]
#[case::float_second("1.5", json!(1.5))]
#[case::bool_last("yes", json!(true))]
fn unions_try_branches_in_order(#[case] input: &str, #[case] expected: Value) -> Result<()> {
    let coercer = union(&[DeclaredType::int(), DeclaredType::float(), DeclaredType::Boolean])
        .map_err(|ty| anyhow!("unsupported branch {ty}"))?;
    let coerced = coercer.coerce(input)?;
    ensure!(coerced == expected, "{input} gave {coerced}");
    Ok(())
}

#[rstest]
fn unions_without_text_branch_fail() -> Result<()> {
    let coercer = union(&[DeclaredType::int(), DeclaredType::float(), DeclaredType::Boolean])
        .map_err(|ty| anyhow!("unsupported branch {ty}"))?;
    ensure!(coercer.coerce("abc").is_err(), "abc should not coerce");
    Ok(())
}

#[rstest]
fn unions_fall_back_to_text() -> Result<()> {
    let coercer = union(&[DeclaredType::str(), DeclaredType::int()])
        .map_err(|ty| anyhow!("unsupported branch {ty}"))?;
    ensure!(coercer.coerce("12")? == json!(12), "typed branch wins");
    ensure!(coercer.coerce("abc")? == json!("abc"), "text is the fallback");
    Ok(())
}

#[rstest]
fn unions_reject_sequence_branches() {
    let result = union(&[DeclaredType::int(), DeclaredType::list(DeclaredType::int())]);
    assert!(result.is_err());
}

#[rstest]
#[case("1.5", Some(json!(1.5)))]
#[case("True", Some(json!(true)))]
#[case("'quoted'", Some(json!("quoted")))]
#[case("\"double\"", Some(json!("double")))]
#[case("[1]", None)]
#[case("bare", None)]
fn evaluates_scalar_literals(#[case] input: &str, #[case] expected: Option<Value>) {
    assert_eq!(literal_eval(input), expected);
}
