//! Tests for record analysis and projection.
#![expect(clippy::expect_used, reason = "fixtures build known-valid schemas")]

use anyhow::{Context, Result, ensure};
use rstest::{fixture, rstest};
use serde_json::{Map, Value, json};

use super::{FieldKind, RecordAnalyzer, to_external_dict};
use crate::argument::{ArgKind, Arity};
use crate::error::ConfigError;
use crate::schema::{FieldOverrides, FieldSchema, RecordSchema};
use crate::types::{DeclaredType, RecordRef};

fn child_schema() -> RecordSchema {
    RecordSchema::new("tests::Child")
        .description("Child options.")
        .field(FieldSchema::new("str_arg", DeclaredType::str()).default("child"))
        .field(FieldSchema::new("size", DeclaredType::int()).default(1))
}

fn parent_schema() -> RecordSchema {
    RecordSchema::new("tests::Parent")
        .field(FieldSchema::new("pos_arg", DeclaredType::str()))
        .field(FieldSchema::new("count", DeclaredType::int()).default(5))
        .field(
            FieldSchema::new("child", DeclaredType::Record(RecordRef::new("tests::Child", child_schema)))
                .default(json!({"size": 9})),
        )
        .field(
            FieldSchema::new("secret", DeclaredType::str())
                .default("hidden")
                .overrides(FieldOverrides::new().skip()),
        )
}

fn looping_schema() -> RecordSchema {
    RecordSchema::new("tests::Loop").field(FieldSchema::new(
        "next",
        DeclaredType::Record(RecordRef::new("tests::Loop", looping_schema)),
    ))
}

fn analyse(schema: &RecordSchema) -> Result<RecordAnalyzer, ConfigError> {
    RecordAnalyzer::new(schema, &FieldOverrides::default(), true)
}

fn map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(inner) => inner,
        _ => Map::new(),
    }
}

#[fixture]
fn parent() -> RecordAnalyzer {
    analyse(&parent_schema()).expect("parent schema analyses")
}

#[rstest]
fn infers_positionals_from_missing_defaults(parent: RecordAnalyzer) -> Result<()> {
    let args = parent.arguments();
    let pos = args.iter().find(|a| a.id == "pos_arg").context("pos_arg")?;
    let count = args.iter().find(|a| a.id == "count").context("count")?;
    ensure!(pos.is_positional && pos.names == ["pos_arg"], "{pos:?}");
    ensure!(!count.is_positional && count.names == ["--count"], "{count:?}");
    Ok(())
}

#[rstest]
fn nested_arguments_use_dotted_names(parent: RecordAnalyzer) -> Result<()> {
    let args = parent.arguments();
    let nested = args
        .iter()
        .find(|a| a.id == "child.str_arg")
        .context("nested argument")?;
    ensure!(nested.names == ["--child.str-arg"], "{:?}", nested.names);
    Ok(())
}

#[rstest]
fn nested_defaults_overlay_the_child_snapshot(parent: RecordAnalyzer) {
    assert_eq!(
        parent.default_snapshot().get("child"),
        Some(&json!({"str_arg": "child", "size": 9}))
    );
}

#[rstest]
fn excluded_fields_stay_in_the_snapshot(parent: RecordAnalyzer) -> Result<()> {
    let secret = parent.field("secret").context("secret")?;
    ensure!(matches!(secret.kind(), FieldKind::Excluded), "{secret:?}");
    ensure!(
        parent.default_snapshot().get("secret") == Some(&json!("hidden")),
        "snapshot keeps excluded defaults"
    );
    ensure!(
        parent.arguments().iter().all(|a| a.id != "secret"),
        "excluded fields have no argument"
    );
    Ok(())
}

#[rstest]
fn flattens_every_leaf_path(parent: RecordAnalyzer) {
    assert_eq!(
        parent.flattened_field_paths(),
        ["pos_arg", "count", "child.str_arg", "child.size", "secret"]
    );
}

#[rstest]
fn projection_nests_dotted_keys_and_drops_unknowns(parent: RecordAnalyzer) {
    let raw = map(json!({
        "count": 7,
        "child.str-arg": "given",
        "unknown": 1,
        "child": {"bogus": true},
    }));
    let projected = parent.project(parent.default_snapshot(), &raw);
    assert_eq!(
        Value::Object(projected),
        json!({
            "count": 7,
            "child": {"str_arg": "given", "size": 9},
            "secret": "hidden",
        })
    );
}

#[rstest]
fn projection_is_idempotent(parent: RecordAnalyzer) {
    let raw = map(json!({"pos-arg": "x", "child": {"size": 3}}));
    let once = parent.project(parent.default_snapshot(), &raw);
    let twice = parent.project(&once, &raw);
    assert_eq!(once, twice);
}

#[rstest]
fn external_spelling_is_recursive() {
    let external = to_external_dict(&map(json!({"a_b": {"c_d": 1}, "e": [1]})));
    assert_eq!(Value::Object(external), json!({"a-b": {"c-d": 1}, "e": [1]}));
}

#[rstest]
#[case::override_wins(Some(json!(7)), Some(json!(5)), json!(7))]
#[case::declared_over_blanket(None, Some(json!(5)), json!(5))]
#[case::blanket_last(None, None, json!(3))]
fn default_precedence(
    #[case] explicit: Option<Value>,
    #[case] declared: Option<Value>,
    #[case] expected: Value,
) -> Result<()> {
    let mut overrides = FieldOverrides::new();
    if let Some(value) = explicit {
        overrides = overrides.default_value(value);
    }
    let mut field = FieldSchema::new("count", DeclaredType::int()).overrides(overrides);
    if let Some(value) = declared {
        field = field.default(value);
    }
    let schema = RecordSchema::new("tests::Precedence").field(field);
    let blanket = FieldOverrides::new().default_value(json!(3));
    let analyzer = RecordAnalyzer::new(&schema, &blanket, true)?;
    let found = analyzer.default_snapshot().get("count");
    ensure!(found == Some(&expected), "got {found:?}");
    Ok(())
}

#[rstest]
fn blanket_help_fills_missing_docs() -> Result<()> {
    let schema = RecordSchema::new("tests::Help")
        .field(FieldSchema::new("a", DeclaredType::int()).default(1).doc("Own doc."))
        .field(FieldSchema::new("b", DeclaredType::int()).default(2));
    let blanket = FieldOverrides::new().help("shared help");
    let analyzer = RecordAnalyzer::new(&schema, &blanket, true)?;
    let helps: Vec<Option<String>> = analyzer
        .arguments()
        .iter()
        .map(|a| a.help.clone())
        .collect();
    ensure!(
        helps == [Some("Own doc.".to_owned()), Some("shared help".to_owned())],
        "{helps:?}"
    );
    Ok(())
}

#[rstest]
fn booleans_follow_negation_setting() -> Result<()> {
    let schema = RecordSchema::new("tests::Flags")
        .field(FieldSchema::new("verbose", DeclaredType::Boolean).default(false));
    let negatable = RecordAnalyzer::new(&schema, &FieldOverrides::default(), true)?;
    let presence = RecordAnalyzer::new(&schema, &FieldOverrides::default(), false)?;
    let kind_of = |a: &RecordAnalyzer| a.arguments().first().map(|s| s.kind);
    ensure!(kind_of(&negatable) == Some(ArgKind::BooleanSwitch), "switch");
    ensure!(kind_of(&presence) == Some(ArgKind::PresenceFlag), "presence");
    Ok(())
}

#[rstest]
fn explicit_arity_overrides_the_type() -> Result<()> {
    let schema = RecordSchema::new("tests::Arity").field(
        FieldSchema::new("level", DeclaredType::int())
            .default(1)
            .overrides(FieldOverrides::new().positional().arity(Arity::Optional)),
    );
    let analyzer = analyse(&schema)?;
    let spec = analyzer.arguments().first().copied().context("argument")?;
    ensure!(spec.is_positional && spec.arity == Arity::Optional, "{spec:?}");
    ensure!(!spec.is_required(), "optional positionals are not required");
    Ok(())
}

#[rstest]
#[case::positional_with_flag(
    RecordSchema::new("tests::Bad").field(
        FieldSchema::new("pos", DeclaredType::str()).overrides(FieldOverrides::new().flag("-p"))
    )
)]
#[case::nested_positional(
    RecordSchema::new("tests::Bad").field(
        FieldSchema::new("child", DeclaredType::Record(RecordRef::new("tests::Child", child_schema)))
            .overrides(FieldOverrides::new().positional())
    )
)]
#[case::nested_flag(
    RecordSchema::new("tests::Bad").field(
        FieldSchema::new("child", DeclaredType::Record(RecordRef::new("tests::Child", child_schema)))
            .overrides(FieldOverrides::new().flag("-c"))
    )
)]
#[case::bad_flag(
    RecordSchema::new("tests::Bad").field(
        FieldSchema::new("count", DeclaredType::int())
            .default(1)
            .overrides(FieldOverrides::new().flag("count"))
    )
)]
#[case::duplicate(
    RecordSchema::new("tests::Bad")
        .field(FieldSchema::new("a", DeclaredType::int()).default(1))
        .field(FieldSchema::new("a", DeclaredType::int()).default(2))
)]
#[case::recursive(looping_schema())]
#[case::two_unbounded_positionals(
    RecordSchema::new("tests::Bad")
        .field(FieldSchema::new("first", DeclaredType::list(DeclaredType::str())))
        .field(FieldSchema::new("second", DeclaredType::list(DeclaredType::str())))
)]
#[case::list_before_two_positionals(
    RecordSchema::new("tests::Bad")
        .field(FieldSchema::new("files", DeclaredType::list(DeclaredType::str())))
        .field(FieldSchema::new("source", DeclaredType::str()))
        .field(FieldSchema::new("target", DeclaredType::str()))
)]
#[case::optional_before_required(
    RecordSchema::new("tests::Bad")
        .field(
            FieldSchema::new("maybe", DeclaredType::str())
                .overrides(FieldOverrides::new().arity(Arity::Optional)),
        )
        .field(FieldSchema::new("needed", DeclaredType::str()))
)]
#[case::kebab_duplicate(
    RecordSchema::new("tests::Bad")
        .field(FieldSchema::new("dry_run", DeclaredType::int()).default(1))
        .field(FieldSchema::new("dry-run", DeclaredType::int()).default(2))
)]
#[case::dotted_name(
    RecordSchema::new("tests::Bad").field(FieldSchema::new("a.b", DeclaredType::int()).default(1))
)]
fn rejects_invalid_declarations(#[case] schema: RecordSchema) {
    let result = analyse(&schema);
    assert!(result.is_err(), "expected a configuration error");
}

#[rstest]
fn positional_layouts_name_the_offending_fields() {
    let two_lists = RecordSchema::new("tests::Bad")
        .field(FieldSchema::new("first", DeclaredType::list(DeclaredType::str())))
        .field(FieldSchema::new("second", DeclaredType::list(DeclaredType::str())));
    assert_eq!(
        analyse(&two_lists).err(),
        Some(ConfigError::VariadicPositional {
            field: "first".to_owned(),
            next: "second".to_owned(),
        })
    );
}

#[rstest]
fn a_list_may_precede_the_last_required_positional() -> Result<()> {
    let schema = RecordSchema::new("tests::Copy")
        .field(FieldSchema::new("sources", DeclaredType::list(DeclaredType::str())))
        .field(FieldSchema::new("target", DeclaredType::str()));
    let analyzer = analyse(&schema)?;
    ensure!(analyzer.arguments().len() == 2, "both positionals kept");
    Ok(())
}

#[rstest]
fn projection_matches_keys_in_either_spelling() -> Result<()> {
    let schema = RecordSchema::new("tests::Kebab")
        .field(FieldSchema::new("dry-run", DeclaredType::int()).default(1))
        .field(FieldSchema::new("max_depth", DeclaredType::int()).default(2));
    let analyzer = analyse(&schema)?;
    let projected = analyzer.project(
        analyzer.default_snapshot(),
        &map(json!({"dry_run": 5, "max-depth": 3})),
    );
    ensure!(
        Value::Object(projected.clone()) == json!({"dry-run": 5, "max_depth": 3}),
        "got {projected:?}"
    );
    ensure!(analyzer.field("dry_run").is_some(), "lookup by either spelling");
    Ok(())
}

#[rstest]
fn recursion_names_the_cycle() {
    let err = analyse(&looping_schema()).err();
    assert_eq!(
        err,
        Some(ConfigError::RecursiveRecord {
            record: "Loop".to_owned(),
            field: "next".to_owned(),
        })
    );
}

#[rstest]
fn non_records_are_rejected() {
    let err = RecordAnalyzer::for_type(&DeclaredType::int(), &FieldOverrides::default(), true);
    assert!(matches!(err, Err(ConfigError::NotARecord { .. })));
}
