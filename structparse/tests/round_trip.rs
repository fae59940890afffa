//! Conversions between records, plain mappings and serialised documents.
#![expect(clippy::expect_used, reason = "fixtures fail fast on invalid records")]

use anyhow::{Result, anyhow, ensure};
use rstest::{fixture, rstest};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use structparse::{Format, ParserHandle, Record, StructParseError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
struct Output {
    #[structparse(default = "out")]
    out_dir: String,
    #[structparse(default)]
    overwrite: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
struct Settings {
    name: String,
    #[structparse(default = 2)]
    max_depth: u32,
    #[structparse(default = vec![1, 2])]
    ids: Vec<i64>,
    #[structparse(default = (0, 10))]
    window: (i64, i64),
    #[structparse(default)]
    label: Option<String>,
    output: Output,
}

#[fixture]
fn parser() -> ParserHandle<Settings> {
    ParserHandle::<Settings>::new().expect("analyse Settings")
}

#[fixture]
fn sample() -> Settings {
    Settings {
        name: "scan".into(),
        max_depth: 7,
        ids: vec![3, 4, 5],
        window: (-1, 1),
        label: Some("nightly".into()),
        output: Output {
            out_dir: "target".into(),
            overwrite: true,
        },
    }
}

fn object(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(anyhow!("expected an object, got {other}")),
    }
}

#[rstest]
fn external_dict_uses_hyphenated_keys(
    parser: ParserHandle<Settings>,
    sample: Settings,
) -> Result<()> {
    let external = parser.with_instance(&sample).to_external_dict()?;
    let expected = json!({
        "name": "scan",
        "max-depth": 7,
        "ids": [3, 4, 5],
        "window": [-1, 1],
        "label": "nightly",
        "output": {"out-dir": "target", "overwrite": true},
    });
    ensure!(
        Value::Object(external.clone()) == expected,
        "unexpected external dict {external:?}"
    );
    Ok(())
}

#[rstest]
fn external_dict_round_trips(parser: ParserHandle<Settings>, sample: Settings) -> Result<()> {
    let external = parser.with_instance(&sample).to_external_dict()?;
    let rebuilt = parser.from_dict(&external)?;
    ensure!(rebuilt == sample, "round trip changed the record: {rebuilt:?}");
    Ok(())
}

#[rstest]
fn type_defaults_omit_fields_without_defaults(parser: ParserHandle<Settings>) -> Result<()> {
    let external = parser.to_external_dict();
    ensure!(!external.contains_key("name"), "name has no default");
    ensure!(
        external.get("output") == Some(&json!({"out-dir": "out", "overwrite": false})),
        "unexpected nested defaults {external:?}"
    );
    ensure!(external.get("label") == Some(&Value::Null), "label default missing");
    Ok(())
}

#[rstest]
fn from_dict_layers_over_defaults(parser: ParserHandle<Settings>) -> Result<()> {
    let raw = object(json!({
        "name": "partial",
        "output.out-dir": "elsewhere",
        "unknown": {"ignored": true},
    }))?;
    let built = parser.from_dict(&raw)?;
    ensure!(built.name == "partial", "name not applied");
    ensure!(built.max_depth == 2 && built.window == (0, 10), "defaults lost");
    ensure!(built.output.out_dir == "elsewhere", "dotted key not applied");
    ensure!(!built.output.overwrite, "nested default lost");
    Ok(())
}

#[rstest]
fn from_dict_reports_missing_fields(parser: ParserHandle<Settings>) -> Result<()> {
    let Err(err) = parser.from_dict(&Map::new()) else {
        return Err(anyhow!("name is required"));
    };
    ensure!(
        matches!(err, StructParseError::Construct { .. }),
        "unexpected error {err}"
    );
    Ok(())
}

#[rstest]
#[case::yaml(Format::Yaml)]
#[case::json(Format::Json)]
#[case::toml(Format::Toml)]
fn documents_round_trip(
    parser: ParserHandle<Settings>,
    sample: Settings,
    #[case] format: Format,
) -> Result<()> {
    let bound = parser.with_instance(&sample);
    let text = bound.dump_as(format)?;
    let loaded = parser.load_as(&text, format)?;
    ensure!(loaded == sample, "{} round trip changed the record: {text}", format.name());
    Ok(())
}

#[rstest]
fn yaml_dump_keeps_declaration_order(
    parser: ParserHandle<Settings>,
    sample: Settings,
) -> Result<()> {
    let text = parser.with_instance(&sample).dump()?;
    let keys: Vec<_> = text
        .lines()
        .filter(|line| !line.starts_with([' ', '-']))
        .filter_map(|line| line.split_once(':').map(|(key, _)| key))
        .collect();
    ensure!(
        keys == ["name", "max-depth", "ids", "window", "label", "output"],
        "unexpected key order {keys:?} in {text}"
    );
    Ok(())
}

#[rstest]
fn partial_documents_keep_instance_values(
    parser: ParserHandle<Settings>,
    sample: Settings,
) -> Result<()> {
    let loaded = parser
        .with_instance(&sample)
        .load("max-depth: '9'\noutput:\n  overwrite: false\n")?;
    ensure!(loaded.max_depth == 9, "string scalar not coerced");
    ensure!(!loaded.output.overwrite, "nested value not applied");
    ensure!(loaded.output.out_dir == "target", "instance value lost");
    ensure!(loaded.ids == [3, 4, 5], "instance list lost");
    Ok(())
}

#[rstest]
#[case("", true)]
#[case("---\n", true)]
#[case("- 1\n- 2\n", false)]
fn document_shapes(
    parser: ParserHandle<Settings>,
    sample: Settings,
    #[case] text: &str,
    #[case] accepted: bool,
) -> Result<()> {
    let result = parser.with_instance(&sample).load(text);
    match (result, accepted) {
        (Ok(loaded), true) => ensure!(loaded == sample, "empty document changed values"),
        (Err(StructParseError::Format(_)), false) => {}
        (other, _) => return Err(anyhow!("unexpected outcome {other:?} for {text:?}")),
    }
    Ok(())
}
