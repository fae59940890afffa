//! `--load-defaults` behaviour.
#![expect(clippy::expect_used, reason = "fixtures fail fast on invalid records")]

use anyhow::{Result, anyhow, ensure};
use clap::error::ErrorKind;
use rstest::{fixture, rstest};
use serde::{Deserialize, Serialize};
use structparse::{ArgEnum, FormatError, ParserHandle, Record, StructParseError};
use test_helpers::{cwd, defaults::DefaultsFile, text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ArgEnum)]
enum Level {
    Low,
    High,
}

/// Tuning knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
struct Tuning {
    #[structparse(default = 0.5)]
    ratio: f64,
    #[structparse(default = Level::Low)]
    level: Level,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
struct Job {
    name: String,
    /// Worker count.
    #[structparse(default = 5)]
    workers: i64,
    #[structparse(default = false)]
    verbose: bool,
    tuning: Tuning,
}

#[fixture]
fn loading() -> ParserHandle<Job> {
    ParserHandle::<Job>::builder()
        .load_defaults_from_file(true)
        .build()
        .expect("analyse Job")
}

fn cli_kind(err: &StructParseError) -> Option<ErrorKind> {
    match err {
        StructParseError::CliParsing(inner) => Some(inner.kind()),
        _ => None,
    }
}

#[rstest]
fn file_values_become_defaults(loading: ParserHandle<Job>) -> Result<()> {
    let file = DefaultsFile::yaml("workers: 9\ntuning:\n  level: High\n  ratio: 0.25\n")?;
    let parsed = loading.try_parse_args(["--load-defaults", file.path().as_str(), "job"])?;
    ensure!(parsed.workers == 9, "workers not loaded: {parsed:?}");
    ensure!(parsed.tuning.level == Level::High, "nested value not loaded");
    ensure!(parsed.tuning.ratio.total_cmp(&0.25).is_eq(), "ratio not loaded");
    Ok(())
}

#[rstest]
fn command_line_beats_the_file(loading: ParserHandle<Job>) -> Result<()> {
    let file = DefaultsFile::yaml("workers: 9\n")?;
    let parsed = loading.try_parse_args(["job", "--workers", "2", &file.flag()])?;
    ensure!(parsed.workers == 2, "command line lost to file: {parsed:?}");
    Ok(())
}

#[rstest]
fn loaded_defaults_last_one_call(loading: ParserHandle<Job>) -> Result<()> {
    let file = DefaultsFile::yaml("workers: 9\n")?;
    let first = loading.try_parse_args([file.flag().as_str(), "job"])?;
    let second = loading.try_parse_args(["job"])?;
    ensure!(first.workers == 9, "file ignored");
    ensure!(second.workers == 5, "file leaked into a later call: {second:?}");
    ensure!(
        loading.format_help().contains("[default: 5]"),
        "static help changed"
    );
    Ok(())
}

#[rstest]
fn help_reflects_loaded_defaults(loading: ParserHandle<Job>) -> Result<()> {
    let file = DefaultsFile::yaml("workers: 42\n")?;
    let Err(StructParseError::CliParsing(err)) =
        loading.try_parse_args([file.flag().as_str(), "--help"])
    else {
        return Err(anyhow!("--help should stop parsing"));
    };
    let help = err.to_string();
    let missing = text::missing(
        &help,
        &[
            "Worker count. [default: 42]",
            "--load-defaults",
            "A YAML, TOML or JSON file path",
        ],
    );
    ensure!(missing.is_empty(), "missing {missing:?} in {help}");
    Ok(())
}

#[rstest]
fn string_scalars_are_coerced(loading: ParserHandle<Job>) -> Result<()> {
    let file = DefaultsFile::yaml("workers: '12'\nverbose: 'yes'\ntuning:\n  level: '2'\n")?;
    let parsed = loading.try_parse_args([file.flag().as_str(), "job"])?;
    ensure!(parsed.workers == 12 && parsed.verbose, "scalars not coerced: {parsed:?}");
    ensure!(parsed.tuning.level == Level::High, "enum value not coerced");
    Ok(())
}

#[rstest]
fn unknown_keys_are_ignored(loading: ParserHandle<Job>) -> Result<()> {
    let file = DefaultsFile::yaml("bogus: 1\nworkers: 3\ntuning:\n  extra: true\n")?;
    let parsed = loading.try_parse_args([file.flag().as_str(), "job"])?;
    ensure!(parsed.workers == 3, "known key lost: {parsed:?}");
    Ok(())
}

#[rstest]
fn toml_and_json_follow_the_extension(loading: ParserHandle<Job>) -> Result<()> {
    let toml = DefaultsFile::named("defaults.toml", "workers = 4\n[tuning]\nlevel = \"High\"\n")?;
    let parsed = loading.try_parse_args([toml.flag().as_str(), "job"])?;
    ensure!(parsed.workers == 4 && parsed.tuning.level == Level::High, "toml ignored");

    let json = DefaultsFile::named("defaults.json", r#"{"workers": 6}"#)?;
    let parsed = loading.try_parse_args([json.flag().as_str(), "job"])?;
    ensure!(parsed.workers == 6, "json ignored");
    Ok(())
}

#[rstest]
fn relative_paths_resolve_from_the_working_directory(loading: ParserHandle<Job>) -> Result<()> {
    let file = DefaultsFile::yaml("workers: 8\n")?;
    let guard = cwd::set_dir(file.dir())?;
    let parsed = loading.try_parse_args(["--load-defaults", "defaults.yaml", "job"]);
    guard.restore()?;
    ensure!(parsed?.workers == 8, "relative path not loaded");
    Ok(())
}

#[rstest]
fn unreadable_file_fails_the_real_parse(loading: ParserHandle<Job>) -> Result<()> {
    let file = DefaultsFile::yaml("workers: 1\n")?;
    let missing = file.dir().join("absent.yaml");
    let Err(err) = loading.try_parse_args(["--load-defaults", missing.as_str(), "job"]) else {
        return Err(anyhow!("a missing defaults file must be reported"));
    };
    ensure!(
        cli_kind(&err) == Some(ErrorKind::ValueValidation),
        "unexpected error {err}"
    );
    ensure!(err.to_string().contains("can't open"), "unexpected message {err}");
    Ok(())
}

#[rstest]
fn flag_without_a_value_fails_the_real_parse(loading: ParserHandle<Job>) -> Result<()> {
    let Err(err) = loading.try_parse_args(["job", "--load-defaults"]) else {
        return Err(anyhow!("a bare --load-defaults must be reported"));
    };
    ensure!(cli_kind(&err).is_some(), "expected a command-line error, got {err}");
    Ok(())
}

#[rstest]
fn malformed_documents_are_reported(loading: ParserHandle<Job>) -> Result<()> {
    let file = DefaultsFile::yaml("workers: [1, 2\n")?;
    let Err(err) = loading.try_parse_args([file.flag().as_str(), "job"]) else {
        return Err(anyhow!("malformed YAML must be reported"));
    };
    ensure!(
        matches!(err, StructParseError::DefaultsFile { .. }),
        "unexpected error {err}"
    );

    let scalar = DefaultsFile::yaml("just text\n")?;
    let Err(StructParseError::DefaultsFile { source, .. }) =
        loading.try_parse_args([scalar.flag().as_str(), "job"])
    else {
        return Err(anyhow!("a scalar document must be reported"));
    };
    ensure!(
        matches!(source, FormatError::NotAMapping { .. }),
        "unexpected source {source}"
    );
    Ok(())
}

#[rstest]
fn flag_is_absent_unless_enabled() -> Result<()> {
    let plain = ParserHandle::<Job>::new()?;
    let file = DefaultsFile::yaml("workers: 9\n")?;
    let Err(err) = plain.try_parse_args([file.flag().as_str(), "job"]) else {
        return Err(anyhow!("--load-defaults should be unknown"));
    };
    ensure!(
        cli_kind(&err) == Some(ErrorKind::UnknownArgument),
        "unexpected error {err}"
    );
    ensure!(!plain.format_help().contains("--load-defaults"), "flag leaked into help");
    Ok(())
}
