//! Assembly of the `clap` command for a record.

use std::ffi::OsStr;
use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::builder::{PossibleValue, TypedValueParser};
use clap::error::ErrorKind;
use clap::{Arg, ArgAction, Command};
use serde_json::{Map, Value};

use super::{LOAD_DEFAULTS_FLAG, LOAD_DEFAULTS_HELP, LOAD_DEFAULTS_ID, ParserSettings};
use crate::analyze::{FieldKind, RecordAnalyzer, to_arg_name};
use crate::argument::{ArgKind, ArgumentSpec, Arity};
use crate::coerce::Coercer;
use crate::serialized::read_text;
use crate::types::render_value;

/// Identifier of the `--no-<flag>` half of a boolean switch.
pub(crate) fn negated_id(id: &str) -> String {
    format!("{id}#no")
}

/// Build the command for `analyzer`, displaying `defaults`.
pub(crate) fn build(
    analyzer: &RecordAnalyzer,
    settings: &ParserSettings,
    defaults: &Map<String, Value>,
) -> Command {
    let name = settings
        .name
        .clone()
        .unwrap_or_else(|| analyzer.program_name().to_owned());
    let mut command = Command::new(name).args_override_self(true);
    if let Some(about) = settings
        .about
        .clone()
        .or_else(|| analyzer.description().map(ToOwned::to_owned))
    {
        command = command.about(about);
    }
    if settings.load_defaults {
        command = command.arg(load_defaults_arg());
    }
    add_fields(command, analyzer, defaults, None)
}

fn add_fields(
    mut command: Command,
    analyzer: &RecordAnalyzer,
    defaults: &Map<String, Value>,
    heading: Option<&str>,
) -> Command {
    for field in analyzer.fields() {
        let shown = defaults.get(field.name()).or_else(|| field.default());
        match field.kind() {
            FieldKind::Excluded => {}
            FieldKind::Nested(child) => {
                let child_defaults = shown
                    .and_then(Value::as_object)
                    .cloned()
                    .unwrap_or_default();
                let title = section_title(&to_arg_name(field.path()), child.description());
                command = add_fields(command, child, &child_defaults, Some(&title));
            }
            FieldKind::Argument(spec) => {
                for arg in arguments_for(spec, shown, heading) {
                    command = command.arg(arg);
                }
            }
        }
    }
    command
}

fn section_title(path: &str, description: Option<&str>) -> String {
    match description.and_then(|d| d.lines().next()) {
        Some(first) if !first.trim().is_empty() => {
            format!("{path} ({})", first.trim().trim_end_matches('.'))
        }
        _ => path.to_owned(),
    }
}

fn help_with_default(help: Option<&str>, default: Option<&Value>) -> Option<String> {
    let suffix = default.map(|value| format!("[default: {}]", render_value(value)));
    match (help, suffix) {
        (Some(text), Some(tail)) => Some(format!("{text} {tail}")),
        (Some(text), None) => Some(text.to_owned()),
        (None, tail) => tail,
    }
}

fn arguments_for(spec: &ArgumentSpec, default: Option<&Value>, heading: Option<&str>) -> Vec<Arg> {
    let help = help_with_default(spec.help.as_deref(), default);
    let mut arg = Arg::new(spec.id.clone()).required(spec.is_required());
    if let Some(text) = &help {
        arg = arg.help(text.clone());
    }
    if let Some(title) = heading {
        arg = arg.help_heading(title.to_owned());
    }
    if let Some(long) = spec.long_name() {
        arg = arg.long(long.to_owned());
    }
    for alternate in spec.alternate_flags() {
        arg = match alternate.strip_prefix("--") {
            Some(alias) => arg.visible_alias(alias.to_owned()),
            None => match alternate.chars().nth(1) {
                Some(short) => arg.short(short),
                None => arg,
            },
        };
    }

    match spec.kind {
        ArgKind::Value => vec![value_arg(arg, spec)],
        ArgKind::PresenceFlag => vec![arg.action(ArgAction::SetTrue)],
        ArgKind::BooleanSwitch => {
            let negated = negated_id(&spec.id);
            let positive = arg
                .action(ArgAction::SetTrue)
                .overrides_with(negated.clone());
            let mut negative = Arg::new(negated)
                .action(ArgAction::SetTrue)
                .overrides_with(spec.id.clone())
                .help(format!("Disable --{}", spec.long_name().unwrap_or_default()));
            if let Some(long) = spec.long_name() {
                negative = negative.long(format!("no-{long}"));
            }
            if let Some(title) = heading {
                negative = negative.help_heading(title.to_owned());
            }
            vec![positive, negative]
        }
    }
}

fn value_arg(arg: Arg, spec: &ArgumentSpec) -> Arg {
    let placeholder = spec.display_name.clone().unwrap_or_else(|| {
        let base = spec
            .long_name()
            .map_or_else(|| spec.names.first().cloned().unwrap_or_default(), ToOwned::to_owned);
        if spec.is_positional {
            base
        } else {
            base.replace(['.', '-'], "_").to_uppercase()
        }
    });
    let with_arity = match spec.arity {
        Arity::ExactlyOne => arg.num_args(1).value_name(placeholder),
        Arity::Optional => arg.num_args(0..=1).value_name(placeholder),
        Arity::Fixed(n) => arg
            .num_args(n)
            .value_names(std::iter::repeat_n(placeholder, n)),
        Arity::OneOrMore => arg.num_args(1..).value_name(placeholder),
    };
    with_arity
        .action(ArgAction::Set)
        .allow_negative_numbers(true)
        .value_parser(ValueCoercion {
            coercion: spec.coercion.clone(),
            choices: spec.choices.clone().map(Arc::from),
        })
}

fn load_defaults_arg() -> Arg {
    Arg::new(LOAD_DEFAULTS_ID)
        .long(LOAD_DEFAULTS_FLAG)
        .value_name("PATH")
        .num_args(1)
        .action(ArgAction::Set)
        .help(LOAD_DEFAULTS_HELP)
        .value_parser(ReadablePath)
}

/// Converts tokens with a field's coercion and checks its choices.
#[derive(Clone, Debug)]
pub(crate) struct ValueCoercion {
    coercion: Option<Coercer>,
    choices: Option<Arc<[Value]>>,
}

fn describe_arg(arg: Option<&Arg>) -> String {
    arg.map_or_else(|| "...".to_owned(), ToString::to_string)
}

impl TypedValueParser for ValueCoercion {
    type Value = Value;

    fn parse_ref(
        &self,
        cmd: &Command,
        arg: Option<&Arg>,
        value: &OsStr,
    ) -> Result<Self::Value, clap::Error> {
        let text = value
            .to_str()
            .ok_or_else(|| clap::Error::new(ErrorKind::InvalidUtf8).with_cmd(cmd))?;
        let coerced = match &self.coercion {
            Some(coercer) => coercer.coerce(text).map_err(|err| {
                clap::Error::raw(
                    ErrorKind::ValueValidation,
                    format!("invalid value '{text}' for '{}': {err}", describe_arg(arg)),
                )
                .with_cmd(cmd)
            })?,
            None => Value::String(text.to_owned()),
        };
        if let Some(choices) = &self.choices
            && !choices.contains(&coerced)
        {
            let allowed: Vec<String> = choices.iter().map(render_value).collect();
            return Err(clap::Error::raw(
                ErrorKind::InvalidValue,
                format!(
                    "invalid choice '{text}' for '{}' (choose from {})",
                    describe_arg(arg),
                    allowed.join(", ")
                ),
            )
            .with_cmd(cmd));
        }
        Ok(coerced)
    }

    fn possible_values(&self) -> Option<Box<dyn Iterator<Item = PossibleValue> + '_>> {
        let choices = self.choices.as_ref()?;
        Some(Box::new(
            choices.iter().map(|c| PossibleValue::new(render_value(c))),
        ))
    }
}

/// Accepts only paths that can be read.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ReadablePath;

impl TypedValueParser for ReadablePath {
    type Value = Utf8PathBuf;

    fn parse_ref(
        &self,
        cmd: &Command,
        _arg: Option<&Arg>,
        value: &OsStr,
    ) -> Result<Self::Value, clap::Error> {
        let text = value
            .to_str()
            .ok_or_else(|| clap::Error::new(ErrorKind::InvalidUtf8).with_cmd(cmd))?;
        let path = Utf8PathBuf::from(text);
        read_text(&path).map_err(|err| {
            clap::Error::raw(
                ErrorKind::ValueValidation,
                format!("argument --{LOAD_DEFAULTS_FLAG}: can't open '{path}': {err}"),
            )
            .with_cmd(cmd)
        })?;
        Ok(path)
    }
}
