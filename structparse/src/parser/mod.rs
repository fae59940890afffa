//! Parsers generated from records.
//!
//! [`ParserHandle`] owns the analysis of a record type and a cached
//! `clap` command. Methods on the handle use the record type's defaults;
//! [`ParserHandle::with_instance`] returns a [`BoundParser`] whose methods use
//! an existing value's fields as defaults instead.

mod command;
mod namespace;
mod prescan;
mod tokens;

use std::ffi::OsString;
use std::io::Write;
use std::marker::PhantomData;

use clap::Command;
use serde_json::{Map, Value};
use tracing::debug;

use crate::Record;
use crate::analyze::{RecordAnalyzer, to_external_dict};
use crate::error::{ConfigError, StructParseError, StructParseResult};
use crate::schema::FieldOverrides;
use crate::serialized::{self, Format};

pub use namespace::{Lookup, Namespace};

use tokens::Grammar;

/// Long flag naming a defaults file.
pub const LOAD_DEFAULTS_FLAG: &str = "load-defaults";
const LOAD_DEFAULTS_ID: &str = "load_defaults";
const LOAD_DEFAULTS_HELP: &str = "A YAML, TOML or JSON file path that overrides the default values.";

/// How unknown tokens and interleaved positionals are treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ParseMode {
    /// Every token must be recognised.
    #[default]
    Strict,
    /// Options may appear between positional values.
    Intermixed,
    /// Unrecognised tokens are returned instead of rejected.
    Known,
    /// Both [`ParseMode::Intermixed`] and [`ParseMode::Known`].
    KnownIntermixed,
}

/// Settings applied when building a [`ParserHandle`].
#[derive(Clone, Debug, PartialEq)]
pub struct ParserSettings {
    pub(crate) name: Option<String>,
    pub(crate) about: Option<String>,
    pub(crate) load_defaults: bool,
    pub(crate) negatable_booleans: bool,
    pub(crate) arg_defaults: FieldOverrides,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            name: None,
            about: None,
            load_defaults: false,
            negatable_booleans: true,
            arg_defaults: FieldOverrides::default(),
        }
    }
}

impl ParserSettings {
    /// Whether `--load-defaults` is accepted.
    #[must_use]
    pub const fn load_defaults(&self) -> bool {
        self.load_defaults
    }

    /// Whether booleans get a `--no-` counterpart.
    #[must_use]
    pub const fn negatable_booleans(&self) -> bool {
        self.negatable_booleans
    }
}

/// Builder for [`ParserHandle`].
#[derive(Clone, Debug)]
pub struct ParserBuilder<T> {
    settings: ParserSettings,
    marker: PhantomData<fn() -> T>,
}

impl<T: Record> ParserBuilder<T> {
    /// Override the program name shown in usage lines.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.settings.name = Some(name.into());
        self
    }

    /// Override the description shown in help.
    #[must_use]
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.settings.about = Some(about.into());
        self
    }

    /// Accept `--load-defaults PATH` to read defaults from a file.
    #[must_use]
    pub const fn load_defaults_from_file(mut self, enabled: bool) -> Self {
        self.settings.load_defaults = enabled;
        self
    }

    /// Choose between `--flag/--no-flag` switches and presence-only flags.
    #[must_use]
    pub const fn negatable_booleans(mut self, enabled: bool) -> Self {
        self.settings.negatable_booleans = enabled;
        self
    }

    /// Settings applied to every field that does not set them itself.
    #[must_use]
    pub fn arg_defaults(mut self, overrides: FieldOverrides) -> Self {
        self.settings.arg_defaults = overrides;
        self
    }

    /// Analyse the record and build the parser.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the record cannot be expressed as a
    /// command line.
    pub fn build(self) -> Result<ParserHandle<T>, ConfigError> {
        let schema = T::schema();
        let analyzer = RecordAnalyzer::new(
            &schema,
            &self.settings.arg_defaults,
            self.settings.negatable_booleans,
        )?;
        if self.settings.load_defaults
            && let Some(field) = analyzer.field(LOAD_DEFAULTS_ID)
        {
            return Err(ConfigError::ReservedName {
                field: field.name().to_owned(),
                name: LOAD_DEFAULTS_FLAG.to_owned(),
            });
        }
        let command = command::build(&analyzer, &self.settings, analyzer.default_snapshot());
        let grammar = Grammar::for_analyzer(&analyzer, self.settings.load_defaults);
        Ok(ParserHandle {
            analyzer,
            settings: self.settings,
            command,
            grammar,
            marker: PhantomData,
        })
    }
}

/// A command-line parser for the record type `T`.
#[derive(Clone, Debug)]
pub struct ParserHandle<T> {
    analyzer: RecordAnalyzer,
    settings: ParserSettings,
    command: Command,
    grammar: Grammar,
    marker: PhantomData<fn() -> T>,
}

impl<T: Record> ParserHandle<T> {
    /// Build a parser with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the record cannot be expressed as a
    /// command line.
    pub fn new() -> Result<Self, ConfigError> {
        Self::builder().build()
    }

    /// Start building a parser with custom settings.
    #[must_use]
    pub fn builder() -> ParserBuilder<T> {
        ParserBuilder {
            settings: ParserSettings::default(),
            marker: PhantomData,
        }
    }

    /// The record analysis.
    #[must_use]
    pub const fn analyzer(&self) -> &RecordAnalyzer {
        &self.analyzer
    }

    /// The settings the parser was built with.
    #[must_use]
    pub const fn settings(&self) -> &ParserSettings {
        &self.settings
    }

    /// Use `instance`'s field values as defaults.
    #[must_use]
    pub const fn with_instance<'a>(&'a self, instance: &'a T) -> BoundParser<'a, T> {
        BoundParser {
            handle: self,
            instance: Some(instance),
        }
    }

    const fn unbound(&self) -> BoundParser<'_, T> {
        BoundParser {
            handle: self,
            instance: None,
        }
    }

    /// The record type's defaults; fields without one are absent.
    #[must_use]
    pub fn snapshot(&self) -> Map<String, Value> {
        self.analyzer.default_snapshot().clone()
    }

    /// The record type's defaults with external key spelling.
    #[must_use]
    pub fn to_external_dict(&self) -> Map<String, Value> {
        to_external_dict(self.analyzer.default_snapshot())
    }

    /// Build a record from `raw` over the type's defaults.
    ///
    /// # Errors
    ///
    /// Returns [`StructParseError::Construct`] when required fields are
    /// missing or values have the wrong shape.
    pub fn from_dict(&self, raw: &Map<String, Value>) -> StructParseResult<T> {
        self.unbound().from_dict(raw)
    }

    /// Serialise the type's defaults as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`StructParseError::Format`] when encoding fails.
    pub fn dump(&self) -> StructParseResult<String> {
        self.unbound().dump()
    }

    /// Serialise the type's defaults in `format`.
    ///
    /// # Errors
    ///
    /// Returns [`StructParseError::Format`] when encoding fails.
    pub fn dump_as(&self, format: Format) -> StructParseResult<String> {
        self.unbound().dump_as(format)
    }

    /// Build a record from a YAML document over the type's defaults.
    ///
    /// # Errors
    ///
    /// Returns [`StructParseError::Format`] for malformed documents and
    /// [`StructParseError::Construct`] when the result is not a valid record.
    pub fn load(&self, text: &str) -> StructParseResult<T> {
        self.unbound().load(text)
    }

    /// Build a record from a document in `format` over the type's defaults.
    ///
    /// # Errors
    ///
    /// As for [`ParserHandle::load`].
    pub fn load_as(&self, text: &str, format: Format) -> StructParseResult<T> {
        self.unbound().load_as(text, format)
    }

    /// The command used for parsing with the type's defaults.
    #[must_use]
    pub fn command(&self) -> Command {
        self.command.clone()
    }

    /// Rendered help text.
    #[must_use]
    pub fn format_help(&self) -> String {
        self.command().render_help().to_string()
    }

    /// Rendered usage line.
    #[must_use]
    pub fn format_usage(&self) -> String {
        self.command().render_usage().to_string()
    }

    /// Write help text to `out`.
    ///
    /// # Errors
    ///
    /// Returns any error from writing to `out`.
    pub fn print_help(&self, out: &mut impl Write) -> std::io::Result<()> {
        out.write_all(self.format_help().as_bytes())
    }

    /// Write the usage line to `out`.
    ///
    /// # Errors
    ///
    /// Returns any error from writing to `out`.
    pub fn print_usage(&self, out: &mut impl Write) -> std::io::Result<()> {
        writeln!(out, "{}", self.format_usage())
    }

    /// Parse `args`, which exclude the program name.
    ///
    /// # Errors
    ///
    /// Returns [`StructParseError::CliParsing`] for invalid arguments
    /// (including `--help`), [`StructParseError::DefaultsFile`] for a
    /// malformed defaults file, and [`StructParseError::Construct`] when the
    /// parsed values do not form a valid record.
    pub fn try_parse_args<I, S>(&self, args: I) -> StructParseResult<T>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.unbound().try_parse_args(args)
    }

    /// Parse `args`, allowing options between positional values.
    ///
    /// # Errors
    ///
    /// As for [`ParserHandle::try_parse_args`].
    pub fn try_parse_intermixed_args<I, S>(&self, args: I) -> StructParseResult<T>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.unbound().try_parse_intermixed_args(args)
    }

    /// Parse `args`, returning unrecognised tokens in their original order.
    ///
    /// # Errors
    ///
    /// As for [`ParserHandle::try_parse_args`].
    pub fn try_parse_known_args<I, S>(&self, args: I) -> StructParseResult<(T, Vec<OsString>)>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.unbound().try_parse_known_args(args)
    }

    /// Intermixed parse that also returns unrecognised tokens.
    ///
    /// # Errors
    ///
    /// As for [`ParserHandle::try_parse_args`].
    pub fn try_parse_known_intermixed_args<I, S>(
        &self,
        args: I,
    ) -> StructParseResult<(T, Vec<OsString>)>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.unbound().try_parse_known_intermixed_args(args)
    }

    /// Parse `args`, exiting the process on command-line errors.
    ///
    /// # Errors
    ///
    /// Returns errors that are not command-line errors, such as a malformed
    /// defaults file.
    pub fn parse_args<I, S>(&self, args: I) -> StructParseResult<T>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.unbound().parse_args(args)
    }

    /// Parse the process arguments, exiting on command-line errors.
    ///
    /// # Errors
    ///
    /// As for [`ParserHandle::parse_args`].
    pub fn parse_env_args(&self) -> StructParseResult<T> {
        self.unbound().parse_env_args()
    }
}

/// A parser view whose defaults come from an existing record value.
#[derive(Clone, Copy, Debug)]
pub struct BoundParser<'a, T> {
    handle: &'a ParserHandle<T>,
    instance: Option<&'a T>,
}

impl<T: Record> BoundParser<'_, T> {
    /// Defaults in force: the instance's fields, or the type's defaults.
    ///
    /// # Errors
    ///
    /// Returns [`StructParseError::Snapshot`] when the instance cannot be
    /// captured.
    pub fn snapshot(&self) -> StructParseResult<Map<String, Value>> {
        match self.instance {
            Some(instance) => self.handle.analyzer.snapshot(instance),
            None => Ok(self.handle.analyzer.default_snapshot().clone()),
        }
    }

    /// [`BoundParser::snapshot`] with external key spelling.
    ///
    /// # Errors
    ///
    /// As for [`BoundParser::snapshot`].
    pub fn to_external_dict(&self) -> StructParseResult<Map<String, Value>> {
        Ok(to_external_dict(&self.snapshot()?))
    }

    /// Build a record from `raw` over the defaults in force.
    ///
    /// # Errors
    ///
    /// Returns [`StructParseError::Construct`] when the merged values do not
    /// form a valid record.
    pub fn from_dict(&self, raw: &Map<String, Value>) -> StructParseResult<T> {
        self.handle.analyzer.construct(&self.snapshot()?, raw)
    }

    /// Serialise the defaults in force as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`StructParseError::Format`] when encoding fails.
    pub fn dump(&self) -> StructParseResult<String> {
        self.dump_as(Format::Yaml)
    }

    /// Serialise the defaults in force in `format`.
    ///
    /// # Errors
    ///
    /// Returns [`StructParseError::Format`] when encoding fails.
    pub fn dump_as(&self, format: Format) -> StructParseResult<String> {
        Ok(serialized::encode(&self.to_external_dict()?, format)?)
    }

    /// Build a record from a YAML document over the defaults in force.
    ///
    /// # Errors
    ///
    /// Returns [`StructParseError::Format`] for malformed documents and
    /// [`StructParseError::Construct`] when the result is not a valid record.
    pub fn load(&self, text: &str) -> StructParseResult<T> {
        self.load_as(text, Format::Yaml)
    }

    /// Build a record from a document in `format` over the defaults in force.
    ///
    /// # Errors
    ///
    /// As for [`BoundParser::load`].
    pub fn load_as(&self, text: &str, format: Format) -> StructParseResult<T> {
        let analyzer = &self.handle.analyzer;
        let decoded = serialized::decode(text, format)?;
        let hydrated = serialized::rehydrate(decoded, analyzer.type_map(), "")?;
        analyzer.construct(&self.snapshot()?, &hydrated)
    }

    /// The command showing the defaults in force.
    ///
    /// # Errors
    ///
    /// As for [`BoundParser::snapshot`].
    pub fn command(&self) -> StructParseResult<Command> {
        if self.instance.is_none() {
            return Ok(self.handle.command());
        }
        let defaults = self.snapshot()?;
        Ok(command::build(
            &self.handle.analyzer,
            &self.handle.settings,
            &defaults,
        ))
    }

    /// Rendered help text.
    ///
    /// # Errors
    ///
    /// As for [`BoundParser::snapshot`].
    pub fn format_help(&self) -> StructParseResult<String> {
        Ok(self.command()?.render_help().to_string())
    }

    /// Rendered usage line.
    ///
    /// # Errors
    ///
    /// As for [`BoundParser::snapshot`].
    pub fn format_usage(&self) -> StructParseResult<String> {
        Ok(self.command()?.render_usage().to_string())
    }

    /// Write help text to `out`.
    ///
    /// # Errors
    ///
    /// As for [`BoundParser::snapshot`]; write failures are reported as
    /// [`StructParseError::Io`].
    pub fn print_help(&self, out: &mut impl Write) -> StructParseResult<()> {
        let help = self.format_help()?;
        out.write_all(help.as_bytes())?;
        Ok(())
    }

    /// Write the usage line to `out`.
    ///
    /// # Errors
    ///
    /// As for [`BoundParser::print_help`].
    pub fn print_usage(&self, out: &mut impl Write) -> StructParseResult<()> {
        let usage = self.format_usage()?;
        writeln!(out, "{usage}")?;
        Ok(())
    }

    /// Parse `args`, which exclude the program name.
    ///
    /// # Errors
    ///
    /// As for [`ParserHandle::try_parse_args`].
    pub fn try_parse_args<I, S>(&self, args: I) -> StructParseResult<T>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.run(ParseMode::Strict, collect(args)).map(|(record, _)| record)
    }

    /// Parse `args`, allowing options between positional values.
    ///
    /// # Errors
    ///
    /// As for [`ParserHandle::try_parse_args`].
    pub fn try_parse_intermixed_args<I, S>(&self, args: I) -> StructParseResult<T>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.run(ParseMode::Intermixed, collect(args))
            .map(|(record, _)| record)
    }

    /// Parse `args`, returning unrecognised tokens in their original order.
    ///
    /// # Errors
    ///
    /// As for [`ParserHandle::try_parse_args`].
    pub fn try_parse_known_args<I, S>(&self, args: I) -> StructParseResult<(T, Vec<OsString>)>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.run(ParseMode::Known, collect(args))
    }

    /// Intermixed parse that also returns unrecognised tokens.
    ///
    /// # Errors
    ///
    /// As for [`ParserHandle::try_parse_args`].
    pub fn try_parse_known_intermixed_args<I, S>(
        &self,
        args: I,
    ) -> StructParseResult<(T, Vec<OsString>)>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.run(ParseMode::KnownIntermixed, collect(args))
    }

    /// Parse `args`, exiting the process on command-line errors.
    ///
    /// # Errors
    ///
    /// Returns errors that are not command-line errors, such as a malformed
    /// defaults file.
    pub fn parse_args<I, S>(&self, args: I) -> StructParseResult<T>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        match self.try_parse_args(args) {
            Err(StructParseError::CliParsing(err)) => err.exit(),
            other => other,
        }
    }

    /// Parse the process arguments, exiting on command-line errors.
    ///
    /// # Errors
    ///
    /// As for [`BoundParser::parse_args`].
    pub fn parse_env_args(&self) -> StructParseResult<T> {
        self.parse_args(std::env::args_os().skip(1))
    }

    /// Parse `args` in `mode`, returning the record and any set-aside tokens.
    ///
    /// # Errors
    ///
    /// As for [`ParserHandle::try_parse_args`].
    pub fn run(&self, mode: ParseMode, args: Vec<OsString>) -> StructParseResult<(T, Vec<OsString>)> {
        let handle = self.handle;
        let analyzer = &handle.analyzer;
        let mut defaults = self.snapshot()?;
        let mut overridden = self.instance.is_some();
        if handle.settings.load_defaults
            && let Some(path) = prescan::discover(&args)
            && let Some(loaded) = prescan::load(analyzer, &path)?
        {
            defaults = analyzer.project(&defaults, &loaded);
            overridden = true;
        }
        let command = if overridden {
            command::build(analyzer, &handle.settings, &defaults)
        } else {
            handle.command()
        };

        let (argv, unknown) = match mode {
            ParseMode::Strict => (args, Vec::new()),
            ParseMode::Intermixed => (handle.grammar.intermix(&args), Vec::new()),
            ParseMode::Known | ParseMode::KnownIntermixed => {
                let split = handle
                    .grammar
                    .split(&args, mode == ParseMode::KnownIntermixed);
                (split.known, split.unknown)
            }
        };
        debug!(
            record = %analyzer.name(),
            ?mode,
            tokens = argv.len(),
            unknown = unknown.len(),
            "parsing arguments"
        );

        let matches = command
            .no_binary_name(true)
            .try_get_matches_from(argv)?;
        let namespace = Namespace::from_matches(analyzer, &matches)?;
        let record = analyzer.construct(&defaults, namespace.supplied())?;
        Ok((record, unknown))
    }
}

fn collect<I, S>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    args.into_iter().map(Into::into).collect()
}
