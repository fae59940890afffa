//! Discovery of `--load-defaults` before the real parse.
//!
//! Discovery is silent: a malformed flag or an unreadable file leaves the
//! defaults untouched, and the real parse reports the problem instead.

use std::ffi::OsString;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Arg, ArgAction, Command};
use serde_json::{Map, Value};
use tracing::debug;

use super::LOAD_DEFAULTS_FLAG;
use super::tokens::{Grammar, Takes};
use crate::analyze::RecordAnalyzer;
use crate::error::{StructParseError, StructParseResult};
use crate::serialized::{self, Format};

const PROBE_ID: &str = "load_defaults";

/// Find the path given to `--load-defaults`, if any.
pub(crate) fn discover(args: &[OsString]) -> Option<Utf8PathBuf> {
    let mut grammar = Grammar::default();
    grammar.flag(LOAD_DEFAULTS_FLAG, None, Takes::UpTo(1));
    let candidates = grammar.split(args, false).known;
    let probe = Command::new("load-defaults-probe")
        .no_binary_name(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .args_override_self(true)
        .arg(Arg::new(PROBE_ID).long(LOAD_DEFAULTS_FLAG).action(ArgAction::Set))
        .arg(
            Arg::new("rest")
                .num_args(0..)
                .action(ArgAction::Append)
                .allow_hyphen_values(true),
        );
    let matches = match probe.try_get_matches_from(candidates) {
        Ok(matches) => matches,
        Err(err) => {
            debug!(error = %err, "ignoring malformed --load-defaults during discovery");
            return None;
        }
    };
    let path = matches.try_get_one::<String>(PROBE_ID).ok().flatten()?;
    Some(Utf8PathBuf::from(path))
}

/// Read the defaults file at `path`, re-hydrated for `analyzer`.
///
/// Returns `Ok(None)` when the file cannot be read.
///
/// # Errors
///
/// Returns [`StructParseError::DefaultsFile`] when the file is readable but
/// cannot be decoded.
pub(crate) fn load(
    analyzer: &RecordAnalyzer,
    path: &Utf8Path,
) -> StructParseResult<Option<Map<String, Value>>> {
    let text = match serialized::read_text(path) {
        Ok(text) => text,
        Err(err) => {
            debug!(path = %path, error = %err, "defaults file is not readable; ignoring");
            return Ok(None);
        }
    };
    let defaults_error = |source| StructParseError::DefaultsFile {
        path: path.to_owned(),
        source,
    };
    let decoded = serialized::decode(&text, Format::from_path(path)).map_err(defaults_error)?;
    let hydrated =
        serialized::rehydrate(decoded, analyzer.type_map(), "").map_err(defaults_error)?;
    debug!(path = %path, keys = hydrated.len(), "loaded defaults file");
    Ok(Some(hydrated))
}
