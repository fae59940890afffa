//! Primary error enum for parsing and round-trip flows.

use camino::Utf8PathBuf;
use thiserror::Error;

use super::ConfigError;
use crate::serialized::FormatError;

/// Errors that can occur while building parsers or materialising records.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StructParseError {
    /// The record declaration cannot be turned into a parser.
    #[error("Invalid record declaration: {0}")]
    Config(#[from] ConfigError),

    /// Error parsing command-line arguments.
    #[error("Failed to parse command-line arguments: {0}")]
    CliParsing(#[from] Box<clap::Error>),

    /// Parsed values could not be converted into the record.
    #[error("Failed to build '{record}' from parsed values: {source}")]
    Construct {
        /// Name of the record being constructed.
        record: String,
        /// Deserialisation failure reported by `serde_json`.
        #[source]
        source: serde_json::Error,
    },

    /// A record instance could not be captured as a mapping.
    #[error("Failed to snapshot '{record}': {source}")]
    Snapshot {
        /// Name of the record being captured.
        record: String,
        /// Serialisation failure reported by `serde_json`.
        #[source]
        source: serde_json::Error,
    },

    /// Encoding or decoding a serialized document failed.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The file named by `--load-defaults` was readable but malformed.
    #[error("Defaults file error in '{path}': {source}")]
    DefaultsFile {
        /// Path of the defaults file.
        path: Utf8PathBuf,
        /// Underlying decoding failure.
        #[source]
        source: FormatError,
    },

    /// Writing help or usage output failed.
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    /// Matched values could not be read back from the engine.
    #[error("Failed to read parsed value for '{id}': {source}")]
    Matches {
        /// Internal argument identifier.
        id: String,
        /// Underlying engine failure.
        #[source]
        source: clap::parser::MatchesError,
    },
}

/// Result alias used throughout the crate.
pub type StructParseResult<T> = Result<T, StructParseError>;
