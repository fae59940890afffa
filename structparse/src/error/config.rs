//! Errors raised while analysing a record declaration.

use thiserror::Error;

/// A record declaration that cannot be turned into a parser.
///
/// These are reported when a [`crate::RecordAnalyzer`] or
/// [`crate::ParserHandle`] is constructed, never during parsing.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// The analyzer was handed a type that is not a record.
    #[error("cannot analyse non-record type '{ty}'")]
    NotARecord {
        /// Display name of the offending type.
        ty: String,
    },

    /// A positional field was given an alternate flag.
    #[error("positional field '{field}' cannot have the flag '{flag}'")]
    PositionalWithFlag {
        /// Dotted field path.
        field: String,
        /// The rejected flag spelling.
        flag: String,
    },

    /// A nested record field was marked positional.
    #[error("nested record field '{field}' cannot be positional")]
    NestedPositional {
        /// Dotted field path.
        field: String,
    },

    /// A nested record field was given an alternate flag.
    #[error("nested record field '{field}' cannot have the flag '{flag}'")]
    NestedWithFlag {
        /// Dotted field path.
        field: String,
        /// The rejected flag spelling.
        flag: String,
    },

    /// A sequence element cannot be read from a single token.
    #[error("field '{field}' has element type '{ty}' that cannot be read from one token")]
    UnresolvableElement {
        /// Dotted field path.
        field: String,
        /// Display name of the element type.
        ty: String,
    },

    /// The declared type has no command-line representation.
    #[error("field '{field}' has unsupported type '{ty}'")]
    UnsupportedType {
        /// Dotted field path.
        field: String,
        /// Display name of the type.
        ty: String,
    },

    /// A record contains itself through a chain of nested fields.
    #[error("record '{record}' contains itself through '{field}'")]
    RecursiveRecord {
        /// Name of the record that recurs.
        record: String,
        /// Dotted path of the field closing the cycle.
        field: String,
    },

    /// A declared default could not be converted into a value.
    #[error("default for field '{field}' is not representable: {message}")]
    InvalidDefault {
        /// Dotted field path.
        field: String,
        /// Serialisation failure message.
        message: String,
    },

    /// Two fields of one record share a name.
    #[error("record '{record}' declares field '{field}' more than once")]
    DuplicateField {
        /// Name of the record.
        record: String,
        /// The repeated field name.
        field: String,
    },

    /// A field name contains `.`, which separates nested field paths.
    #[error("field '{field}' of record '{record}' must not contain '.'")]
    DottedFieldName {
        /// Name of the record.
        record: String,
        /// The rejected field name.
        field: String,
    },

    /// A field collides with a name the parser reserves.
    #[error("field '{field}' collides with the reserved '--{name}' flag")]
    ReservedName {
        /// Field name.
        field: String,
        /// Reserved external name.
        name: String,
    },

    /// An alternate flag is neither `-x` nor `--name`.
    #[error("flag '{flag}' of field '{field}' must look like '-x' or '--name'")]
    InvalidFlag {
        /// Dotted field path.
        field: String,
        /// The rejected flag spelling.
        flag: String,
    },

    /// An optional positional is followed by a required one.
    #[error("optional positional field '{optional}' cannot precede the required positional '{required}'")]
    OptionalBeforeRequired {
        /// Dotted path of the optional positional.
        optional: String,
        /// Dotted path of the required positional after it.
        required: String,
    },

    /// A positional taking several tokens leaves the split of later tokens
    /// undecidable.
    #[error("positional field '{field}' takes several tokens, so '{next}' cannot follow it")]
    VariadicPositional {
        /// Dotted path of the multi-token positional.
        field: String,
        /// Dotted path of the positional after it.
        next: String,
    },

    /// Type resolution did not settle within the iteration bound.
    #[error("type of field '{field}' did not settle after {limit} resolution steps")]
    ResolutionLimit {
        /// Dotted field path.
        field: String,
        /// Iteration bound that was reached.
        limit: usize,
    },
}
