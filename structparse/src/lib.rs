//! Declarative command-line parsers derived from plain Rust structs.
//!
//! A [`Record`] describes its fields through a [`RecordSchema`]; the
//! companion `structparse_macros` crate derives the schema from the struct
//! definition, its `#[structparse(...)]` attributes and its doc comments.
//! [`ParserHandle`] turns the schema into a `clap` command and converts parsed
//! arguments, plain mappings, and YAML/TOML/JSON documents back into the
//! record.
//!
//! ```rust,no_run
//! use serde::{Deserialize, Serialize};
//! use structparse::{ArgEnum, ParserHandle, Record};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ArgEnum)]
//! enum Mode {
//!     Fast,
//!     Thorough,
//! }
//!
//! /// Scan a directory tree.
//! #[derive(Debug, Serialize, Deserialize, Record)]
//! struct Scan {
//!     /// Directory to scan.
//!     root: String,
//!     /// Number of worker threads.
//!     #[structparse(default = 4, flag = "-j")]
//!     jobs: u16,
//!     #[structparse(default = Mode::Fast)]
//!     mode: Mode,
//! }
//!
//! # fn main() -> Result<(), structparse::StructParseError> {
//! let parser = ParserHandle::<Scan>::new()?;
//! let scan = parser.parse_env_args()?;
//! println!("{scan:?}");
//! # Ok(())
//! # }
//! ```

extern crate self as structparse;

pub use structparse_macros::{ArgEnum, Record};

mod analyze;
mod argument;
mod coerce;
mod error;
mod merge;
mod parser;
mod resolve;
mod schema;
mod serialized;
mod types;

pub use analyze::{
    FieldDescriptor, FieldKind, RecordAnalyzer, TypeMap, to_arg_name, to_external_dict,
    to_var_name,
};
pub use argument::{ArgKind, ArgumentSpec, Arity};
pub use coerce::{Coercer, CoercionError};
pub use error::{ConfigError, StructParseError, StructParseResult, is_display_request};
pub use merge::merge_value;
pub use parser::{
    BoundParser, LOAD_DEFAULTS_FLAG, Lookup, Namespace, ParseMode, ParserBuilder, ParserHandle,
    ParserSettings,
};
pub use schema::{FieldOverrides, FieldSchema, RecordSchema};
pub use serialized::{Format, FormatError};
pub use types::{
    ArgType, CustomType, DeclaredType, EnumMember, EnumType, Primitive, RecordRef,
    SequenceKind, SequenceType, render_value,
};

/// A struct whose fields can be exposed as command-line arguments.
///
/// Implementations are normally generated with `#[derive(Record)]`. Values
/// travel through `serde_json::Value`, so the record must serialise to a map
/// keyed by its field names.
pub trait Record: serde::Serialize + serde::de::DeserializeOwned + 'static {
    /// Describe the record's fields, defaults and documentation.
    fn schema() -> RecordSchema;
}

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}
