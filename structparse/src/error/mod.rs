//! Error types produced while analysing records and parsing arguments.

mod config;
mod conversions;
mod helpers;
mod types;

pub use config::ConfigError;
pub use helpers::is_display_request;
pub use types::{StructParseError, StructParseResult};
