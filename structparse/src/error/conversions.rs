//! Conversions from external error types into `StructParseError`.

use super::StructParseError;

impl From<clap::Error> for StructParseError {
    fn from(e: clap::Error) -> Self {
        Self::CliParsing(e.into())
    }
}
