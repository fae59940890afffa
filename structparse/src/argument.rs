//! Resolved description of a single command-line argument.

use serde_json::Value;

use crate::coerce::Coercer;

/// How many tokens an argument consumes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Arity {
    /// A single token.
    #[default]
    ExactlyOne,
    /// Zero or one token.
    Optional,
    /// Exactly `n` tokens.
    Fixed(usize),
    /// At least one token.
    OneOrMore,
}

impl Arity {
    /// Largest number of tokens accepted, or `None` when unbounded.
    #[must_use]
    pub const fn max_values(self) -> Option<usize> {
        match self {
            Self::ExactlyOne | Self::Optional => Some(1),
            Self::Fixed(n) => Some(n),
            Self::OneOrMore => None,
        }
    }

    /// Whether the parsed result is a sequence rather than a scalar.
    #[must_use]
    pub const fn collects(self) -> bool {
        matches!(self, Self::Fixed(_) | Self::OneOrMore)
    }
}

/// How the argument is presented on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ArgKind {
    /// Takes one or more value tokens.
    #[default]
    Value,
    /// `--flag` sets `true`, `--no-flag` sets `false`.
    BooleanSwitch,
    /// `--flag` sets `true`; absence keeps the default.
    PresenceFlag,
}

/// Everything needed to register one field with the engine.
#[derive(Clone, Debug)]
pub struct ArgumentSpec {
    /// Internal identifier: the dotted field path.
    pub id: String,
    /// Positional name, or long flag followed by any alternate flags.
    pub names: Vec<String>,
    /// Conversion applied to each token; `None` keeps raw strings.
    pub coercion: Option<Coercer>,
    /// Number of tokens consumed.
    pub arity: Arity,
    /// Allowed values after coercion.
    pub choices: Option<Vec<Value>>,
    /// Value used when the argument is absent.
    pub default: Option<Value>,
    /// Placeholder shown in usage and help.
    pub display_name: Option<String>,
    /// Help text.
    pub help: Option<String>,
    /// Whether the argument is positional.
    pub is_positional: bool,
    /// Explicit requiredness; `None` lets the kind decide.
    pub required: Option<bool>,
    /// Presentation of the argument.
    pub kind: ArgKind,
    /// Display form of the declared type.
    pub type_name: String,
}

impl ArgumentSpec {
    /// The primary long flag without leading dashes, if any.
    #[must_use]
    pub fn long_name(&self) -> Option<&str> {
        if self.is_positional {
            return None;
        }
        self.names.first().and_then(|n| n.strip_prefix("--"))
    }

    /// Alternate flags declared for the field.
    pub fn alternate_flags(&self) -> impl Iterator<Item = &str> {
        self.names.iter().skip(1).map(String::as_str)
    }

    /// Whether the engine must see the argument.
    #[must_use]
    pub fn is_required(&self) -> bool {
        match self.required {
            Some(required) => required,
            None => self.is_positional && self.arity != Arity::Optional,
        }
    }
}
