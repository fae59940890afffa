//! Partitioning of raw argument vectors.
//!
//! The engine rejects tokens it does not know and expects options before
//! trailing positionals in some arities. The known-args and intermixed parse
//! modes therefore split the vector first: unknown flags and surplus
//! positionals are set aside, and options can be moved ahead of positionals.

use std::collections::HashMap;
use std::ffi::OsString;

use crate::analyze::RecordAnalyzer;
use crate::argument::{ArgKind, Arity};

/// How many value tokens follow a flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Takes {
    Nothing,
    UpTo(usize),
    Unbounded,
}

impl Takes {
    const fn of(kind: ArgKind, arity: Arity) -> Self {
        match (kind, arity.max_values()) {
            (ArgKind::BooleanSwitch | ArgKind::PresenceFlag, _) => Self::Nothing,
            (ArgKind::Value, Some(n)) => Self::UpTo(n),
            (ArgKind::Value, None) => Self::Unbounded,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Role {
    Option,
    Positional,
    Unknown,
    Rest,
    /// Positional tokens after `--` beyond the positional capacity.
    Surplus,
}

#[derive(Clone, Debug)]
struct Segment {
    role: Role,
    tokens: Vec<OsString>,
}

/// The flags and positional capacity of one command.
#[derive(Clone, Debug)]
pub(crate) struct Grammar {
    longs: HashMap<String, Takes>,
    shorts: HashMap<char, Takes>,
    /// `None` once a positional accepts unbounded values.
    positional_capacity: Option<usize>,
}

impl Default for Grammar {
    fn default() -> Self {
        Self {
            longs: HashMap::new(),
            shorts: HashMap::new(),
            positional_capacity: Some(0),
        }
    }
}

/// Tokens routed to the engine and tokens set aside.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Split {
    pub known: Vec<OsString>,
    pub unknown: Vec<OsString>,
}

impl Grammar {
    /// Describe the command generated for `analyzer`.
    pub(crate) fn for_analyzer(analyzer: &RecordAnalyzer, load_defaults: bool) -> Self {
        let mut grammar = Self::default();
        grammar.flag("help", Some('h'), Takes::Nothing);
        if load_defaults {
            grammar.flag(super::LOAD_DEFAULTS_FLAG, None, Takes::UpTo(1));
        }
        for spec in analyzer.arguments() {
            let takes = Takes::of(spec.kind, spec.arity);
            if spec.is_positional {
                grammar.positional(spec.arity);
                continue;
            }
            if let Some(long) = spec.long_name() {
                grammar.flag(long, None, takes);
                if spec.kind == ArgKind::BooleanSwitch {
                    grammar.flag(&format!("no-{long}"), None, Takes::Nothing);
                }
            }
            for alternate in spec.alternate_flags() {
                match alternate.strip_prefix("--") {
                    Some(alias) => grammar.flag(alias, None, takes),
                    None => {
                        if let Some(short) = alternate.chars().nth(1) {
                            grammar.shorts.insert(short, takes);
                        }
                    }
                }
            }
        }
        grammar
    }

    /// Register a long flag and, optionally, a short one.
    pub(crate) fn flag(&mut self, long: &str, short: Option<char>, takes: Takes) {
        self.longs.insert(long.to_owned(), takes);
        if let Some(c) = short {
            self.shorts.insert(c, takes);
        }
    }

    fn positional(&mut self, arity: Arity) {
        self.positional_capacity = match (self.positional_capacity, arity.max_values()) {
            (Some(used), Some(n)) => Some(used + n),
            _ => None,
        };
    }

    /// Look up a flag token, reporting whether it carries an inline value.
    fn lookup(&self, token: &str) -> Option<(Takes, bool)> {
        if let Some(long) = token.strip_prefix("--") {
            let (name, inline) = long
                .split_once('=')
                .map_or((long, false), |(name, _)| (name, true));
            return self.longs.get(name).map(|takes| (*takes, inline));
        }
        let mut chars = token.chars().skip(1);
        let short = chars.next()?;
        let inline = chars.next().is_some();
        self.shorts.get(&short).map(|takes| (*takes, inline))
    }

    fn fits(&self, positionals: usize) -> bool {
        self.positional_capacity
            .is_none_or(|capacity| positionals < capacity)
    }

    fn segments(&self, args: &[OsString]) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut positionals = 0_usize;
        let mut rest = args.iter().enumerate();
        while let Some((idx, token)) = rest.next() {
            let text = token.to_str();
            if text == Some("--") {
                let mut kept = vec![token.clone()];
                let mut surplus = Vec::new();
                for trailing in args.iter().skip(idx + 1) {
                    if self.fits(positionals) {
                        positionals += 1;
                        kept.push(trailing.clone());
                    } else {
                        surplus.push(trailing.clone());
                    }
                }
                segments.push(Segment {
                    role: Role::Rest,
                    tokens: kept,
                });
                if !surplus.is_empty() {
                    segments.push(Segment {
                        role: Role::Surplus,
                        tokens: surplus,
                    });
                }
                break;
            }
            match text.filter(|t| is_flag_like(t)) {
                Some(flag) => {
                    let Some((takes, inline)) = self.lookup(flag) else {
                        segments.push(Segment {
                            role: Role::Unknown,
                            tokens: vec![token.clone()],
                        });
                        continue;
                    };
                    let wanted = if inline { 0 } else { value_count(takes, args.get(idx + 1..)) };
                    let mut tokens = vec![token.clone()];
                    for _ in 0..wanted {
                        if let Some((_, value)) = rest.next() {
                            tokens.push(value.clone());
                        }
                    }
                    segments.push(Segment {
                        role: Role::Option,
                        tokens,
                    });
                }
                None => {
                    let fits = self.fits(positionals);
                    if fits {
                        positionals += 1;
                    }
                    segments.push(Segment {
                        role: if fits { Role::Positional } else { Role::Unknown },
                        tokens: vec![token.clone()],
                    });
                }
            }
        }
        segments
    }

    /// Split `args` into recognised and unrecognised tokens.
    ///
    /// With `intermixed` set, the recognised tokens are also reordered as by
    /// [`Grammar::intermix`].
    pub(crate) fn split(&self, args: &[OsString], intermixed: bool) -> Split {
        let mut split = Split::default();
        for segment in self.segments(args) {
            match segment.role {
                Role::Unknown | Role::Surplus => split.unknown.extend(segment.tokens),
                Role::Option | Role::Positional | Role::Rest => split.known.extend(segment.tokens),
            }
        }
        if intermixed {
            split.known = self.intermix(&split.known);
        }
        split
    }

    /// Reorder `args` so options precede positionals, keeping every token.
    pub(crate) fn intermix(&self, args: &[OsString]) -> Vec<OsString> {
        let mut options = Vec::new();
        let mut positionals = Vec::new();
        let mut trailing = Vec::new();
        for segment in self.segments(args) {
            match segment.role {
                Role::Positional => positionals.extend(segment.tokens),
                Role::Rest => trailing.extend(segment.tokens.into_iter().skip(1)),
                Role::Surplus => trailing.extend(segment.tokens),
                Role::Option | Role::Unknown => options.extend(segment.tokens),
            }
        }
        if !positionals.is_empty() || !trailing.is_empty() {
            options.push(OsString::from("--"));
            options.extend(positionals);
            options.extend(trailing);
        }
        options
    }
}

fn value_count(takes: Takes, following: Option<&[OsString]>) -> usize {
    let limit = match takes {
        Takes::Nothing => return 0,
        Takes::UpTo(n) => n,
        Takes::Unbounded => usize::MAX,
    };
    following.map_or(0, |tokens| {
        tokens
            .iter()
            .take_while(|t| t.to_str().is_none_or(|s| !is_flag_like(s) && s != "--"))
            .take(limit)
            .count()
    })
}

/// Whether a token looks like a flag rather than a value.
///
/// Negative numbers are values.
pub(crate) fn is_flag_like(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-') && token.parse::<f64>().is_err()
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use rstest::{fixture, rstest};

    use super::{Grammar, Takes, is_flag_like};
    use crate::argument::Arity;

    fn args(tokens: &[&str]) -> Vec<OsString> {
        tokens.iter().map(OsString::from).collect()
    }

    #[fixture]
    fn grammar() -> Grammar {
        let mut grammar = Grammar::default();
        grammar.flag("count", Some('c'), Takes::UpTo(1));
        grammar.flag("flag", None, Takes::Nothing);
        grammar.flag("pair", None, Takes::UpTo(2));
        grammar.flag("many", None, Takes::Unbounded);
        grammar.positional(Arity::ExactlyOne);
        grammar
    }

    #[rstest]
    #[case("--x", true)]
    #[case("-x", true)]
    #[case("-5", false)]
    #[case("-1.5", false)]
    #[case("-", false)]
    #[case("value", false)]
    fn recognises_flags(#[case] token: &str, #[case] expected: bool) {
        assert_eq!(is_flag_like(token), expected);
    }

    #[rstest]
    fn unknown_tokens_keep_their_order(grammar: Grammar) {
        let split = grammar.split(
            &args(&["pos", "--fake-arg", "--count", "3", "extra", "--flag", "--other=1"]),
            false,
        );
        assert_eq!(split.known, args(&["pos", "--count", "3", "--flag"]));
        assert_eq!(split.unknown, args(&["--fake-arg", "extra", "--other=1"]));
    }

    #[rstest]
    fn inline_and_short_values_stay_together(grammar: Grammar) {
        let split = grammar.split(&args(&["--count=4", "-c5", "-c", "6", "pos"]), false);
        assert_eq!(split.known, args(&["--count=4", "-c5", "-c", "6", "pos"]));
        assert!(split.unknown.is_empty());
    }

    #[rstest]
    fn bounded_flags_stop_at_their_limit(grammar: Grammar) {
        let split = grammar.split(&args(&["--pair", "1", "2", "pos", "more"]), false);
        assert_eq!(split.known, args(&["--pair", "1", "2", "pos"]));
        assert_eq!(split.unknown, args(&["more"]));
    }

    #[rstest]
    fn unbounded_flags_stop_at_the_next_flag(grammar: Grammar) {
        let split = grammar.split(&args(&["--many", "a", "b", "--flag", "pos"]), false);
        assert_eq!(split.known, args(&["--many", "a", "b", "--flag", "pos"]));
    }

    #[rstest]
    fn negative_numbers_are_values(grammar: Grammar) {
        let split = grammar.split(&args(&["--count", "-3", "-7"]), false);
        assert_eq!(split.known, args(&["--count", "-3", "-7"]));
        assert!(split.unknown.is_empty());
    }

    #[rstest]
    fn surplus_after_the_terminator_is_unknown(grammar: Grammar) {
        let split = grammar.split(&args(&["x", "--", "y", "-z"]), false);
        assert_eq!(split.known, args(&["x", "--"]));
        assert_eq!(split.unknown, args(&["y", "-z"]));
    }

    #[rstest]
    fn the_terminator_fills_remaining_capacity(grammar: Grammar) {
        let split = grammar.split(&args(&["--flag", "--", "-pos", "extra"]), false);
        assert_eq!(split.known, args(&["--flag", "--", "-pos"]));
        assert_eq!(split.unknown, args(&["extra"]));
    }

    #[rstest]
    fn intermixing_keeps_surplus_behind_the_terminator(grammar: Grammar) {
        let reordered = grammar.intermix(&args(&["--", "a", "b"]));
        assert_eq!(reordered, args(&["--", "a", "b"]));
    }

    #[rstest]
    fn intermixing_moves_positionals_last(grammar: Grammar) {
        let reordered = grammar.intermix(&args(&["pos", "--flag", "--count", "2"]));
        assert_eq!(reordered, args(&["--flag", "--count", "2", "--", "pos"]));
    }

    #[rstest]
    fn intermixing_merges_the_terminator(grammar: Grammar) {
        let reordered = grammar.intermix(&args(&["--flag", "--", "-pos"]));
        assert_eq!(reordered, args(&["--flag", "--", "-pos"]));
    }

    #[rstest]
    fn known_intermixed_combines_both(grammar: Grammar) {
        let split = grammar.split(&args(&["pos", "--nope", "--count", "1"]), true);
        assert_eq!(split.known, args(&["--count", "1", "--", "pos"]));
        assert_eq!(split.unknown, args(&["--nope"]));
    }
}
