//! Help text normalisation for assertions.
//!
//! `clap` wraps help to the terminal width, so the same option may render on
//! one line or several. Comparing collapsed text keeps tests stable.

/// Collapses every run of whitespace into a single space.
#[must_use]
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns the needles that do not occur in `haystack` after collapsing
/// whitespace in both.
#[must_use]
pub fn missing<'a>(haystack: &str, needles: &[&'a str]) -> Vec<&'a str> {
    let collapsed = collapse_whitespace(haystack);
    needles
        .iter()
        .copied()
        .filter(|needle| !collapsed.contains(&collapse_whitespace(needle)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{collapse_whitespace, missing};

    #[test]
    fn collapse_whitespace_joins_wrapped_lines() {
        assert_eq!(
            collapse_whitespace("  --count <COUNT>\n          How many  times"),
            "--count <COUNT> How many times"
        );
    }

    #[test]
    fn missing_reports_absent_needles_only() {
        let help = "Options:\n  --name <NAME>\n      Who to\n      greet.";
        assert_eq!(missing(help, &["Who to greet.", "--age"]), vec!["--age"]);
    }
}
