//! Lexical analysis for the command line.
//!
//! The language has no quoting, escaping or operators: a line is a sequence of
//! words separated by runs of whitespace.

/// Splits `line` into whitespace-delimited tokens.
///
/// Leading and trailing whitespace is discarded. An empty or all-whitespace line
/// produces no tokens, which the dispatcher treats as a blank command.
///
/// ```
/// assert_eq!(yash::tokenize("  mks a   b\tc "), vec!["mks", "a", "b", "c"]);
/// assert!(yash::tokenize(" \t ").is_empty());
/// ```
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}
