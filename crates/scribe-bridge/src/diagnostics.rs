//! Pulling line numbers out of compiler diagnostics.

use regex::Regex;
use scribe_buffer::ErrorLineSet;
use std::sync::LazyLock;

// ASCII digits only; `\d` would also accept other scripts' digits
static LINE_NUMBER: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r":([0-9]+):").ok());

/// Yields every number written as `:N:` in the line, left to right.
///
/// Matches do not overlap, so `a:1:2:` yields only `1`. Numbers too large
/// for `usize` are skipped.
pub fn extract_line_numbers(line: &str) -> impl Iterator<Item = usize> + '_ {
    LINE_NUMBER
        .as_ref()
        .into_iter()
        .flat_map(move |rx| rx.captures_iter(line))
        .filter_map(|caps| caps.get(1)?.as_str().parse().ok())
}

/// Adds the line numbers of a diagnostic to the set. Returns how many were new.
pub fn record_diagnostic(errors: &mut ErrorLineSet, line: &str) -> usize {
    extract_line_numbers(line)
        .filter(|&n| errors.insert(n))
        .count()
}
