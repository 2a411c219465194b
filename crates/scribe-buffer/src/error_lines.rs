//! The set of source lines implicated by the current compile run.

use serde::Serialize;
use std::collections::BTreeSet;

/// 1-based line numbers reported by compiler diagnostics.
///
/// Rebuilt from scratch on every compile; never merged across runs.
/// Ordered so status displays list lines top to bottom.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ErrorLineSet {
    lines: BTreeSet<usize>,
}

impl ErrorLineSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a line number. Returns true if it was not already present.
    pub fn insert(&mut self, line: usize) -> bool {
        self.lines.insert(line)
    }

    /// Removes every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Returns true if the line is in the set.
    pub fn contains(&self, line: usize) -> bool {
        self.lines.contains(&line)
    }

    /// Returns the number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if no line is implicated.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Iterates over the lines in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.lines.iter().copied()
    }
}

impl FromIterator<usize> for ErrorLineSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().collect(),
        }
    }
}

impl Extend<usize> for ErrorLineSet {
    fn extend<I: IntoIterator<Item = usize>>(&mut self, iter: I) {
        self.lines.extend(iter);
    }
}
