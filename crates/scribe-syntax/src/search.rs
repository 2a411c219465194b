//! Search queries: matching, find-next and replace.
//!
//! ## Learning: `regex::escape` and Literal Replacement
//!
//! The user types plain text, not a pattern. `regex::escape` turns it into a
//! pattern that matches itself, and `regex::NoExpand` keeps `$1` in the
//! replacement text from being read as a capture-group reference.

use regex::{NoExpand, Regex, RegexBuilder};
use scribe_buffer::{Selection, TextSnapshot};
use std::ops::Range;

/// A find query with its option toggles.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery {
    pub text: String,
    pub case_sensitive: bool,
    pub whole_word: bool,
}

impl SearchQuery {
    /// A case-insensitive, substring query.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn case_sensitive(mut self, on: bool) -> Self {
        self.case_sensitive = on;
        self
    }

    pub fn whole_word(mut self, on: bool) -> Self {
        self.whole_word = on;
        self
    }

    /// Returns true if the query is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Compiles the query, or `None` if it is empty.
    ///
    /// Whole-word matches must be bounded by a non-word character or the
    /// edge of the text on both sides.
    pub fn regex(&self) -> Option<Regex> {
        if self.text.is_empty() {
            return None;
        }
        let escaped = regex::escape(&self.text);
        let pattern = if self.whole_word {
            format!(r"\b{escaped}\b")
        } else {
            escaped
        };
        RegexBuilder::new(&pattern)
            .case_insensitive(!self.case_sensitive)
            .build()
            .inspect_err(|e| tracing::warn!(query = %self.text, error = %e, "search query rejected"))
            .ok()
    }

    /// Returns every non-overlapping match in the text.
    pub fn matches(&self, text: &str) -> Vec<Range<usize>> {
        self.regex()
            .map(|rx| rx.find_iter(text).map(|m| m.range()).collect())
            .unwrap_or_default()
    }

    /// Finds the first match at or after `from`, wrapping to the start.
    pub fn find_next(&self, text: &str, from: usize) -> Option<Range<usize>> {
        let rx = self.regex()?;
        let from = Selection::cursor(from).clamp_to(text).start;
        rx.find_at(text, from)
            .or_else(|| rx.find(text))
            .map(|m| m.range())
    }

    /// Replaces the current selection if it is exactly one match, otherwise
    /// the next match after the selection.
    ///
    /// Returns the new text and a selection covering the inserted text, or
    /// `None` if nothing matched.
    pub fn replace_current(
        &self,
        text: &TextSnapshot,
        selection: Selection,
        replacement: &str,
    ) -> Option<(TextSnapshot, Selection)> {
        let rx = self.regex()?;
        let selection = selection.clamp_to(text.as_str());

        let selected = &text.as_str()[selection.range()];
        let selection_is_match = !selection.is_cursor()
            && rx
                .find(selected)
                .is_some_and(|m| m.start() == 0 && m.end() == selected.len());

        let target = if selection_is_match {
            selection.range()
        } else {
            self.find_next(text.as_str(), selection.end)?
        };

        let start = target.start;
        let replaced = text.replace_range(target, replacement).ok()?;
        Some((replaced, Selection::new(start, start + replacement.len())))
    }

    /// Replaces every match. Returns `None` if the query is empty.
    pub fn replace_all(&self, text: &TextSnapshot, replacement: &str) -> Option<TextSnapshot> {
        let rx = self.regex()?;
        let replaced = rx.replace_all(text.as_str(), NoExpand(replacement));
        Some(TextSnapshot::from(replaced.into_owned()))
    }
}
