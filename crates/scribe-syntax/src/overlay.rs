//! Overlay compositor.
//!
//! Overlays never touch the text and never mutate their input: each takes a
//! base sequence and returns a new one with extra ranges on top. The caller
//! applies them in a fixed order (syntax → search → errors), and because
//! later ranges win attribute conflicts, an error line's background shows
//! through a search match on that line.

use scribe_buffer::{ErrorLineSet, LineIndex, StyledSequence};

use crate::palette;
use crate::search::SearchQuery;

/// Highlights every match of the query. A blank query is the identity.
pub fn overlay_search(base: &StyledSequence, query: &SearchQuery) -> StyledSequence {
    if query.is_blank() {
        return base.clone();
    }
    let matches = query.matches(base.text().as_str());
    tracing::trace!(query = %query.text, matches = matches.len(), "search overlay");
    base.with_styles(matches.into_iter().map(|range| (range, palette::SEARCH_MATCH)))
}

/// Tints every listed 1-based line, including its line break.
///
/// Line numbers outside the text are skipped. An empty set is the identity.
pub fn overlay_errors(base: &StyledSequence, lines: &ErrorLineSet) -> StyledSequence {
    if lines.is_empty() {
        return base.clone();
    }
    let index = LineIndex::new(base.text().as_str());
    base.with_styles(
        lines
            .iter()
            .filter_map(|line| index.line_span(line))
            .map(|span| (span, palette::ERROR_LINE)),
    )
}

/// Applies the search overlay, then the error overlay.
pub fn compose(base: &StyledSequence, query: &SearchQuery, errors: &ErrorLineSet) -> StyledSequence {
    overlay_errors(&overlay_search(base, query), errors)
}
