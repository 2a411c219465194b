//! Selections reported by the editable field.
//!
//! ## Learning: Half-Open Ranges
//!
//! A selection is a `start..end` byte range with an exclusive end, the same
//! shape `str` slicing uses. A cursor is just the empty range `n..n`, so
//! copy, cut, paste and replace never need a separate "no selection" case.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A selection reported by the editable field, as byte offsets.
///
/// A selection has a start and end offset. The start is always
/// before or equal to the end (normalized).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
}

impl Selection {
    /// Creates a new selection.
    ///
    /// Automatically normalizes so start <= end.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    /// Creates a zero-width selection (cursor position).
    pub fn cursor(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Returns true if this is a zero-width selection (just a cursor).
    pub fn is_cursor(&self) -> bool {
        self.start == self.end
    }

    /// Returns the selection as a byte range.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Clamps both ends into `text`, moving them back onto char boundaries.
    pub fn clamp_to(&self, text: &str) -> Self {
        let clamp = |mut offset: usize| {
            offset = offset.min(text.len());
            while !text.is_char_boundary(offset) {
                offset -= 1;
            }
            offset
        };
        Self::new(clamp(self.start), clamp(self.end))
    }
}

impl From<Range<usize>> for Selection {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}
