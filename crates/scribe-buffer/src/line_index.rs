//! Line-start bookkeeping.

use std::ops::Range;

/// Byte offsets at which each line of a text starts.
///
/// Only `\n` terminates a line. A `\r` before it stays part of the line's
/// span, which matters only for whole-line overlays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    /// Scans the text once for line breaks.
    pub fn new(text: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            text.bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            starts,
            len: text.len(),
        }
    }

    /// Returns the number of lines. An empty text has one (empty) line.
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// Returns the span of a 1-based line, including its terminating break.
    ///
    /// Returns `None` for line `0` or lines past the end.
    pub fn line_span(&self, line: usize) -> Option<Range<usize>> {
        let start = *self.starts.get(line.checked_sub(1)?)?;
        let end = self.starts.get(line).copied().unwrap_or(self.len);
        Some(start..end)
    }
}
