//! Immutable text snapshots.
//!
//! ## Why not a rope?
//!
//! Every consumer of a snapshot (tokenizer, regex passes, overlays) needs
//! the whole text as one contiguous `&str`, and highlighting is recomputed
//! wholesale on each change. A shared `Arc<str>` gives O(1) clones and
//! zero-copy `&str` access, which is exactly what those passes want.
//!
//! ## Learning: `Arc<str>` vs `Arc<String>`
//!
//! `Arc<str>` stores the bytes inline with the reference counts, avoiding
//! the double indirection of `Arc<String>`. The tradeoff is that the text
//! can never grow in place, which is the point here.

use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use crate::{BufferError, BufferResult, LineIndex};

/// An immutable snapshot of the document text at one point in time.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct TextSnapshot {
    text: Arc<str>,
}

impl TextSnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the length in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns true if the snapshot holds no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns the text covered by a byte range.
    pub fn slice(&self, range: Range<usize>) -> BufferResult<&str> {
        self.check_range(&range)?;
        Ok(&self.text[range])
    }

    /// Produces a new snapshot with `range` replaced by `replacement`.
    ///
    /// The receiver is left untouched.
    pub fn replace_range(&self, range: Range<usize>, replacement: &str) -> BufferResult<Self> {
        self.check_range(&range)?;

        let mut text = String::with_capacity(self.len() - range.len() + replacement.len());
        text.push_str(&self.text[..range.start]);
        text.push_str(replacement);
        text.push_str(&self.text[range.end..]);
        Ok(Self::from(text))
    }

    /// Returns character, word and line counts for the status display.
    pub fn stats(&self) -> DocumentStats {
        DocumentStats {
            chars: self.text.chars().count(),
            words: self.text.split_whitespace().count(),
            lines: LineIndex::new(&self.text).line_count(),
        }
    }

    /// Validates that a range lies within the text and on char boundaries.
    fn check_range(&self, range: &Range<usize>) -> BufferResult<()> {
        if range.start > range.end || range.end > self.len() {
            return Err(BufferError::RangeOutOfBounds {
                start: range.start,
                end: range.end,
                len: self.len(),
            });
        }
        for offset in [range.start, range.end] {
            if !self.text.is_char_boundary(offset) {
                return Err(BufferError::NotCharBoundary(offset));
            }
        }
        Ok(())
    }
}

impl From<&str> for TextSnapshot {
    fn from(text: &str) -> Self {
        Self { text: Arc::from(text) }
    }
}

impl From<String> for TextSnapshot {
    fn from(text: String) -> Self {
        Self { text: Arc::from(text) }
    }
}

impl AsRef<str> for TextSnapshot {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl fmt::Debug for TextSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TextSnapshot").field(&&*self.text).finish()
    }
}

impl fmt::Display for TextSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for TextSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

/// Character, word and line counts of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DocumentStats {
    /// Unicode scalar values
    pub chars: usize,
    /// Whitespace-separated, non-blank runs
    pub words: usize,
    /// Lines, counting the empty one after a trailing break
    pub lines: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_text() {
        let a = TextSnapshot::from("shared");
        let b = a.clone();
        assert!(std::ptr::eq(a.as_str(), b.as_str()));
    }

    #[test]
    fn test_replace_inserts_and_deletes() {
        let text = TextSnapshot::from("fun main()");
        let inserted = text.replace_range(3..3, " private").unwrap();
        assert_eq!(inserted.as_str(), "fun private main()");

        let deleted = inserted.replace_range(0..4, "").unwrap();
        assert_eq!(deleted.as_str(), "private main()");
    }

    #[test]
    fn test_replace_rejects_split_character() {
        let text = TextSnapshot::from("héllo");
        // 'é' occupies bytes 1..3
        let err = text.replace_range(2..3, "e").unwrap_err();
        assert!(matches!(err, BufferError::NotCharBoundary(2)));
    }

    #[test]
    fn test_slice() {
        let text = TextSnapshot::from("val x = 1");
        assert_eq!(text.slice(4..5).unwrap(), "x");
        assert!(text.slice(5..4).is_err());
    }

    #[test]
    fn test_stats() {
        let text = TextSnapshot::from("  fun  main() {\n\tprintln(\"é\")\n}\n");
        let stats = text.stats();
        assert_eq!(stats.words, 5);
        assert_eq!(stats.chars, text.as_str().chars().count());
        assert_eq!(stats.lines, 4);

        assert_eq!(
            TextSnapshot::new().stats(),
            DocumentStats { chars: 0, words: 0, lines: 1 }
        );
    }
}
