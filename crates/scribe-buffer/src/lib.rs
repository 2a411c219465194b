//! # Scribe Buffer
//!
//! The shared data model of the annotation engine: immutable text
//! snapshots, selections, and styled range sequences.
//!
//! ## Key Concepts for Learning Rust
//!
//! ### Immutability by Default
//! - `TextSnapshot` never changes after construction; an edit produces a
//!   new snapshot
//! - Cloning a snapshot is a reference-count bump (`Arc<str>`), so every
//!   derived `StyledSequence` can hold on to the exact text it was built from
//!
//! ### Offsets
//! - All ranges are half-open byte ranges (`start..end`) into UTF-8 text
//! - Every producer in the engine emits offsets on `char` boundaries, so
//!   slicing with a range never panics

mod error_lines;
mod line_index;
mod selection;
mod snapshot;
mod style;

pub use error_lines::ErrorLineSet;
pub use line_index::LineIndex;
pub use selection::Selection;
pub use snapshot::{DocumentStats, TextSnapshot};
pub use style::{Color, FontWeight, StyleAttributes, StyleRange, StyledRun, StyledSequence};

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors that can occur during buffer operations
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("Range {start}..{end} is out of bounds for text of length {len}")]
    RangeOutOfBounds { start: usize, end: usize, len: usize },

    #[error("Offset {0} is not on a character boundary")]
    NotCharBoundary(usize),
}
