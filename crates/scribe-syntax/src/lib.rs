//! # Scribe Syntax
//!
//! Everything that turns a text snapshot into a styled sequence.
//!
//! ## Pipeline
//!
//! ```text
//!   TextSnapshot
//!        │
//!        ├── BuiltIn mode ──► tokenizer::tokenize      (one linear scan)
//!        └── Config mode ───► ConfigHighlighter        (one regex pass per feature)
//!        │
//!        ▼
//!   base StyledSequence ──► overlay_search ──► overlay_errors ──► renderer
//! ```
//!
//! Every stage is a pure function of its inputs. Nothing here keeps state
//! between calls, so the whole pipeline can simply be re-run on each change.
//!
//! ## Learning: Graceful Degradation
//!
//! Syntax configuration comes from data files and user-typed queries.
//! Instead of returning errors for bad patterns, each pass logs a warning and
//! produces zero ranges; the other passes still run.

pub mod config;
pub mod highlighter;
pub mod overlay;
pub mod palette;
pub mod search;
pub mod tokenizer;

pub use config::{CommentConfig, SyntaxConfig, SyntaxLibrary};
pub use highlighter::{ConfigHighlighter, highlight};
pub use overlay::{compose, overlay_errors, overlay_search};
pub use search::SearchQuery;
pub use tokenizer::{Token, TokenKind, Tokenizer, tokenize};

/// Result type for syntax operations
pub type SyntaxResult<T> = Result<T, SyntaxError>;

/// Errors that can occur while loading syntax resources.
///
/// These never escape the public highlighting entry points; loaders turn
/// them into "no configuration" after logging.
#[derive(Debug, thiserror::Error)]
pub enum SyntaxError {
    #[error("Syntax resource not found: {0}")]
    NotFound(String),

    #[error("Syntax configuration must be a JSON object")]
    NotAnObject,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
