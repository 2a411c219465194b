//! Data-driven highlighter for configured languages.
//!
//! Unlike the tokenizer, this highlighter never walks the text itself. Each
//! feature of the configuration becomes an independent regex pass over the
//! whole text, and passes are applied in a fixed order so later ones can
//! overlay earlier ones:
//!
//! ```text
//! keywords → types → line comments → block comments → strings
//! ```
//!
//! A block comment without its end marker produces no range at all; the
//! tokenizer, by contrast, extends such a comment to the end of the text.

use regex::Regex;
use scribe_buffer::{StyleAttributes, StyledSequence, TextSnapshot};

use crate::config::SyntaxConfig;
use crate::palette;

/// One feature's compiled patterns.
#[derive(Debug, Clone)]
struct Pass {
    name: &'static str,
    patterns: Vec<Regex>,
    style: StyleAttributes,
}

/// A configuration compiled into regex passes.
///
/// Build once per language selection and reuse for every keystroke.
#[derive(Debug, Clone, Default)]
pub struct ConfigHighlighter {
    passes: Vec<Pass>,
}

impl ConfigHighlighter {
    /// Compiles the passes of a configuration.
    ///
    /// A pattern that fails to compile is logged and left out; its pass then
    /// simply produces fewer (possibly zero) ranges.
    pub fn new(config: &SyntaxConfig) -> Self {
        let whole_word = |word: &String| format!(r"\b{}\b", regex::escape(word));

        let mut passes = vec![
            Pass::compile("keywords", config.keywords.iter().map(whole_word), palette::CONFIG_KEYWORD),
            Pass::compile("types", config.types.iter().map(whole_word), palette::CONFIG_TYPE),
        ];

        if let Some(line) = config.line_comment() {
            passes.push(Pass::compile(
                "line comments",
                [format!(r"{}[^\r\n]*", regex::escape(line))],
                palette::CONFIG_COMMENT,
            ));
        }

        if let Some((start, end)) = config.block_comment() {
            passes.push(Pass::compile(
                "block comments",
                [format!(r"(?s){}.*?{}", regex::escape(start), regex::escape(end))],
                palette::CONFIG_COMMENT,
            ));
        }

        if let Some(quote) = config.string_delimiter.as_deref() {
            let quote = regex::escape(quote);
            passes.push(Pass::compile(
                "strings",
                [format!(r"{quote}[^\r\n]*?{quote}")],
                palette::CONFIG_STRING,
            ));
        }

        passes.retain(|pass| !pass.patterns.is_empty());
        Self { passes }
    }

    /// Runs every pass over the text.
    pub fn highlight(&self, text: &TextSnapshot) -> StyledSequence {
        let mut seq = StyledSequence::plain(text.clone());
        for pass in &self.passes {
            let before = seq.ranges().len();
            for pattern in &pass.patterns {
                for m in pattern.find_iter(text.as_str()) {
                    seq.add_style(m.range(), pass.style);
                }
            }
            tracing::trace!(pass = pass.name, ranges = seq.ranges().len() - before, "highlight pass");
        }
        seq
    }
}

impl Pass {
    fn compile(
        name: &'static str,
        sources: impl IntoIterator<Item = String>,
        style: StyleAttributes,
    ) -> Self {
        let patterns = sources
            .into_iter()
            .filter_map(|source| match Regex::new(&source) {
                Ok(regex) => Some(regex),
                Err(e) => {
                    tracing::warn!(pass = name, pattern = %source, error = %e, "skipping highlight pattern");
                    None
                }
            })
            .collect();
        Self { name, patterns, style }
    }
}

/// Highlights text with a configuration.
///
/// Without a configuration the text comes back verbatim and unstyled.
pub fn highlight(text: &TextSnapshot, config: Option<&SyntaxConfig>) -> StyledSequence {
    match config {
        Some(config) => ConfigHighlighter::new(config).highlight(text),
        None => StyledSequence::plain(text.clone()),
    }
}
