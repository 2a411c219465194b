//! Built-in single-pass tokenizer.
//!
//! ## How the scan works
//!
//! One cursor walks the text left to right. At each position the first
//! matching rule wins:
//!
//! 1. block comment open marker → through the close marker (or end of text)
//! 2. line comment marker → up to, not including, the next `\n`
//! 3. quote → through the next unescaped quote (or end of text)
//! 4. digit → while digit or `.` (so `1.2.3` is one number)
//! 5. letter or `_` → identifier, then keyword/type lookup
//! 6. anything else → exactly one character of plain text
//!
//! Every rule consumes at least one character, so the scan terminates on
//! any input.
//!
//! ## Learning: Byte Offsets and `char`s
//!
//! Rust strings are UTF-8. Indexing is by byte, but a `char` can be up to
//! four bytes wide. The scanner only ever advances by whole `char`s or by
//! the byte length of an ASCII marker, so every offset it records is a valid
//! slice boundary.

use scribe_buffer::{StyleAttributes, StyledSequence, TextSnapshot};
use std::ops::Range;

use crate::palette;

/// Classification of a scanned token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Comment,
    String,
    Number,
    Keyword,
    Type,
    /// An identifier that is neither keyword nor type
    Identifier,
    /// A single character matched by no other rule
    Other,
}

impl TokenKind {
    /// Returns the style for this kind, or `None` for unstyled text.
    pub fn style(self) -> Option<StyleAttributes> {
        match self {
            TokenKind::Comment => Some(palette::COMMENT),
            TokenKind::String => Some(palette::STRING),
            TokenKind::Number => Some(palette::NUMBER),
            TokenKind::Keyword => Some(palette::KEYWORD),
            TokenKind::Type => Some(palette::TYPE),
            TokenKind::Identifier | TokenKind::Other => None,
        }
    }
}

/// A scanned token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub range: Range<usize>,
    pub kind: TokenKind,
}

/// Fixed lexical description of a built-in language.
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer {
    keywords: &'static [&'static str],
    types: &'static [&'static str],
    line_comment: &'static str,
    block_open: &'static str,
    block_close: &'static str,
    quote: char,
}

const KOTLIN_KEYWORDS: &[&str] = &[
    "fun", "class", "object", "val", "var", "if", "else", "when", "for", "while", "do",
    "return", "null", "true", "false", "in", "is", "interface", "sealed", "data", "enum",
    "try", "catch", "finally", "throw", "super", "this", "as", "typealias", "package",
    "import",
];

const KOTLIN_TYPES: &[&str] = &[
    "Int", "String", "Float", "Double", "Boolean", "Char", "Long", "Short", "Any", "Unit",
    "List", "Map", "Set",
];

impl Tokenizer {
    /// The built-in Kotlin mode.
    pub const fn kotlin() -> Self {
        Self {
            keywords: KOTLIN_KEYWORDS,
            types: KOTLIN_TYPES,
            line_comment: "//",
            block_open: "/*",
            block_close: "*/",
            quote: '"',
        }
    }

    /// Scans the text into tokens covering it completely, in order.
    pub fn tokens(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut pos = 0;

        while pos < text.len() {
            let rest = &text[pos..];
            let Some(c) = rest.chars().next() else {
                break;
            };

            let (end, kind) = if marker_at(rest, self.block_open) {
                (self.block_comment_end(text, pos), TokenKind::Comment)
            } else if marker_at(rest, self.line_comment) {
                let end = rest.find('\n').map_or(text.len(), |n| pos + n);
                (end, TokenKind::Comment)
            } else if c == self.quote {
                (self.string_end(text, pos), TokenKind::String)
            } else if c.is_numeric() {
                let len = rest
                    .find(|ch: char| !(ch.is_numeric() || ch == '.'))
                    .unwrap_or(rest.len());
                (pos + len, TokenKind::Number)
            } else if c.is_alphabetic() || c == '_' {
                let len = rest
                    .find(|ch: char| !(ch.is_alphanumeric() || ch == '_'))
                    .unwrap_or(rest.len());
                (pos + len, self.classify(&rest[..len]))
            } else {
                (pos + c.len_utf8(), TokenKind::Other)
            };

            debug_assert!(end > pos, "tokenizer must always advance");
            tokens.push(Token {
                range: pos..end,
                kind,
            });
            pos = end;
        }

        tokens
    }

    /// Scans the text and keeps only the styled tokens.
    pub fn tokenize(&self, text: &TextSnapshot) -> StyledSequence {
        let mut seq = StyledSequence::plain(text.clone());
        for token in self.tokens(text.as_str()) {
            if let Some(style) = token.kind.style() {
                seq.add_style(token.range, style);
            }
        }
        seq
    }

    fn classify(&self, ident: &str) -> TokenKind {
        if self.keywords.contains(&ident) {
            TokenKind::Keyword
        } else if self.types.contains(&ident) {
            TokenKind::Type
        } else {
            TokenKind::Identifier
        }
    }

    /// Offset just past the close marker, or end of text if unterminated.
    fn block_comment_end(&self, text: &str, start: usize) -> usize {
        let body = start + self.block_open.len();
        text[body..]
            .find(self.block_close)
            .map_or(text.len(), |p| body + p + self.block_close.len())
    }

    /// Offset just past the closing quote, or end of text if unterminated.
    ///
    /// A backslash escapes exactly the next character, whatever it is.
    fn string_end(&self, text: &str, start: usize) -> usize {
        let body = start + self.quote.len_utf8();
        let mut chars = text[body..].char_indices();
        while let Some((offset, ch)) = chars.next() {
            if ch == '\\' {
                chars.next();
            } else if ch == self.quote {
                return body + offset + ch.len_utf8();
            }
        }
        text.len()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::kotlin()
    }
}

fn marker_at(rest: &str, marker: &str) -> bool {
    !marker.is_empty() && rest.starts_with(marker)
}

/// Tokenizes with the built-in Kotlin mode.
pub fn tokenize(text: &TextSnapshot) -> StyledSequence {
    Tokenizer::kotlin().tokenize(text)
}
