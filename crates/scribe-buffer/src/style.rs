//! Composable style attributes and styled range sequences.
//!
//! ## Learning: `Option` as "unset"
//!
//! Every attribute is an `Option`. `None` means "this range has no opinion",
//! which is what makes styles composable: laying one style over another
//! only replaces the attributes the top style actually sets.
//!
//! ```text
//! base    : fg=green  italic
//! overlay :                     bg=yellow fg=black
//! result  : fg=black  italic    bg=yellow
//! ```

use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Range;

use crate::TextSnapshot;

/// An sRGB color with alpha.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::from_argb(0xFF00_0000);
    pub const WHITE: Color = Color::from_argb(0xFFFF_FFFF);
    pub const YELLOW: Color = Color::from_argb(0xFFFF_FF00);

    /// Builds a color from a packed `0xAARRGGBB` value.
    pub const fn from_argb(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    SemiBold,
    Bold,
}

/// Visual attributes of a range. Unset attributes inherit from below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct StyleAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<FontWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strikethrough: Option<bool>,
}

impl StyleAttributes {
    pub const fn with_foreground(mut self, color: Color) -> Self {
        self.foreground = Some(color);
        self
    }

    pub const fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub const fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = Some(weight);
        self
    }

    pub const fn italic(mut self) -> Self {
        self.italic = Some(true);
        self
    }

    pub const fn underlined(mut self) -> Self {
        self.underline = Some(true);
        self
    }

    /// Returns true if no attribute is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Lays `top` over `self`, attribute by attribute.
    pub fn overlay(&self, top: &StyleAttributes) -> StyleAttributes {
        StyleAttributes {
            foreground: top.foreground.or(self.foreground),
            background: top.background.or(self.background),
            weight: top.weight.or(self.weight),
            italic: top.italic.or(self.italic),
            underline: top.underline.or(self.underline),
            strikethrough: top.strikethrough.or(self.strikethrough),
        }
    }
}

/// A half-open byte range plus the style applied to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleRange {
    pub start: usize,
    pub end: usize,
    pub style: StyleAttributes,
}

impl StyleRange {
    pub fn new(range: Range<usize>, style: StyleAttributes) -> Self {
        Self {
            start: range.start,
            end: range.end,
            style,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// A maximal run of text sharing one resolved style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyledRun {
    pub start: usize,
    pub end: usize,
    pub style: StyleAttributes,
}

/// Text plus the ordered list of style ranges applied to it.
///
/// Ranges may overlap; later ranges win attribute conflicts. The sequence is
/// consumed for rendering only and never re-parsed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StyledSequence {
    text: TextSnapshot,
    ranges: Vec<StyleRange>,
}

impl StyledSequence {
    /// Wraps text with no styling.
    pub fn plain(text: TextSnapshot) -> Self {
        Self {
            text,
            ranges: Vec::new(),
        }
    }

    /// Returns the underlying text.
    pub fn text(&self) -> &TextSnapshot {
        &self.text
    }

    /// Returns the ranges in application order.
    pub fn ranges(&self) -> &[StyleRange] {
        &self.ranges
    }

    /// Returns true if there is neither text nor any range.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.ranges.is_empty()
    }

    /// Appends a style range on top of the existing ones.
    ///
    /// Ranges violating `start <= end <= len` are dropped. Returns whether
    /// the range was kept.
    pub fn add_style(&mut self, range: Range<usize>, style: StyleAttributes) -> bool {
        if range.start > range.end || range.end > self.text.len() {
            tracing::trace!(?range, len = self.text.len(), "dropping out-of-bounds style range");
            return false;
        }
        self.ranges.push(StyleRange::new(range, style));
        true
    }

    /// Returns a new sequence with `ranges` applied on top, leaving `self`
    /// untouched.
    pub fn with_styles<I>(&self, ranges: I) -> Self
    where
        I: IntoIterator<Item = (Range<usize>, StyleAttributes)>,
    {
        let mut layered = self.clone();
        for (range, style) in ranges {
            layered.add_style(range, style);
        }
        layered
    }

    /// Resolves the composed style at a byte offset.
    pub fn style_at(&self, offset: usize) -> StyleAttributes {
        self.ranges
            .iter()
            .filter(|r| r.start <= offset && offset < r.end)
            .fold(StyleAttributes::default(), |acc, r| acc.overlay(&r.style))
    }

    /// Flattens the ranges into disjoint runs covering the whole text.
    ///
    /// Adjacent runs with equal resolved styles are merged, so the result is
    /// what a renderer would draw.
    pub fn runs(&self) -> Vec<StyledRun> {
        let len = self.text.len();
        if len == 0 {
            return Vec::new();
        }

        let mut bounds: Vec<usize> = Vec::with_capacity(self.ranges.len() * 2 + 2);
        bounds.push(0);
        bounds.push(len);
        for r in &self.ranges {
            bounds.push(r.start);
            bounds.push(r.end);
        }
        bounds.sort_unstable();
        bounds.dedup();

        let mut segments = vec![StyleAttributes::default(); bounds.len() - 1];
        for r in self.ranges.iter().filter(|r| r.start < r.end) {
            let first = bounds.partition_point(|&b| b < r.start);
            let last = bounds.partition_point(|&b| b < r.end);
            for segment in &mut segments[first..last] {
                *segment = segment.overlay(&r.style);
            }
        }

        let mut runs: Vec<StyledRun> = Vec::new();
        for (i, style) in segments.into_iter().enumerate() {
            match runs.last_mut() {
                Some(prev) if prev.style == style => prev.end = bounds[i + 1],
                _ => runs.push(StyledRun {
                    start: bounds[i],
                    end: bounds[i + 1],
                    style,
                }),
            }
        }
        runs
    }
}
