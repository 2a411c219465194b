//! Fixed styles used by the highlighters and overlays.

use scribe_buffer::{Color, FontWeight, StyleAttributes};

const PLAIN: StyleAttributes = StyleAttributes {
    foreground: None,
    background: None,
    weight: None,
    italic: None,
    underline: None,
    strikethrough: None,
};

const GREEN: Color = Color::from_argb(0xFF6A_9955);
const SALMON: Color = Color::from_argb(0xFFD6_9D85);
const SAGE: Color = Color::from_argb(0xFFB5_CEA8);
const SKY: Color = Color::from_argb(0xFF56_9CD6);
const TEAL: Color = Color::from_argb(0xFF4E_C9B0);
const NAVY: Color = Color::from_argb(0xFF15_65C0);
const RED_TINT: Color = Color::from_argb(0x33FF_0000);

// Built-in tokenizer
pub const COMMENT: StyleAttributes = PLAIN.with_foreground(GREEN);
pub const STRING: StyleAttributes = PLAIN.with_foreground(SALMON);
pub const NUMBER: StyleAttributes = PLAIN.with_foreground(SAGE);
pub const KEYWORD: StyleAttributes = PLAIN.with_foreground(SKY).with_weight(FontWeight::SemiBold);
pub const TYPE: StyleAttributes = PLAIN.with_foreground(TEAL);

// Configured highlighter
pub const CONFIG_KEYWORD: StyleAttributes = PLAIN.with_foreground(NAVY).with_weight(FontWeight::Bold);
pub const CONFIG_TYPE: StyleAttributes = PLAIN.with_foreground(TEAL);
pub const CONFIG_COMMENT: StyleAttributes = PLAIN.with_foreground(GREEN).italic();
pub const CONFIG_STRING: StyleAttributes = PLAIN.with_foreground(SALMON);

// Overlays
pub const SEARCH_MATCH: StyleAttributes = PLAIN
    .with_background(Color::YELLOW)
    .with_foreground(Color::BLACK);
pub const ERROR_LINE: StyleAttributes = PLAIN.with_background(RED_TINT).underlined();
