//! Splitting the response stream into lines and classifying them.

use serde_json::Value;

/// Buffers a byte stream and hands out complete lines.
///
/// A line ends at `\n`, `\r` or `\r\n`. The `\n` of a `\r\n` pair may
/// arrive in the next chunk, so the splitter remembers a trailing `\r`.
/// Bytes are decoded only once a whole line is available, so a multi-byte
/// character split across two chunks decodes correctly.
#[derive(Debug, Default)]
pub struct LineSplitter {
    pending: Vec<u8>,
    after_cr: bool,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a chunk and returns the lines it completed, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        for &byte in chunk {
            if std::mem::take(&mut self.after_cr) && byte == b'\n' {
                continue;
            }
            match byte {
                b'\n' | b'\r' => {
                    lines.push(decode(&self.pending));
                    self.pending.clear();
                    self.after_cr = byte == b'\r';
                }
                _ => self.pending.push(byte),
            }
        }
        lines
    }

    /// Returns the unterminated last line, if any bytes are left.
    pub fn finish(&mut self) -> Option<String> {
        self.after_cr = false;
        if self.pending.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.pending);
        Some(decode(&rest))
    }
}

fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// A line of compile output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamLine {
    /// Raw compiler text
    Diagnostic(String),
    /// The final status object
    Status { raw: String, ok: bool },
}

impl StreamLine {
    /// Classifies a line.
    ///
    /// Heuristic: a line whose trimmed text starts with `{` and ends with `}`
    /// is a status line. Its `ok` field is read when the line parses as a
    /// JSON object holding a boolean there; anything else counts as not ok.
    /// This is deliberately not a general JSON sniffer.
    pub fn classify(raw: String) -> Self {
        let trimmed = raw.trim();
        if !(trimmed.starts_with('{') && trimmed.ends_with('}')) {
            return Self::Diagnostic(raw);
        }

        let ok = serde_json::from_str::<Value>(trimmed)
            .ok()
            .and_then(|v| v.get("ok").and_then(Value::as_bool))
            .unwrap_or(false);
        Self::Status { raw, ok }
    }

    /// Returns the line as received.
    pub fn text(&self) -> &str {
        match self {
            Self::Diagnostic(raw) | Self::Status { raw, .. } => raw,
        }
    }

    /// Returns the diagnostic text, or `None` for a status line.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::Diagnostic(raw) => Some(raw),
            Self::Status { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_across_chunks() {
        let mut splitter = LineSplitter::new();
        assert_eq!(splitter.push(b"err"), Vec::<String>::new());
        assert_eq!(splitter.push(b"or: a\r\nwarn"), vec!["error: a"]);
        assert_eq!(splitter.push(b"ing\n\n{\"ok\":true}"), vec!["warning", ""]);
        assert_eq!(splitter.finish(), Some("{\"ok\":true}".to_string()));
        assert_eq!(splitter.finish(), None);
    }

    #[test]
    fn test_carriage_return_ends_a_line() {
        let mut splitter = LineSplitter::new();
        assert_eq!(splitter.push(b"a.kt:1: x\ra.kt:2: y\n"), vec!["a.kt:1: x", "a.kt:2: y"]);

        // CRLF split across chunks is still one break
        assert_eq!(splitter.push(b"first\r"), vec!["first"]);
        assert_eq!(splitter.push(b"\nsecond\r\r\n"), vec!["second", ""]);
        assert_eq!(splitter.finish(), None);
    }

    #[test]
    fn test_multibyte_split_between_chunks() {
        let bytes = "é\n".as_bytes();
        let mut splitter = LineSplitter::new();
        assert!(splitter.push(&bytes[..1]).is_empty());
        assert_eq!(splitter.push(&bytes[1..]), vec!["é"]);
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            StreamLine::classify("x.kt:3: error".into()),
            StreamLine::Diagnostic("x.kt:3: error".into())
        );
        assert!(matches!(
            StreamLine::classify("  {\"ok\": true, \"ms\": 12} ".into()),
            StreamLine::Status { ok: true, .. }
        ));
    }

    #[test]
    fn test_malformed_status_is_not_ok() {
        for line in ["{\"ok\":false}", "{oops}", "{\"ok\":\"yes\"}", "{}"] {
            assert!(
                matches!(StreamLine::classify(line.into()), StreamLine::Status { ok: false, .. }),
                "{line}"
            );
        }
    }

    #[test]
    fn test_text_is_verbatim() {
        let line = StreamLine::classify(" {\"ok\":true}".into());
        assert_eq!(line.text(), " {\"ok\":true}");
        assert_eq!(line.diagnostic(), None);
    }
}
