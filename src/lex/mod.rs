//! Lexical span classification for C-family sources.
//!
//! The brace-depth probe must ignore braces inside strings, comments and
//! preprocessor lines. [`LexMap::scan`] records those spans once per buffer
//! snapshot so the probe can jump over a whole span atomically.

use std::ops::Range;

/// Classification of a buffer position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexClass {
    Normal,
    StringLiteral,
    Comment,
    Preprocessor,
}

/// Non-`Normal` spans of one buffer snapshot, in ascending order.
#[derive(Debug, Default)]
pub struct LexMap {
    spans: Vec<(Range<usize>, LexClass)>,
}

impl LexMap {
    /// Scan `source` for string, comment and preprocessor spans.
    ///
    /// Handles `"…"` and `'…'` with backslash escapes, `//` line comments,
    /// `/* … */` block comments and `#`-led preprocessor lines including
    /// backslash line continuations. Unterminated spans run to end of text.
    pub fn scan(source: &str) -> Self {
        let mut spans = Vec::new();
        let bytes = source.as_bytes();
        let len = bytes.len();
        let mut i = 0;
        let mut at_line_start = true;

        while i < len {
            let b = bytes[i];
            match b {
                b'"' | b'\'' => {
                    let start = i;
                    i += 1;
                    while i < len && bytes[i] != b {
                        if bytes[i] == b'\\' {
                            i += 1;
                        }
                        i += 1;
                    }
                    i = (i + 1).min(len);
                    spans.push((start..i, LexClass::StringLiteral));
                    at_line_start = false;
                }
                b'/' if i + 1 < len && bytes[i + 1] == b'/' => {
                    let start = i;
                    while i < len && bytes[i] != b'\n' {
                        i += 1;
                    }
                    spans.push((start..i, LexClass::Comment));
                }
                b'/' if i + 1 < len && bytes[i + 1] == b'*' => {
                    let start = i;
                    i += 2;
                    while i < len {
                        if bytes[i] == b'*' && i + 1 < len && bytes[i + 1] == b'/' {
                            i += 2;
                            break;
                        }
                        i += 1;
                    }
                    i = i.min(len);
                    spans.push((start..i, LexClass::Comment));
                    at_line_start = false;
                }
                b'#' if at_line_start => {
                    let start = i;
                    while i < len && bytes[i] != b'\n' {
                        // Backslash continuation extends the directive.
                        if bytes[i] == b'\\' && i + 1 < len && bytes[i + 1] == b'\n' {
                            i += 1;
                        }
                        i += 1;
                    }
                    spans.push((start..i, LexClass::Preprocessor));
                }
                b'\n' => {
                    i += 1;
                    at_line_start = true;
                    continue;
                }
                b' ' | b'\t' | b'\r' => {
                    i += 1;
                    continue;
                }
                _ => {
                    i += 1;
                    at_line_start = false;
                }
            }
        }

        LexMap { spans }
    }

    /// Classification of the character at `pos`.
    pub fn class_at(&self, pos: usize) -> LexClass {
        self.span_at(pos)
            .map(|(_, class)| class)
            .unwrap_or(LexClass::Normal)
    }

    /// The non-normal span covering `pos`, if any.
    pub fn span_at(&self, pos: usize) -> Option<(Range<usize>, LexClass)> {
        // Spans are sorted; binary search on start.
        let idx = self
            .spans
            .partition_point(|(range, _)| range.start <= pos);
        if idx == 0 {
            return None;
        }
        let (range, class) = &self.spans[idx - 1];
        if pos < range.end {
            Some((range.clone(), *class))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_span() {
        let map = LexMap::scan(r#"x = "hi {" ;"#);
        assert_eq!(map.class_at(6), LexClass::StringLiteral);
        assert_eq!(map.class_at(0), LexClass::Normal);
        let (span, _) = map.span_at(8).unwrap();
        assert_eq!(span, 4..10);
    }

    #[test]
    fn test_escaped_quote_stays_inside_string() {
        let src = r#""a\"b" c"#;
        let map = LexMap::scan(src);
        assert_eq!(map.class_at(3), LexClass::StringLiteral);
        assert_eq!(map.class_at(7), LexClass::Normal);
    }

    #[test]
    fn test_line_and_block_comments() {
        let src = "a; // {{{\nb; /* } */ c";
        let map = LexMap::scan(src);
        assert_eq!(map.class_at(7), LexClass::Comment);
        assert_eq!(map.class_at(10), LexClass::Normal);
        assert_eq!(map.class_at(16), LexClass::Comment);
        assert_eq!(map.class_at(21), LexClass::Normal);
    }

    #[test]
    fn test_preprocessor_line_only_at_line_start() {
        let src = "#include <a.h>\nint x = a # b;\n  #define Y 1";
        let map = LexMap::scan(src);
        assert_eq!(map.class_at(0), LexClass::Preprocessor);
        // '#' mid-expression is not a directive.
        assert_eq!(map.class_at(25), LexClass::Normal);
        // Indented directive still counts.
        assert_eq!(map.class_at(33), LexClass::Preprocessor);
    }

    #[test]
    fn test_preprocessor_continuation() {
        let src = "#define M(x) \\\n  do { x } while (0)\nint y;";
        let map = LexMap::scan(src);
        // The continued line belongs to the directive.
        assert_eq!(map.class_at(20), LexClass::Preprocessor);
        assert_eq!(map.class_at(37), LexClass::Normal);
    }

    #[test]
    fn test_unterminated_block_comment() {
        let map = LexMap::scan("a /* never closed");
        assert_eq!(map.class_at(16), LexClass::Comment);
    }
}
