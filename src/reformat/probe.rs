use crate::lex::LexMap;

/// First non-indentation offset of the line containing `point` (line end if
/// the whole line is blank).
pub fn line_indentation_pos(text: &str, point: usize) -> usize {
    let (start, end) = line_bounds(text, point);
    let bytes = text.as_bytes();
    let mut pos = start;
    while pos < end {
        match bytes[pos] {
            b' ' | b'\t' => pos += 1,
            _ => break,
        }
    }
    pos
}

/// Span of the line containing `point`, excluding the trailing newline.
pub fn line_bounds(text: &str, point: usize) -> (usize, usize) {
    let point = point.min(text.len());
    let start = text[..point].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let end = text[point..]
        .find('\n')
        .map(|i| point + i)
        .unwrap_or(text.len());
    (start, end)
}

/// Net count of unmatched `{` scanning backward from `start` to the buffer
/// start. Positions inside string/comment/preprocessor spans are skipped
/// atomically. Negative when more blocks close than open above `start`.
pub fn nesting_depth(text: &str, lex: &LexMap, start: usize) -> i32 {
    let bytes = text.as_bytes();
    let mut depth = 0;
    let mut i = start.min(bytes.len()) as i64 - 1;
    while i >= 0 {
        let pos = i as usize;
        if let Some((span, _)) = lex.span_at(pos) {
            i = span.start as i64 - 1;
            continue;
        }
        match bytes[pos] {
            b'}' => depth -= 1,
            b'{' => depth += 1,
            _ => {}
        }
        i -= 1;
    }
    depth
}
