//! Injected editor capabilities.
//!
//! The core reformat logic never talks to a concrete editor SDK; it goes
//! through [`EditableDocument`] for buffer access and [`OutputSurface`] for
//! user-visible error panels. The CLI and the tests use the in-memory
//! implementations below.

use std::ops::Range;

/// A direction-sensitive selection: `a` is the anchor, `b` the active end.
/// `a > b` represents a reversed (right-to-left) selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub a: usize,
    pub b: usize,
}

impl Selection {
    pub fn new(a: usize, b: usize) -> Self {
        Selection { a, b }
    }

    /// Collapsed cursor at `pos`.
    pub fn caret(pos: usize) -> Self {
        Selection { a: pos, b: pos }
    }

    pub fn begin(&self) -> usize {
        self.a.min(self.b)
    }

    pub fn end(&self) -> usize {
        self.a.max(self.b)
    }

    pub fn is_reversed(&self) -> bool {
        self.a > self.b
    }
}

/// Buffer surface the reformatters operate on. Offsets are byte offsets and
/// must land on character boundaries.
pub trait EditableDocument {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Text of `range`.
    fn read(&self, range: Range<usize>) -> String;

    fn replace(&mut self, range: Range<usize>, text: &str);

    fn insert(&mut self, pos: usize, text: &str);

    fn selections(&self) -> Vec<Selection>;

    /// Install a whole new selection set at once.
    fn set_selections(&mut self, selections: Vec<Selection>);
}

/// Read-only output panel used for error reporting. Hosts keep these
/// read-only between writes, so appends must lift and restore that state.
pub trait OutputSurface {
    fn set_read_only(&mut self, read_only: bool);
    fn append(&mut self, text: &str);
    fn show(&mut self);
    fn close(&mut self);
}

/// Plain string-backed document. Backs the CLI (file contents) and tests.
#[derive(Debug, Default)]
pub struct InMemoryDocument {
    text: String,
    selections: Vec<Selection>,
}

impl InMemoryDocument {
    pub fn new(text: impl Into<String>) -> Self {
        InMemoryDocument {
            text: text.into(),
            selections: Vec::new(),
        }
    }

    pub fn with_selections(text: impl Into<String>, selections: Vec<Selection>) -> Self {
        InMemoryDocument {
            text: text.into(),
            selections,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl EditableDocument for InMemoryDocument {
    fn len(&self) -> usize {
        self.text.len()
    }

    fn read(&self, range: Range<usize>) -> String {
        self.text[range].to_string()
    }

    fn replace(&mut self, range: Range<usize>, text: &str) {
        self.text.replace_range(range, text);
    }

    fn insert(&mut self, pos: usize, text: &str) {
        self.text.insert_str(pos, text);
    }

    fn selections(&self) -> Vec<Selection> {
        self.selections.clone()
    }

    fn set_selections(&mut self, selections: Vec<Selection>) {
        self.selections = selections;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_range() {
        let doc = InMemoryDocument::new("one\ntwo\nthree\n");
        assert_eq!(doc.read(4..7), "two");
        assert_eq!(doc.read(0..0), "");
    }

    #[test]
    fn test_replace_and_selection_roundtrip() {
        let mut doc = InMemoryDocument::new("abc def");
        doc.replace(4..7, "xyz!");
        assert_eq!(doc.text(), "abc xyz!");
        doc.set_selections(vec![Selection::new(8, 4)]);
        assert!(doc.selections()[0].is_reversed());
        assert_eq!(doc.selections()[0].begin(), 4);
    }
}
