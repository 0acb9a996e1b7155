//! User-facing error reporting.
//!
//! [`ErrorReporter`] fronts a named read-only output surface. Appends lift
//! the read-only state, write, and restore it, mirroring how hosts expect
//! read-only panels to be edited.

use crate::editor::OutputSurface;

pub struct ErrorReporter<'a> {
    name: String,
    surface: &'a mut dyn OutputSurface,
}

impl<'a> ErrorReporter<'a> {
    pub fn new(name: impl Into<String>, surface: &'a mut dyn OutputSurface) -> Self {
        ErrorReporter {
            name: name.into(),
            surface,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append `text` through the read-only lift/append/restore path.
    pub fn write(&mut self, text: &str) {
        self.surface.set_read_only(false);
        self.surface.append(text);
        self.surface.set_read_only(true);
    }

    pub fn show(&mut self) {
        self.surface.show();
    }

    pub fn close(&mut self) {
        self.surface.close();
    }
}

/// Surface for the CLI: shown content goes to stderr on `show()`.
#[derive(Debug, Default)]
pub struct StderrSurface {
    buffer: String,
}

impl OutputSurface for StderrSurface {
    fn set_read_only(&mut self, _read_only: bool) {}

    fn append(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn show(&mut self) {
        eprint!("{}", self.buffer);
    }

    fn close(&mut self) {
        self.buffer.clear();
    }
}

/// In-memory surface that tracks read-only state and visibility; used by
/// tests to assert on reported messages.
#[derive(Debug)]
pub struct MemorySurface {
    pub content: String,
    pub read_only: bool,
    pub visible: bool,
}

impl Default for MemorySurface {
    fn default() -> Self {
        MemorySurface {
            content: String::new(),
            read_only: true,
            visible: false,
        }
    }
}

impl OutputSurface for MemorySurface {
    fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    fn append(&mut self, text: &str) {
        // Hosts reject edits to read-only surfaces; mirror that contract.
        if !self.read_only {
            self.content.push_str(text);
        }
    }

    fn show(&mut self) {
        self.visible = true;
    }

    fn close(&mut self) {
        self.visible = false;
        self.content.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_lifts_and_restores_read_only() {
        let mut surface = MemorySurface::default();
        let mut reporter = ErrorReporter::new("style_error_message", &mut surface);
        reporter.write("boom\n");
        reporter.show();
        assert_eq!(surface.content, "boom\n");
        assert!(surface.read_only);
        assert!(surface.visible);
    }

    #[test]
    fn test_direct_append_to_read_only_surface_is_rejected() {
        let mut surface = MemorySurface::default();
        surface.append("ignored");
        assert_eq!(surface.content, "");
    }

    #[test]
    fn test_close_hides_and_clears() {
        let mut surface = MemorySurface::default();
        {
            let mut reporter = ErrorReporter::new("panel", &mut surface);
            reporter.write("old error\n");
            reporter.show();
            reporter.close();
        }
        assert!(!surface.visible);
        assert_eq!(surface.content, "");
    }
}
