#![allow(dead_code)]

use std::cell::RefCell;

use restyle::engine::FormatEngine;
use restyle::error::StyleError;

/// Deterministic stand-in for the external beautifier: reindents by brace
/// depth, four spaces per level, trimming existing indentation. Idempotent,
/// which matches what the real engine guarantees for its own output.
pub fn brace_indent(source: &str) -> String {
    let mut level: i32 = 0;
    let mut out = String::new();
    for line in source.lines() {
        let trimmed = line.trim();
        let mut line_level = level;
        if trimmed.starts_with('}') {
            line_level -= 1;
        }
        if !trimmed.is_empty() {
            for _ in 0..line_level.max(0) {
                out.push_str("    ");
            }
        }
        out.push_str(trimmed);
        out.push('\n');
        let opens = trimmed.matches('{').count() as i32;
        let closes = trimmed.matches('}').count() as i32;
        level += opens - closes;
    }
    if !source.ends_with('\n') && out.ends_with('\n') {
        out.pop();
    }
    out
}

pub struct MockEngine;

impl FormatEngine for MockEngine {
    fn format(&self, source: &str, _options: &str) -> Result<String, StyleError> {
        Ok(brace_indent(source))
    }

    fn version(&self) -> Result<String, StyleError> {
        Ok("mock 1.0".to_string())
    }
}

/// Mock that records every input it was handed before formatting it.
#[derive(Default)]
pub struct RecordingEngine {
    pub inputs: RefCell<Vec<String>>,
}

impl FormatEngine for RecordingEngine {
    fn format(&self, source: &str, _options: &str) -> Result<String, StyleError> {
        self.inputs.borrow_mut().push(source.to_string());
        Ok(brace_indent(source))
    }

    fn version(&self) -> Result<String, StyleError> {
        Ok("mock 1.0".to_string())
    }
}

/// Mock that returns its input untouched.
pub struct EchoEngine;

impl FormatEngine for EchoEngine {
    fn format(&self, source: &str, _options: &str) -> Result<String, StyleError> {
        Ok(source.to_string())
    }

    fn version(&self) -> Result<String, StyleError> {
        Ok("echo 1.0".to_string())
    }
}

/// Mock that always fails, for error-path tests.
pub struct FailEngine;

impl FormatEngine for FailEngine {
    fn format(&self, _source: &str, _options: &str) -> Result<String, StyleError> {
        Err(StyleError::Engine("mock engine exploded".to_string()))
    }

    fn version(&self) -> Result<String, StyleError> {
        Err(StyleError::Engine("mock engine exploded".to_string()))
    }
}
