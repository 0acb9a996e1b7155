use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::expand::expand;

static COMMENT_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*#").unwrap());

/// Result of reading a stylerc file. An unreadable file never aborts a
/// reformat; the outcome tag lets the caller log why the contribution is
/// empty instead of swallowing the failure.
#[derive(Debug, PartialEq, Eq)]
pub enum StylercOutcome {
    Options(String),
    Missing,
    Unreadable(String),
}

impl StylercOutcome {
    /// The option fragment this file contributes, empty for degraded reads.
    pub fn fragment(&self) -> &str {
        match self {
            StylercOutcome::Options(s) => s,
            _ => "",
        }
    }
}

/// Read a stylerc file: expand env-vars in `path` against `vars`, skip
/// `#` comment lines, trim the rest and join them with single spaces.
pub fn read_stylerc(path: &str, vars: &HashMap<String, String>) -> StylercOutcome {
    let full_path = expand(path, vars);
    let full_path = std::path::Path::new(&full_path);
    if !full_path.is_file() {
        return StylercOutcome::Missing;
    }
    match std::fs::read_to_string(full_path) {
        Ok(content) => StylercOutcome::Options(join_directives(&content)),
        Err(e) => StylercOutcome::Unreadable(e.to_string()),
    }
}

fn join_directives(content: &str) -> String {
    content
        .lines()
        .filter(|line| !COMMENT_LINE.is_match(line))
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
