//! Syntax → formatting-mode mapping.
//!
//! The editor's "syntax" names the specific language of the buffer; the
//! formatter's "mode" is its coarser language family. User-defined entries
//! extend and override the built-in table.

use std::collections::HashMap;
use std::path::Path;

const BUILTIN_MAPPING: &[(&str, &str)] = &[
    ("c", "c"),
    ("c++", "c"),
    ("cpp", "c"),
    ("objc", "c"),
    ("objc++", "c"),
    ("cs", "cs"),
    ("c#", "cs"),
    ("java", "java"),
];

/// Built-in mapping with `user` entries layered on top.
pub fn syntax_mode_mapping(user: &HashMap<String, String>) -> HashMap<String, String> {
    let mut mapping: HashMap<String, String> = BUILTIN_MAPPING
        .iter()
        .map(|(s, m)| (s.to_string(), m.to_string()))
        .collect();
    mapping.extend(user.iter().map(|(k, v)| (k.clone(), v.clone())));
    mapping
}

/// Formatting mode for `syntax`, or `None` when the syntax is unsupported.
pub fn mode_for_syntax(syntax: &str, user: &HashMap<String, String>) -> Option<String> {
    syntax_mode_mapping(user).get(syntax).cloned()
}

pub fn is_supported(syntax: &str, user: &HashMap<String, String>) -> bool {
    syntax_mode_mapping(user).contains_key(syntax)
}

/// Guess a syntax name from a file extension, for the CLI front end.
pub fn syntax_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?;
    match ext {
        "c" | "h" => Some("c"),
        "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => Some("c++"),
        "m" | "mm" => Some("objc"),
        "cs" => Some("cs"),
        "java" => Some("java"),
        _ => None,
    }
}
