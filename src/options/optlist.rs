use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Option names the formatter accepts. Anything else is stripped before the
/// option string reaches the engine.
const KNOWN_OPTIONS: &[&str] = &[
    "mode",
    "style",
    "indent",
    "indent-classes",
    "indent-modifiers",
    "indent-switches",
    "indent-cases",
    "indent-namespaces",
    "indent-after-parens",
    "indent-continuation",
    "indent-labels",
    "indent-preprocessor",
    "indent-preproc-block",
    "indent-preproc-cond",
    "indent-preproc-define",
    "indent-col1-comments",
    "min-conditional-indent",
    "max-continuation-indent",
    "break-blocks",
    "pad-oper",
    "pad-comma",
    "pad-paren",
    "pad-paren-out",
    "pad-paren-in",
    "pad-first-paren-out",
    "pad-header",
    "unpad-paren",
    "delete-empty-lines",
    "fill-empty-lines",
    "align-pointer",
    "align-reference",
    "break-closing-braces",
    "break-elseifs",
    "break-one-line-headers",
    "add-braces",
    "add-one-line-braces",
    "remove-braces",
    "attach-namespaces",
    "attach-classes",
    "attach-inlines",
    "attach-extern-c",
    "attach-closing-while",
    "keep-one-line-blocks",
    "keep-one-line-statements",
    "convert-tabs",
    "close-templates",
    "remove-comment-prefix",
    "max-code-length",
    "break-after-logical",
    "squeeze-lines",
    "squeeze-ws",
    "lineend",
];

static KNOWN_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| KNOWN_OPTIONS.iter().copied().collect());

pub fn is_known_option(key: &str) -> bool {
    KNOWN_SET.contains(key)
}

/// Ordered, de-duplicated `--key[=value]` flags.
///
/// Flags keep the position of their first occurrence but take the value of
/// their last one, so later layers override earlier ones. Tokens that do not
/// look like `--key[=value]` or name an unknown option are dropped.
#[derive(Debug, Default)]
pub struct OptionList {
    entries: Vec<(String, Option<String>)>,
}

impl OptionList {
    pub fn new() -> Self {
        OptionList::default()
    }

    /// Append one flag from its parts.
    pub fn push(&mut self, key: &str, value: Option<&str>) {
        if !is_known_option(key) {
            return;
        }
        self.entries
            .push((key.to_string(), value.map(str::to_string)));
    }

    /// Parse a whitespace-separated fragment of `--key[=value]` tokens.
    pub fn push_fragment(&mut self, fragment: &str) {
        for token in fragment.split_whitespace() {
            let Some(body) = token.strip_prefix("--") else {
                continue;
            };
            match body.split_once('=') {
                Some((key, value)) => self.push(key, Some(value)),
                None => self.push(body, None),
            }
        }
    }

    /// Final option string: one flag per key, space-joined.
    pub fn join(&self) -> String {
        let mut out: Vec<(String, Option<String>)> = Vec::new();
        for (key, value) in &self.entries {
            match out.iter_mut().find(|(k, _)| k == key) {
                Some((_, v)) => *v = value.clone(),
                None => out.push((key.clone(), value.clone())),
            }
        }
        out.iter()
            .map(|(key, value)| match value {
                Some(v) => format!("--{}={}", key, v),
                None => format!("--{}", key),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
