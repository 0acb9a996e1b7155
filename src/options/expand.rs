use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

static VAR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$(\w+|\{[^}]*\})").unwrap());

/// Expand `$name` / `${name}` references in `path`.
///
/// Lookup order is `vars` first, then the process environment. Substituted
/// values are skipped over rather than rescanned, so self-referential values
/// cannot loop. Unknown references are left verbatim; a trailing `$` or an
/// unclosed `${` is literal text.
pub fn expand(path: &str, vars: &HashMap<String, String>) -> String {
    if !path.contains('$') {
        return path.to_string();
    }

    let mut out = path.to_string();
    let mut search_from = 0;
    loop {
        let (start, end, token) = {
            let Some(m) = VAR_REGEX.find_at(&out, search_from) else {
                break;
            };
            (m.start(), m.end(), out[m.start() + 1..m.end()].to_string())
        };
        let name = token
            .strip_prefix('{')
            .and_then(|n| n.strip_suffix('}'))
            .unwrap_or(&token);
        let value = vars
            .get(name)
            .cloned()
            .or_else(|| std::env::var(name).ok());
        match value {
            Some(value) => {
                search_from = start + value.len();
                out.replace_range(start..end, &value);
            }
            None => search_from = end,
        }
    }
    out
}
