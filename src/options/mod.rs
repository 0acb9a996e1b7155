//! Option resolution: turns layered settings into the single option string
//! handed to the external formatter.
//!
//! Layering, lowest to highest: built-in defaults, `[options.default]`,
//! `[options.<mode>]`, `[options.<syntax>]`, explicit additional options,
//! stylerc file content. `use_only_additional_options` short-circuits past
//! the defaults entirely. The `--mode=` flag always comes first.

pub mod expand;
mod optlist;
mod stylerc;

pub use expand::expand;
pub use optlist::{is_known_option, OptionList};
pub use stylerc::{read_stylerc, StylercOutcome};

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::{IndentPrefs, OptionValue, Settings, SyntaxOptions, OPTIONS_DEFAULT};
use crate::error::StyleError;

/// Per-invocation metadata used for env-var expansion in stylerc paths.
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    /// Path of the file being formatted.
    pub file: Option<PathBuf>,
    /// Path of the project settings file, if any.
    pub project: Option<PathBuf>,
    /// Editor package root, if the host has one.
    pub packages: Option<PathBuf>,
}

impl ResolveContext {
    pub fn for_file(file: &Path) -> Self {
        ResolveContext {
            file: Some(file.to_path_buf()),
            ..Default::default()
        }
    }

    /// Expansion variables derived from the active file and project.
    pub fn vars(&self) -> HashMap<String, String> {
        let mut vars = HashMap::new();
        if let Some(packages) = &self.packages {
            vars.insert("packages".to_string(), lossy(packages));
        }
        if let Some(file) = &self.file {
            vars.insert("file".to_string(), lossy(file));
            if let Some(dir) = file.parent() {
                vars.insert("file_path".to_string(), lossy(dir));
            }
            insert_name_parts(&mut vars, file, "file");
        }
        if let Some(project) = &self.project {
            vars.insert("project".to_string(), lossy(project));
            if let Some(dir) = project.parent() {
                vars.insert("project_path".to_string(), lossy(dir));
            }
            insert_name_parts(&mut vars, project, "project");
        }
        vars
    }
}

fn lossy(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

fn insert_name_parts(vars: &mut HashMap<String, String>, path: &Path, prefix: &str) {
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        vars.insert(format!("{}_name", prefix), name.to_string());
        let (base, ext) = match name.rfind('.') {
            // splitext semantics: extension keeps its dot.
            Some(i) if i > 0 => (&name[..i], &name[i..]),
            _ => (name, ""),
        };
        vars.insert(format!("{}_base_name", prefix), base.to_string());
        vars.insert(format!("{}_extension", prefix), ext.to_string());
    }
}

/// Resolve the final option string for one reformat request.
///
/// `mode` must name a formatter mode; an empty mode is a configuration error
/// and the formatter is never invoked. Returns the resolved string plus the
/// stylerc outcome so callers can log degraded reads.
pub fn resolve_options(
    syntax: &str,
    mode: &str,
    settings: &Settings,
    ctx: &ResolveContext,
) -> Result<(String, StylercOutcome), StyleError> {
    if mode.is_empty() {
        return Err(StyleError::config_with_extra(
            format!("no formatting mode for syntax '{}'", syntax),
            "add an entry under [syntax_mode_mapping] for this syntax",
        ));
    }

    let syntax_settings = syntax_settings_for(syntax, mode, settings);

    let mut list = OptionList::new();
    list.push("mode", Some(mode));

    let stylerc_outcome = match &syntax_settings.additional_options_file {
        Some(path) => read_stylerc(path, &ctx.vars()),
        None => StylercOutcome::Missing,
    };

    let additional = syntax_settings
        .additional_options
        .as_deref()
        .unwrap_or(&[])
        .join(" ");

    if syntax_settings.use_only_additional_options.unwrap_or(false) {
        list.push_fragment(&additional);
        list.push_fragment(stylerc_outcome.fragment());
        return Ok((list.join(), stylerc_outcome));
    }

    // Built-in defaults, then [options.default], then the syntax table.
    let mut merged: HashMap<String, OptionValue> = OPTIONS_DEFAULT.clone();
    merged.extend(settings.options_for("default").flags);
    merged.extend(syntax_settings.flags);
    for fragment in build_style_flags(&merged, settings.indent()) {
        list.push_fragment(&fragment);
    }

    list.push_fragment(&additional);
    list.push_fragment(stylerc_outcome.fragment());
    Ok((list.join(), stylerc_outcome))
}

/// `[options.<mode>]` with `[options.<syntax>]` layered on top.
fn syntax_settings_for(syntax: &str, mode: &str, settings: &Settings) -> SyntaxOptions {
    let mode_settings = settings.options_for(mode);
    if syntax.is_empty() || syntax == mode {
        return mode_settings;
    }
    mode_settings.merged_with(&settings.options_for(syntax))
}

/// Render a flag table plus indentation preferences as `--key[=value]`
/// fragments. Keys are emitted in sorted order; `false` booleans are omitted.
fn build_style_flags(flags: &HashMap<String, OptionValue>, indent: IndentPrefs) -> Vec<String> {
    let mut keys: Vec<&String> = flags.keys().collect();
    keys.sort();

    let mut out = Vec::with_capacity(keys.len() + 2);
    for key in keys {
        match &flags[key.as_str()] {
            OptionValue::Bool(true) => out.push(format!("--{}", key)),
            OptionValue::Bool(false) => {}
            OptionValue::Int(n) => out.push(format!("--{}={}", key, n)),
            OptionValue::Str(s) => out.push(format!("--{}={}", key, s)),
        }
    }

    if indent.use_spaces {
        out.push(format!("--indent=spaces={}", indent.tab_size));
        out.push("--convert-tabs".to_string());
    } else {
        out.push("--indent=tab".to_string());
    }
    out
}
