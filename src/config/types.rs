use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single formatter option value as it appears in settings files.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

/// Option table for one formatting mode or syntax (`[options.<name>]`).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SyntaxOptions {
    /// Path to a stylerc file of extra option fragments; env-vars allowed.
    pub additional_options_file: Option<String>,
    /// Extra option strings appended verbatim.
    pub additional_options: Option<Vec<String>>,
    /// When true, defaults are never consulted for this syntax.
    pub use_only_additional_options: Option<bool>,
    /// Remaining keys map straight to `--key[=value]` formatter flags.
    #[serde(flatten)]
    pub flags: HashMap<String, OptionValue>,
}

impl SyntaxOptions {
    /// Layer `over` on top of `self`; keys present in `over` win.
    pub fn merged_with(&self, over: &SyntaxOptions) -> SyntaxOptions {
        let mut flags = self.flags.clone();
        flags.extend(over.flags.iter().map(|(k, v)| (k.clone(), v.clone())));
        SyntaxOptions {
            additional_options_file: over
                .additional_options_file
                .clone()
                .or_else(|| self.additional_options_file.clone()),
            additional_options: over
                .additional_options
                .clone()
                .or_else(|| self.additional_options.clone()),
            use_only_additional_options: over
                .use_only_additional_options
                .or(self.use_only_additional_options),
            flags,
        }
    }
}

/// External formatter process configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Executable invoked with the resolved option string.
    pub command: String,
    /// Seconds to wait before killing an unresponsive formatter.
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            command: "astyle".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Editor indentation preferences fed into the option resolver.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct IndentPrefs {
    /// Translate tabs to spaces (`--indent=spaces=N`, `--convert-tabs`).
    pub use_spaces: bool,
    pub tab_size: usize,
}

impl Default for IndentPrefs {
    fn default() -> Self {
        IndentPrefs {
            use_spaces: false,
            tab_size: 4,
        }
    }
}

/// One settings layer. Scalars stay `None` when a file omits them so that
/// layering can tell "unset" from "set to the default value".
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub autoformat_on_save: Option<bool>,
    pub debug: Option<bool>,
    pub engine: Option<EngineConfig>,
    pub indent: Option<IndentPrefs>,
    /// User additions to the built-in syntax → mode mapping.
    pub syntax_mode_mapping: HashMap<String, String>,
    /// Option tables keyed by "default", a mode name, or a syntax name.
    pub options: HashMap<String, SyntaxOptions>,
}

impl Settings {
    /// Layer `project` on top of `self` (the global layer); project wins.
    pub fn layered(&self, project: &Settings) -> Settings {
        let mut options = self.options.clone();
        for (name, over) in &project.options {
            let merged = match options.get(name) {
                Some(base) => base.merged_with(over),
                None => over.clone(),
            };
            options.insert(name.clone(), merged);
        }
        let mut syntax_mode_mapping = self.syntax_mode_mapping.clone();
        syntax_mode_mapping.extend(
            project
                .syntax_mode_mapping
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        Settings {
            autoformat_on_save: project.autoformat_on_save.or(self.autoformat_on_save),
            debug: project.debug.or(self.debug),
            engine: project.engine.clone().or_else(|| self.engine.clone()),
            indent: project.indent.or(self.indent),
            syntax_mode_mapping,
            options,
        }
    }

    pub fn autoformat_on_save(&self) -> bool {
        self.autoformat_on_save.unwrap_or(false)
    }

    pub fn debug(&self) -> bool {
        self.debug.unwrap_or(false)
    }

    pub fn engine(&self) -> EngineConfig {
        self.engine.clone().unwrap_or_default()
    }

    pub fn indent(&self) -> IndentPrefs {
        self.indent.unwrap_or_default()
    }

    /// Option table for `name` ("default", mode, or syntax), empty if unset.
    pub fn options_for(&self, name: &str) -> SyntaxOptions {
        self.options.get(name).cloned().unwrap_or_default()
    }
}
