mod types;

pub use types::{EngineConfig, IndentPrefs, OptionValue, Settings, SyntaxOptions};

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;

/// Built-in formatter option defaults, the lowest settings layer.
/// Overridable through `[options.default]`.
pub static OPTIONS_DEFAULT: Lazy<HashMap<String, OptionValue>> = Lazy::new(|| {
    serde_json::from_str(include_str!("options_default.json"))
        .unwrap_or_else(|e| panic!("embedded options_default.json is invalid: {}", e))
});

/// Load settings from `path`, or from the nearest `restyle.toml` walking up
/// from the current directory, or empty settings when neither exists.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, String> {
    if let Some(p) = path {
        let content =
            std::fs::read_to_string(p).map_err(|e| format!("Failed to read settings file: {}", e))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse settings: {}", e))
    } else if let Some(found) = find_settings_file() {
        let content = std::fs::read_to_string(&found)
            .map_err(|e| format!("Failed to read settings file: {}", e))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse settings: {}", e))
    } else {
        Ok(Settings::default())
    }
}

fn find_settings_file() -> Option<std::path::PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let settings_path = current.join("restyle.toml");
        if settings_path.exists() {
            return Some(settings_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_defaults_parse() {
        assert_eq!(
            OPTIONS_DEFAULT.get("style"),
            Some(&OptionValue::Str("allman".to_string()))
        );
    }

    #[test]
    fn test_settings_from_toml() {
        let settings: Settings = toml::from_str(
            r#"
            autoformat_on_save = true

            [engine]
            command = "astyle"
            timeout_secs = 5

            [syntax_mode_mapping]
            arduino = "c"

            [options.c]
            additional_options = ["--indent=spaces=2"]
            style = "google"
            indent-switches = true
            "#,
        )
        .unwrap();

        assert!(settings.autoformat_on_save());
        assert_eq!(settings.engine().timeout_secs, 5);
        assert_eq!(settings.syntax_mode_mapping["arduino"], "c");
        let c = settings.options_for("c");
        assert_eq!(
            c.additional_options.as_deref(),
            Some(&["--indent=spaces=2".to_string()][..])
        );
        assert_eq!(c.flags["style"], OptionValue::Str("google".to_string()));
        assert_eq!(c.flags["indent-switches"], OptionValue::Bool(true));
    }

    #[test]
    fn test_project_layer_wins() {
        let global: Settings = toml::from_str(
            r#"
            debug = true

            [options.c]
            style = "allman"
            pad-oper = true
            "#,
        )
        .unwrap();
        let project: Settings = toml::from_str(
            r#"
            [options.c]
            style = "google"
            "#,
        )
        .unwrap();

        let layered = global.layered(&project);
        // Project leaves debug unset, so the global value survives.
        assert!(layered.debug());
        let c = layered.options_for("c");
        assert_eq!(c.flags["style"], OptionValue::Str("google".to_string()));
        assert_eq!(c.flags["pad-oper"], OptionValue::Bool(true));
    }
}
