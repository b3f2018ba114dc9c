use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub external: ExternalConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Ask before deleting a todo
    #[serde(default = "default_true")]
    pub confirm_delete: bool,
    /// Save the todo file after every change and on quit
    #[serde(default = "default_true")]
    pub autosave: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            confirm_delete: true,
            autosave: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// External programs used for notes. Unset fields fall back to the
/// environment, see [`ExternalConfig::editor_command`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalConfig {
    #[serde(default)]
    pub editor: Option<String>,
    #[serde(default)]
    pub pager: Option<String>,
}

impl ExternalConfig {
    /// config → $VISUAL → $EDITOR → vi
    pub fn editor_command(&self) -> String {
        self.editor
            .clone()
            .or_else(|| non_empty_env("VISUAL"))
            .or_else(|| non_empty_env("EDITOR"))
            .unwrap_or_else(|| "vi".to_string())
    }

    /// config → $PAGER → less
    pub fn pager_command(&self) -> String {
        self.pager
            .clone()
            .or_else(|| non_empty_env("PAGER"))
            .unwrap_or_else(|| "less".to_string())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Color overrides, e.g. `accent = "#FF9E64"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            colors: HashMap::new(),
        }
    }
}
