use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Persisted TUI state (written to .state.json)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UiState {
    /// 1-based highlighted position
    #[serde(default)]
    pub highlighted: usize,
    /// 1-based first visible position
    #[serde(default)]
    pub first_visible: usize,
    /// Last search pattern
    #[serde(default)]
    pub last_search: Option<String>,
}

/// Read .state.json. Missing or malformed state is `None`.
pub fn read_ui_state(path: &Path) -> Option<UiState> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

pub fn write_ui_state(path: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let content = serde_json::to_string_pretty(state)?;
    fs::write(path, content)
}
