use std::fs;
use std::path::{Path, PathBuf};

use crate::io::todo_io::DataDir;
use crate::model::config::Config;

/// Error type for reading config.toml
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Where config.toml is looked up: the data directory first, then the
/// platform config directory.
pub fn config_candidates(dir: &DataDir) -> Vec<PathBuf> {
    let mut paths = vec![dir.config_path()];
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("ticklist").join("config.toml"));
    }
    paths
}

/// Load the first config.toml that exists. None existing means defaults.
pub fn load_config(dir: &DataDir) -> Result<Config, ConfigError> {
    match config_candidates(dir).into_iter().find(|p| p.is_file()) {
        Some(path) => read_config(&path),
        None => Ok(Config::default()),
    }
}

pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    log::info!("loaded config from {}", path.display());
    Ok(config)
}
