//! TOML configuration file parsing.
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::error::ConfigError;

/// Deserialize a TOML file into `T`.
///
/// A missing file deserializes from empty TOML, so every field takes its
/// `#[serde(default)]` value.
///
/// # Errors
///
/// Returns [`ConfigError::Read`] if the file exists but cannot be read, or
/// [`ConfigError::Parse`] if its contents do not match `T`.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    if !path.exists() {
        return parse_str("", &path.display().to_string());
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_str(&content, &path.display().to_string())
}

/// Deserialize TOML text into `T`, naming `origin` in any error.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if `content` does not match `T`.
pub fn parse_str<T: DeserializeOwned>(content: &str, origin: &str) -> Result<T, ConfigError> {
    toml::from_str(content).map_err(|source| ConfigError::Parse {
        origin: origin.to_string(),
        source,
    })
}
