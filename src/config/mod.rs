//! Log sink configuration.
//!
//! A [`Config`] is built once (from TOML or in code) and handed to
//! [`LogFile::new`](crate::LogFile::new), which owns it for the rest of the
//! process. Nothing mutates it afterwards.
pub mod toml_loader;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::paths::Identity;

/// Default rotation threshold: 2 MiB.
pub const DEFAULT_MAX_SIZE: u64 = 2 * 1024 * 1024;

/// Resolved log sink options.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Explicit log file path. Overrides default path derivation.
    pub path: Option<PathBuf>,
    /// Directory under which a default path is derived.
    pub path_prefix: Option<PathBuf>,
    /// Identity of the host application.
    pub application: Identity,
    /// Identity of the module doing the logging.
    pub module: Identity,
    /// Append to an existing log file on the first open instead of truncating.
    pub append_to_existing: bool,
    /// Rotation threshold in bytes; `0` disables rotation.
    pub max_size: u64,
    /// Mirror every formatted line to stderr.
    pub mirror_to_stderr: bool,
    /// Escape control characters in message bodies.
    pub escape_special_characters: bool,
    /// Include the source file name.
    pub show_file_names: bool,
    /// Include the source line number.
    pub show_line_numbers: bool,
    /// Include the function name.
    pub show_function_names: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: None,
            path_prefix: None,
            application: Identity::current_application(),
            module: Identity::named(env!("CARGO_PKG_NAME")),
            append_to_existing: false,
            max_size: DEFAULT_MAX_SIZE,
            mirror_to_stderr: false,
            escape_special_characters: false,
            show_file_names: true,
            show_line_numbers: true,
            show_function_names: true,
        }
    }
}

impl Config {
    /// Configuration writing to an explicit path with default options.
    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file. A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or fails
    /// [`validate`](Self::validate).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml_loader::load_config(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text does not parse or fails
    /// [`validate`](Self::validate).
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml_loader::parse_str(content, "<string>")?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that parse but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an explicitly empty `path` or
    /// `path-prefix`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
            return Err(ConfigError::Invalid {
                key: "path",
                message: "must not be empty".to_string(),
            });
        }
        if self
            .path_prefix
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(ConfigError::Invalid {
                key: "path-prefix",
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Whether size-based rotation is active.
    #[must_use]
    pub const fn rotation_enabled(&self) -> bool {
        self.max_size > 0
    }
}
