//! Log file path resolution.
//!
//! The primary path is either configured explicitly or derived from two
//! identities: the host application and the module doing the logging.
//! Derivation degrades in tiers:
//!
//! ```text
//! <prefix>/<application>/<module>.log      both identities known
//! <prefix>/<module>/<module>.<pid>.log     application unknown
//! PathUnavailable                          module unknown, or no prefix
//! ```
//!
//! The backup path is always the primary path with [`BACKUP_SUFFIX`] appended.
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::LogFileError;

/// Suffix appended to the primary file name to form the backup path.
pub const BACKUP_SUFFIX: &str = ".0";

/// Name metadata for an application or module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Identity {
    /// Human-readable display name.
    pub name: Option<String>,
    /// Stable identifier (e.g. reverse-DNS or crate name).
    pub identifier: Option<String>,
}

impl Identity {
    /// Identity with only a display name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            identifier: None,
        }
    }

    /// Identity with only a stable identifier.
    #[must_use]
    pub fn identified(identifier: impl Into<String>) -> Self {
        Self {
            name: None,
            identifier: Some(identifier.into()),
        }
    }

    /// Identity of the running executable, taken from its file stem.
    ///
    /// Empty if the executable path cannot be determined.
    #[must_use]
    pub fn current_application() -> Self {
        let identifier = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .filter(|s| !s.is_empty());
        Self {
            name: None,
            identifier,
        }
    }
}

/// Return the display name of `identity`, falling back to its identifier.
///
/// Blank values count as missing.
#[must_use]
pub fn name_or_identifier(identity: &Identity) -> Option<&str> {
    fn usable(s: Option<&str>) -> Option<&str> {
        s.map(str::trim).filter(|s| !s.is_empty())
    }
    usable(identity.name.as_deref()).or_else(|| usable(identity.identifier.as_deref()))
}

/// Make a name safe to use as a single path component.
///
/// Separators become `_`, and `.` or `..` become `_` and `__` so the name
/// can never leave the prefix directory.
fn path_component(name: &str) -> String {
    if matches!(name, "." | "..") {
        return "_".repeat(name.len());
    }
    name.chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect()
}

/// Relative default path built from the application and module identities.
///
/// Returns `<app>/<module>.log`, or `<module>/<module>.<pid>.log` when the
/// application has no usable name, or `None` when the module has none.
#[must_use]
pub fn default_path_component(app: &Identity, module: &Identity, pid: u32) -> Option<PathBuf> {
    let module = path_component(name_or_identifier(module)?);
    let path = match name_or_identifier(app) {
        Some(app) => PathBuf::from(path_component(app)).join(format!("{module}.log")),
        None => PathBuf::from(&module).join(format!("{module}.{pid}.log")),
    };
    Some(path)
}

/// Default path under `prefix`. `None` if `prefix` is `None` or the module
/// has no usable name.
#[must_use]
pub fn default_path_with_prefix(
    prefix: Option<&Path>,
    app: &Identity,
    module: &Identity,
    pid: u32,
) -> Option<PathBuf> {
    Some(prefix?.join(default_path_component(app, module, pid)?))
}

/// Return the per-user log directory.
///
/// `$XDG_STATE_HOME/logs`, otherwise `~/.local/state/logs` using `HOME` or
/// `USERPROFILE`. `None` if none of those variables is set.
#[must_use]
pub fn default_log_dir() -> Option<PathBuf> {
    let state_dir = std::env::var_os("XDG_STATE_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var_os("HOME")
                .or_else(|| std::env::var_os("USERPROFILE"))
                .filter(|v| !v.is_empty())
                .map(|home| PathBuf::from(home).join(".local").join("state"))
        })?;
    Some(state_dir.join("logs"))
}

/// Resolve the primary log file path from `config`.
///
/// # Errors
///
/// Returns [`LogFileError::PathUnavailable`] when no path is configured and
/// the default chain cannot produce one.
pub fn resolve_primary_path(config: &Config) -> Result<PathBuf, LogFileError> {
    if let Some(path) = &config.path {
        return Ok(path.clone());
    }
    if name_or_identifier(&config.module).is_none() {
        return Err(LogFileError::PathUnavailable {
            reason: "module has neither a name nor an identifier",
        });
    }
    let prefix = config
        .path_prefix
        .clone()
        .or_else(default_log_dir)
        .ok_or(LogFileError::PathUnavailable {
            reason: "no log directory prefix",
        })?;
    default_path_with_prefix(
        Some(&prefix),
        &config.application,
        &config.module,
        std::process::id(),
    )
    .ok_or(LogFileError::PathUnavailable {
        reason: "module has neither a name nor an identifier",
    })
}

/// Backup path for `primary`: the full path with [`BACKUP_SUFFIX`] appended.
#[must_use]
pub fn backup_path(primary: &Path) -> PathBuf {
    let mut s = OsString::from(primary.as_os_str());
    s.push(BACKUP_SUFFIX);
    PathBuf::from(s)
}

/// The resolved primary and backup paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogPaths {
    /// Active log file.
    pub primary: PathBuf,
    /// Previous rotation generation.
    pub backup: PathBuf,
}

impl LogPaths {
    /// Resolve both paths from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`LogFileError::PathUnavailable`] if the primary path cannot
    /// be resolved.
    pub fn resolve(config: &Config) -> Result<Self, LogFileError> {
        let primary = resolve_primary_path(config)?;
        let backup = backup_path(&primary);
        Ok(Self { primary, backup })
    }
}

#[cfg(test)]
#[allow(unsafe_code)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn config_with(app: Identity, module: Identity, prefix: &str) -> Config {
        Config {
            path_prefix: Some(PathBuf::from(prefix)),
            application: app,
            module,
            ..Config::default()
        }
    }

    #[test]
    fn name_preferred_over_identifier() {
        let id = Identity {
            name: Some("Foo".to_string()),
            identifier: Some("com.example.foo".to_string()),
        };
        assert_eq!(name_or_identifier(&id), Some("Foo"));
    }

    #[test]
    fn identifier_used_when_name_missing_or_blank() {
        assert_eq!(
            name_or_identifier(&Identity::identified("com.example.foo")),
            Some("com.example.foo")
        );
        let blank = Identity {
            name: Some("  ".to_string()),
            identifier: Some("id".to_string()),
        };
        assert_eq!(name_or_identifier(&blank), Some("id"));
    }

    #[test]
    fn empty_identity_has_no_name() {
        assert_eq!(name_or_identifier(&Identity::default()), None);
    }

    #[test]
    fn component_with_both_identities() {
        let p = default_path_component(&Identity::named("App"), &Identity::named("Foo"), 7);
        assert_eq!(p, Some(PathBuf::from("App").join("Foo.log")));
    }

    #[test]
    fn component_without_application_uses_pid() {
        let p = default_path_component(&Identity::default(), &Identity::named("Foo"), 4242);
        assert_eq!(p, Some(PathBuf::from("Foo").join("Foo.4242.log")));
    }

    #[test]
    fn component_without_module_is_none() {
        assert_eq!(
            default_path_component(&Identity::named("App"), &Identity::default(), 1),
            None
        );
    }

    #[test]
    fn separators_in_names_are_replaced() {
        let p = default_path_component(&Identity::named("a/b"), &Identity::named("c\\d"), 1);
        assert_eq!(p, Some(PathBuf::from("a_b").join("c_d.log")));
    }

    #[test]
    fn dot_names_stay_inside_prefix() {
        let p = default_path_component(&Identity::named(".."), &Identity::named("Foo"), 1);
        assert_eq!(p, Some(PathBuf::from("__").join("Foo.log")));
        let p = default_path_component(&Identity::default(), &Identity::named("."), 9);
        assert_eq!(p, Some(PathBuf::from("_").join("_.9.log")));
        let prefixed = default_path_with_prefix(
            Some(Path::new("/logs")),
            &Identity::named(".."),
            &Identity::named(".."),
            1,
        )
        .unwrap();
        assert!(prefixed.starts_with("/logs"));
        assert!(
            prefixed
                .components()
                .all(|c| !matches!(c, std::path::Component::ParentDir))
        );
    }

    #[test]
    fn prefix_is_required() {
        assert_eq!(
            default_path_with_prefix(None, &Identity::named("App"), &Identity::named("Foo"), 1),
            None
        );
    }

    #[test]
    fn explicit_path_is_returned_verbatim() {
        let config = Config {
            module: Identity::default(),
            ..Config::with_path("relative/odd name.log")
        };
        assert_eq!(
            resolve_primary_path(&config).unwrap(),
            PathBuf::from("relative/odd name.log")
        );
    }

    #[test]
    fn resolves_app_and_module() {
        let config = config_with(Identity::named("App"), Identity::named("Foo"), "/logs");
        assert_eq!(
            resolve_primary_path(&config).unwrap(),
            PathBuf::from("/logs/App/Foo.log")
        );
    }

    #[test]
    fn resolves_module_only_with_pid() {
        let config = config_with(Identity::default(), Identity::named("Foo"), "/logs");
        let expected = PathBuf::from(format!("/logs/Foo/Foo.{}.log", std::process::id()));
        assert_eq!(resolve_primary_path(&config).unwrap(), expected);
    }

    #[test]
    fn missing_module_is_path_unavailable() {
        let config = config_with(Identity::named("App"), Identity::default(), "/logs");
        let err = resolve_primary_path(&config).unwrap_err();
        assert!(matches!(err, LogFileError::PathUnavailable { .. }));
    }

    #[test]
    fn backup_appends_suffix() {
        assert_eq!(
            backup_path(Path::new("/logs/App/Foo.log")),
            PathBuf::from("/logs/App/Foo.log.0")
        );
        assert_eq!(
            backup_path(Path::new("/logs/App/Foo.log")),
            backup_path(Path::new("/logs/App/Foo.log"))
        );
    }

    #[test]
    fn log_paths_are_distinct() {
        let paths = LogPaths::resolve(&Config::with_path("/tmp/a.log")).unwrap();
        assert_ne!(paths.primary, paths.backup);
        assert_eq!(paths.backup, PathBuf::from("/tmp/a.log.0"));
    }

    #[test]
    fn default_log_dir_prefers_xdg_state_home() {
        let _lock = ENV_MUTEX
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let saved = std::env::var_os("XDG_STATE_HOME");
        // SAFETY: test-only env var mutation; serialized via ENV_MUTEX.
        unsafe {
            std::env::set_var("XDG_STATE_HOME", "/state");
        }
        let dir = default_log_dir();
        // SAFETY: test-only env var mutation; serialized via ENV_MUTEX.
        unsafe {
            match saved {
                Some(v) => std::env::set_var("XDG_STATE_HOME", v),
                None => std::env::remove_var("XDG_STATE_HOME"),
            }
        }
        assert_eq!(dir, Some(PathBuf::from("/state/logs")));
    }
}
