// src/core/paths.rs

use crate::constants::{APP_CONFIG_DIR, DEFAULT_ROOT_FOLDER, SETTINGS_FILENAME};
use lazy_static::lazy_static;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

lazy_static! {
    static ref APP_CONFIG_PATH: Mutex<Option<PathBuf>> = Mutex::new(None);
}

#[derive(Error, Debug)]
pub enum PathError {
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    #[error("Could not find the home directory needed to resolve the root folder.")]
    HomeDirNotFound,
    #[error("Could not expand root path '{raw}': {message}")]
    PathExpansion { raw: String, message: String },
    #[error("Could not create config directory at '{path}': {source}")]
    ConfigDirCreation {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Returns the path to the tfexplorer configuration directory (`~/.config/tfexplorer`).
/// Creates it if it doesn't exist.
///
/// Memoized: the first call computes and caches the path.
pub fn get_app_config_dir() -> Result<PathBuf, PathError> {
    let mut cached_path_guard = APP_CONFIG_PATH
        .lock()
        .unwrap_or_else(PoisonError::into_inner);

    if let Some(path) = &*cached_path_guard {
        return Ok(path.clone());
    }

    let config_path = dirs::config_dir()
        .ok_or(PathError::ConfigDirNotFound)?
        .join(APP_CONFIG_DIR);

    if !config_path.exists() {
        fs::create_dir_all(&config_path).map_err(|e| PathError::ConfigDirCreation {
            path: config_path.display().to_string(),
            source: e,
        })?;
    }

    *cached_path_guard = Some(config_path.clone());
    Ok(config_path)
}

/// Returns the path to the default `settings.toml`.
pub fn get_settings_path() -> Result<PathBuf, PathError> {
    get_app_config_dir().map(|dir| dir.join(SETTINGS_FILENAME))
}

/// Resolves the configured root folder into an absolute path.
///
/// `~` and environment variables are expanded. A relative result is taken to be
/// relative to the user's home directory; `None` or a blank value selects the
/// default folder under home.
pub fn resolve_root_path(configured: Option<&str>) -> Result<PathBuf, PathError> {
    resolve_root_path_from(configured, dirs::home_dir())
}

fn resolve_root_path_from(
    configured: Option<&str>,
    home: Option<PathBuf>,
) -> Result<PathBuf, PathError> {
    let raw = match configured.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => raw,
        None => return Ok(home.ok_or(PathError::HomeDirNotFound)?.join(DEFAULT_ROOT_FOLDER)),
    };

    let expanded = shellexpand::full(raw).map_err(|e| PathError::PathExpansion {
        raw: raw.to_string(),
        message: e.to_string(),
    })?;

    let path = Path::new(expanded.as_ref());
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(home.ok_or(PathError::HomeDirNotFound)?.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_root_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().to_string_lossy().to_string();
        assert_eq!(resolve_root_path(Some(&raw)).unwrap(), dir.path());
    }

    #[test]
    fn test_blank_root_uses_default_folder() {
        let home = PathBuf::from("/home/alice");
        let resolved = resolve_root_path_from(Some("   "), Some(home.clone())).unwrap();
        assert_eq!(resolved, home.join(DEFAULT_ROOT_FOLDER));
        assert_eq!(resolve_root_path_from(None, Some(home)).unwrap(), resolved);
    }

    #[test]
    fn test_relative_root_is_joined_onto_home() {
        let home = PathBuf::from("/home/alice");
        let resolved = resolve_root_path_from(Some("infra/tf"), Some(home.clone())).unwrap();
        assert_eq!(resolved, home.join("infra/tf"));
    }

    #[test]
    fn test_missing_home_is_an_error_only_when_needed() {
        assert!(matches!(
            resolve_root_path_from(None, None),
            Err(PathError::HomeDirNotFound)
        ));
        assert!(matches!(
            resolve_root_path_from(Some("infra/tf"), None),
            Err(PathError::HomeDirNotFound)
        ));

        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().to_string_lossy().to_string();
        assert_eq!(resolve_root_path_from(Some(&raw), None).unwrap(), dir.path());
    }

    #[test]
    fn test_unset_variable_is_an_expansion_error() {
        let result = resolve_root_path(Some("$TFEXPLORER_UNSET_ROOT_VARIABLE/tf"));
        match result {
            Err(PathError::PathExpansion { raw, .. }) => {
                assert_eq!(raw, "$TFEXPLORER_UNSET_ROOT_VARIABLE/tf");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
