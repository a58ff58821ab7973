// src/core/settings.rs

//! Loading and persistence of `settings.toml`.

use crate::{
    constants::{
        CONFIG_FILENAME, CREDENTIALS_FILENAME, DEFAULT_ACCOUNTS_FOLDER, DEFAULT_MODULES_FOLDER,
        DEFAULT_PROVIDER_FILENAME, DEFAULT_PROVIDERS_FOLDER, DEFAULT_TOOL,
    },
    core::paths::{self, PathError},
    system::path_translator::ExecutionEnvironment,
};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Path Error: {0}")]
    Path(#[from] PathError),
    #[error("Failed to parse settings file: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Failed to serialize settings to TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Process-wide configuration. Every field has a default, so a partial file is valid.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Root of the managed tree. Relative values are taken from the home directory.
    pub root_path: Option<String>,
    pub accounts_folder: String,
    pub modules_folder: String,
    pub providers_folder: String,
    /// File inside each account directory holding its provider block.
    pub provider_file: String,
    /// The provisioning tool to launch.
    pub tool: String,
    pub execution_environment: ExecutionEnvironment,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_path: None,
            accounts_folder: DEFAULT_ACCOUNTS_FOLDER.to_string(),
            modules_folder: DEFAULT_MODULES_FOLDER.to_string(),
            providers_folder: DEFAULT_PROVIDERS_FOLDER.to_string(),
            provider_file: DEFAULT_PROVIDER_FILENAME.to_string(),
            tool: DEFAULT_TOOL.to_string(),
            execution_environment: ExecutionEnvironment::default(),
        }
    }
}

impl Settings {
    /// Default settings rooted at an explicit directory, running natively.
    pub fn for_root(root: impl AsRef<Path>) -> Self {
        Self {
            root_path: Some(root.as_ref().to_string_lossy().into_owned()),
            execution_environment: ExecutionEnvironment::Native,
            ..Self::default()
        }
    }

    /// The absolute root folder. Fails when expansion or the home directory lookup fails.
    pub fn root_path(&self) -> Result<PathBuf, PathError> {
        paths::resolve_root_path(self.root_path.as_deref())
    }

    /// Every location of the managed tree, under the resolved root.
    pub fn paths(&self) -> Result<TreePaths, PathError> {
        Ok(self.paths_under(self.root_path()?))
    }

    /// Every location of the managed tree, under an already resolved `root`.
    pub fn paths_under(&self, root: impl Into<PathBuf>) -> TreePaths {
        let root = root.into();
        let providers = root.join(&self.providers_folder);
        TreePaths {
            accounts: root.join(&self.accounts_folder),
            modules: root.join(&self.modules_folder),
            credentials_file: providers.join(CREDENTIALS_FILENAME),
            config_file: providers.join(CONFIG_FILENAME),
            providers,
            root,
        }
    }
}

/// Absolute locations derived from [`Settings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreePaths {
    pub root: PathBuf,
    pub accounts: PathBuf,
    pub modules: PathBuf,
    pub providers: PathBuf,
    pub credentials_file: PathBuf,
    pub config_file: PathBuf,
}

/// Loads settings from `path`, or from the default location when `None`.
/// A missing file is created with the defaults and those defaults are returned.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, SettingsError> {
    let settings_path = match path {
        Some(p) => p.to_path_buf(),
        None => paths::get_settings_path()?,
    };

    if !settings_path.exists() {
        log::debug!(
            "No settings at '{}'. Writing defaults.",
            settings_path.display()
        );
        let defaults = Settings::default();
        save_settings(&settings_path, &defaults)?;
        return Ok(defaults);
    }

    let content = fs::read_to_string(&settings_path)?;
    let settings: Settings = toml::from_str(&content)?;
    log::debug!("Loaded settings from '{}'", settings_path.display());
    Ok(settings)
}

pub fn save_settings(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let toml_string = toml::to_string_pretty(settings)?;
    fs::write(path, toml_string)?;
    Ok(())
}
