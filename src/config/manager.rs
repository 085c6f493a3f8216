use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::ConfigError;
use super::rules::FileRules;
use crate::fs::atomic_write;
use crate::paths;

/// The complete configuration file structure.
///
/// Corresponds to `locsync.yml` (project) or `~/.config/locsync/config.yml` (user).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// API user identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// API token secret (prefer `LOCSYNC_SECRET` over storing it here).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Number of concurrent transfers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<u32>,
    /// API base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Per-pattern push/pull settings, in file order.
    #[serde(default, skip_serializing_if = "FileRules::is_empty")]
    pub files: FileRules,
}

/// Manages locating, loading and saving the configuration file.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
    explicit: bool,
}

impl ConfigManager {
    /// Uses `path` if given, otherwise discovers the config file.
    ///
    /// Discovery order:
    /// 1. `locsync.yml` in the current directory or any parent
    /// 2. `$XDG_CONFIG_HOME/locsync/config.yml` (or `~/.config/locsync/config.yml`)
    pub fn new(path: Option<&Path>) -> Self {
        if let Some(path) = path {
            return Self::at(path);
        }

        let config_path = std::env::current_dir()
            .ok()
            .and_then(|cwd| paths::find_project_config(&cwd))
            .unwrap_or_else(paths::user_config_path);

        Self {
            config_path,
            explicit: false,
        }
    }

    /// Uses exactly `path`; a missing file is an error on load.
    pub fn at(path: &Path) -> Self {
        Self {
            config_path: path.to_path_buf(),
            explicit: true,
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile, ConfigError> {
        let contents = fs::read_to_string(&self.config_path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: self.config_path.clone(),
                }
            } else {
                ConfigError::Read {
                    path: self.config_path.clone(),
                    source,
                }
            }
        })?;

        if contents.trim().is_empty() {
            return Ok(ConfigFile::default());
        }

        serde_yml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: self.config_path.clone(),
            source,
        })
    }

    /// Loads the config, treating a missing discovered file as empty.
    ///
    /// A file given explicitly with `--config` must exist.
    pub fn load_or_default(&self) -> Result<ConfigFile, ConfigError> {
        match self.load() {
            Err(ConfigError::NotFound { .. }) if !self.explicit => {
                tracing::debug!(path = %self.config_path.display(), "no config file, using defaults");
                Ok(ConfigFile::default())
            }
            other => other,
        }
    }

    pub fn save(&self, config: &ConfigFile) -> Result<(), ConfigError> {
        if let Some(parent) = self.config_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let contents = serde_yml::to_string(config).map_err(ConfigError::Serialize)?;

        atomic_write(&self.config_path, contents.as_bytes()).map_err(|source| ConfigError::Write {
            path: self.config_path.clone(),
            source,
        })
    }
}
