//! XDG-style path utilities for configuration files.
//!
//! This module provides consistent path resolution across platforms,
//! preferring XDG Base Directory Specification conventions over
//! OS-specific locations.

use std::path::{Path, PathBuf};

/// File name of a project-level config file.
pub const PROJECT_CONFIG_NAME: &str = "locsync.yml";

/// Returns the configuration directory for locsync.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/locsync` if `XDG_CONFIG_HOME` is set
/// 2. `~/.config/locsync` otherwise
///
/// # Panics
///
/// Panics if the home directory cannot be determined.
pub fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME").map_or_else(
        |_| home_dir().join(".config").join("locsync"),
        |xdg| PathBuf::from(xdg).join("locsync"),
    )
}

/// Returns the user-level config file path.
pub fn user_config_path() -> PathBuf {
    config_dir().join("config.yml")
}

/// Finds the nearest `locsync.yml` in `start` or any of its ancestors.
pub fn find_project_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(PROJECT_CONFIG_NAME))
        .find(|candidate| candidate.is_file())
}

/// Returns the user's home directory.
///
/// # Panics
///
/// Panics if the home directory cannot be determined.
#[allow(clippy::expect_used)]
fn home_dir() -> PathBuf {
    dirs::home_dir().expect("Failed to determine home directory")
}
