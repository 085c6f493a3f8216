//! Configuration file handling and setting resolution.

mod manager;
mod resolver;
mod rules;

use std::path::PathBuf;
use thiserror::Error;

pub use manager::{ConfigFile, ConfigManager};
pub use resolver::{ConfigResolver, ENV_PREFIX, EffectiveParam, Flag, Source, env_var_name};
pub use rules::{DEFAULT_RULE, FileConfig, FileConfigRule, FileRules, PullConfig, PushConfig};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read config file: {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },
    #[error("failed to write config file: {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize config")]
    Serialize(#[source] serde_yml::Error),
    #[error("invalid boolean value '{value}' in {name}")]
    InvalidBoolean { name: String, value: String },
    #[error("invalid number '{value}' in {name}")]
    InvalidNumber { name: String, value: String },
    #[error("missing required setting '{key}'")]
    MissingValue { key: &'static str, flag: &'static str },
    #[error("threads must be at least 1")]
    ZeroThreads,
}

impl ConfigError {
    /// An actionable suggestion for the user, separate from the cause.
    pub fn hint(&self) -> String {
        match self {
            Self::NotFound { .. } => {
                "Check the --config path, or run 'locsync init' to create locsync.yml.".to_string()
            }
            Self::Read { .. } | Self::Write { .. } => {
                "Check that the file exists and that you have permission to access it.".to_string()
            }
            Self::Parse { .. } | Self::Serialize(_) => {
                "The config file must be valid YAML; see 'locsync init' for a template.".to_string()
            }
            Self::InvalidBoolean { name, .. } => {
                format!("Set {name} to one of: true, false, 1, 0, yes, no, on, off.")
            }
            Self::InvalidNumber { name, .. } => format!("Set {name} to a positive integer."),
            Self::MissingValue { key, flag } => format!(
                "Provide it via:\n  \
                 - CLI option: --{flag} <value>\n  \
                 - Environment: {}\n  \
                 - Config file: {key}: <value>",
                env_var_name(flag)
            ),
            Self::ZeroThreads => "Use --threads 1 or higher.".to_string(),
        }
    }
}
