//! Errors raised by file operations, and how they map to exit codes.

use std::fmt::Write as _;
use std::io;
use std::path::PathBuf;

use exitcode::ExitCode;
use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::glob::GlobError;
use crate::pool::PoolError;
use crate::sync::TemplateError;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("invalid pattern '{}'", .0.pattern())]
    Glob(#[from] GlobError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("invalid directive '{0}', expected key=value")]
    InvalidDirectiveFormat(String),

    #[error("conflicting parameters: {0}")]
    ConflictingParameters(String),

    #[error("cannot determine the file type of {path}")]
    UnknownFileType { path: String },

    #[error("no files match '{pattern}'")]
    NoFilesMatched { pattern: String },

    #[error("failed to read file URIs from stdin")]
    StdinRead(#[source] io::Error),

    #[error("{context}")]
    Api {
        context: String,
        #[source]
        source: ApiError,
    },

    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error("failed to access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to upload {} file(s): {}", files.len(), files.join(", "))]
    PushFailed { files: Vec<String> },

    #[error("failed to delete {} file(s): {}", files.len(), files.join(", "))]
    DeleteFailed { files: Vec<String> },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SyncError {
    pub fn api(context: impl Into<String>, source: ApiError) -> Self {
        Self::Api {
            context: context.into(),
            source,
        }
    }

    /// The API error behind this one, if any.
    pub const fn api_source(&self) -> Option<&ApiError> {
        match self {
            Self::Api { source, .. } => Some(source),
            _ => None,
        }
    }

    pub fn hint(&self) -> String {
        match self {
            Self::Glob(_) => {
                "Patterns support *, **, ?, [abc], [!abc] and {a,b}; escape literals with \\."
                    .to_string()
            }
            Self::Template(err) => err.hint(),
            Self::InvalidDirectiveFormat(_) => {
                "Pass directives as --directive key=value, e.g. --directive placeholder_format=C"
                    .to_string()
            }
            Self::ConflictingParameters(_) => {
                "Drop one of the conflicting options and run the command again.".to_string()
            }
            Self::UnknownFileType { .. } => {
                "Pass --type, or set push.type for the file's pattern in locsync.yml.".to_string()
            }
            Self::NoFilesMatched { .. } => {
                "Check the pattern; run 'locsync files list' to see remote file URIs.".to_string()
            }
            Self::StdinRead(_) => "Pipe one file URI per line when passing '-'.".to_string(),
            Self::Api { source, .. } => source.hint().to_string(),
            Self::Pool(_) => "Use --threads 1 or higher.".to_string(),
            Self::Io { .. } => {
                "Check that the path exists and that you have permission to access it.".to_string()
            }
            Self::PushFailed { files } | Self::DeleteFailed { files } => {
                let mut hint = String::from("Re-run the command for the failed files:");
                for file in files {
                    let _ = write!(hint, "\n  - {file}");
                }
                hint
            }
            Self::Config(err) => err.hint(),
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Glob(_)
            | Self::Template(_)
            | Self::InvalidDirectiveFormat(_)
            | Self::ConflictingParameters(_)
            | Self::UnknownFileType { .. }
            | Self::Pool(_) => exitcode::USAGE,
            Self::NoFilesMatched { .. } | Self::StdinRead(_) => exitcode::NOINPUT,
            Self::Api { source, .. } => api_exit_code(source),
            Self::Io { .. } => exitcode::IOERR,
            Self::PushFailed { .. } | Self::DeleteFailed { .. } => exitcode::SOFTWARE,
            Self::Config(err) => config_exit_code(err),
        }
    }
}

/// Exit code for an API failure.
pub const fn api_exit_code(err: &ApiError) -> ExitCode {
    match err {
        ApiError::NotAuthorized(_) => exitcode::NOPERM,
        ApiError::NotFound(_) => exitcode::NOINPUT,
        ApiError::Api { .. } | ApiError::Transport(_) => exitcode::UNAVAILABLE,
    }
}

/// Exit code for a configuration failure.
pub const fn config_exit_code(err: &ConfigError) -> ExitCode {
    match err {
        ConfigError::InvalidBoolean { .. }
        | ConfigError::InvalidNumber { .. }
        | ConfigError::MissingValue { .. }
        | ConfigError::ZeroThreads => exitcode::USAGE,
        _ => exitcode::CONFIG,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_failed_lists_every_file() {
        let err = SyncError::PushFailed {
            files: vec!["a.json".to_string(), "b.json".to_string()],
        };
        assert_eq!(err.to_string(), "failed to upload 2 file(s): a.json, b.json");
        assert!(err.hint().contains("  - b.json"));
        assert_eq!(err.exit_code(), exitcode::SOFTWARE);
    }

    #[test]
    fn test_api_error_keeps_source_and_hint() {
        let err = SyncError::api(
            "failed to upload a.json",
            ApiError::api("MAINTENANCE_MODE_ERROR", "down"),
        );
        assert!(err.api_source().is_some_and(ApiError::is_fatal));
        assert!(err.hint().contains("maintenance"));
        assert_eq!(err.exit_code(), exitcode::UNAVAILABLE);
    }

    #[test]
    fn test_user_input_errors_are_usage() {
        assert_eq!(
            SyncError::InvalidDirectiveFormat("foo".into()).exit_code(),
            exitcode::USAGE
        );
        assert_eq!(
            SyncError::NoFilesMatched {
                pattern: "*.po".into()
            }
            .exit_code(),
            exitcode::NOINPUT
        );
    }
}
