//! Command-line interface definitions and handlers.

/// CLI argument parsing with clap.
pub mod args;

/// Subcommand implementations.
pub mod commands;

/// Config loading and setting resolution shared by commands.
pub mod context;

use exitcode::ExitCode;

pub use args::{Args, Command, FilesCommand, GlobalArgs, ProjectsCommand};
pub use context::{Context, FlagSources};

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::error::{SyncError, api_exit_code, config_exit_code};
use crate::output::Output;

/// Hint and exit code for the first classified error in the chain.
pub fn classify(err: &anyhow::Error) -> (Option<String>, ExitCode) {
    for cause in err.chain() {
        if let Some(err) = cause.downcast_ref::<SyncError>() {
            return (Some(err.hint()), err.exit_code());
        }
        if let Some(err) = cause.downcast_ref::<ConfigError>() {
            return (Some(err.hint()), config_exit_code(err));
        }
        if let Some(err) = cause.downcast_ref::<ApiError>() {
            return (Some(err.hint().to_string()), api_exit_code(err));
        }
    }
    (None, exitcode::SOFTWARE)
}

/// Prints the error chain and hint to stderr and returns the exit code.
pub fn report_error(err: &anyhow::Error, output: Output) -> ExitCode {
    let style = output.style();
    eprintln!("{} {err}", style.error("Error:"));
    for cause in err.chain().skip(1) {
        eprintln!("  {} {cause}", style.secondary("Caused by:"));
    }

    let (hint, code) = classify(err);
    if let Some(hint) = hint {
        eprintln!();
        eprintln!("{}", style.hint(hint));
    }
    code
}
