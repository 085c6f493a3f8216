//! Output configuration and utilities.
//!
//! An [`Output`] value is built once from the CLI flags and handed to every
//! command and to the sync core, instead of living in a global.
//!
//! ## Design Principles
//!
//! - Results (file lists, status tables) go to stdout (for piping)
//! - Status messages and progress go to stderr
//! - Errors always go to stderr
//! - Quiet mode suppresses non-essential output
//! - Colors can be disabled via flag or NO_COLOR environment variable

use std::fmt::Display;

use crate::ui::{Spinner, Style, TransferBar};

/// Output settings shared by commands.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    quiet: bool,
    color: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new(false, false)
    }
}

impl Output {
    /// `NO_COLOR` (https://no-color.org/) disables color as well as `no_color`.
    pub fn new(quiet: bool, no_color: bool) -> Self {
        Self {
            quiet,
            color: !no_color && std::env::var_os("NO_COLOR").is_none(),
        }
    }

    /// Silent, uncolored output, for tests and non-interactive callers.
    pub const fn silent() -> Self {
        Self {
            quiet: true,
            color: false,
        }
    }

    pub const fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub const fn style(&self) -> Style {
        Style::new(self.color)
    }

    /// Prints a status message to stderr unless quiet.
    pub fn status(&self, message: impl Display) {
        if !self.quiet {
            eprintln!("{message}");
        }
    }

    /// Prints a warning to stderr (always shown, even in quiet mode).
    pub fn warn(&self, message: impl Display) {
        eprintln!("{} {message}", self.style().warning("Warning:"));
    }

    /// Prints a non-fatal error to stderr (always shown).
    pub fn error(&self, message: impl Display) {
        eprintln!("{} {message}", self.style().error("Error:"));
    }

    pub fn spinner(&self, message: &str) -> Spinner {
        Spinner::new(message, !self.quiet)
    }

    pub fn transfer_bar(&self, total: usize) -> TransferBar {
        TransferBar::new(total as u64, !self.quiet)
    }
}
