//! Consistent styling utilities for CLI output.
//!
//! Provides color and formatting helpers using owo-colors. A `Style` built
//! with color disabled returns text unchanged.

use owo_colors::OwoColorize;
use std::fmt::Display;

/// Styles for different semantic elements.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    color: bool,
}

impl Style {
    pub const fn new(color: bool) -> Self {
        Self { color }
    }

    pub const fn plain() -> Self {
        Self { color: false }
    }

    fn paint<T: Display>(self, text: T, colored: impl FnOnce(&T) -> String) -> String {
        if self.color {
            colored(&text)
        } else {
            text.to_string()
        }
    }

    /// Style for section headers (e.g., "Project", "Files")
    pub fn header<T: Display>(self, text: T) -> String {
        self.paint(text, |t| t.bold().to_string())
    }

    /// Style for labels/keys (e.g., "project", "locale")
    pub fn label<T: Display>(self, text: T) -> String {
        self.paint(text, |t| t.dimmed().to_string())
    }

    /// Style for primary values (e.g., file URIs, project names)
    pub fn value<T: Display>(self, text: T) -> String {
        self.paint(text, |t| t.cyan().to_string())
    }

    /// Style for secondary/supplementary info (e.g., timestamps, paths)
    pub fn secondary<T: Display>(self, text: T) -> String {
        self.paint(text, |t| t.dimmed().to_string())
    }

    pub fn success<T: Display>(self, text: T) -> String {
        self.paint(text, |t| t.green().to_string())
    }

    pub fn error<T: Display>(self, text: T) -> String {
        self.paint(text, |t| t.red().bold().to_string())
    }

    pub fn warning<T: Display>(self, text: T) -> String {
        self.paint(text, |t| t.yellow().to_string())
    }

    /// Style for locale codes
    pub fn code<T: Display>(self, text: T) -> String {
        self.paint(text, |t| t.yellow().to_string())
    }

    /// Style for hints/help text
    pub fn hint<T: Display>(self, text: T) -> String {
        self.paint(text, |t| t.dimmed().italic().to_string())
    }
}
