//! # locsync - Localization file sync CLI
//!
//! `locsync` pushes source files to a translation management platform, pulls
//! translations back, and reports translation progress.
//!
//! ## Features
//!
//! - **Glob selection**: `*`, `**`, `?`, `[...]` and `{a,b}` over local paths and remote URIs
//! - **Per-file rules**: file type, parser directives and download paths per pattern
//! - **Concurrent downloads**: a bounded task pool (`--threads`)
//! - **Layered settings**: flag, then `LOCSYNC_*` variable, then config file, then default
//!
//! ## Quick Start
//!
//! ```bash
//! # Create locsync.yml
//! locsync init
//!
//! # Upload Android string resources
//! locsync files push 'res/values/*.xml'
//!
//! # Download French and German translations into out/
//! locsync files pull '**.xml' -l fr-FR -l de-DE -d out
//! ```
//!
//! ## Configuration
//!
//! ```yaml
//! account_id: a1b2c3
//! user_id: apiuser
//! project_id: 4f9e2a
//! threads: 8
//! files:
//!   default:
//!     pull:
//!       format: "{{.Locale}}/{{base .FileURI}}"
//!   "res/values/*.xml":
//!     push:
//!       type: android
//!       directives:
//!         placeholder_format: JAVA
//! ```

/// Platform client trait, wire types and the HTTP implementation.
pub mod api;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file handling and setting resolution.
pub mod config;

/// Errors of file operations and their exit codes.
pub mod error;

/// File system utilities.
pub mod fs;

/// Glob compilation and matching.
pub mod glob;

/// Reading file URIs from stdin.
pub mod input;

/// Diagnostic logging setup.
pub mod logging;

/// Output configuration (quiet mode, colors, stderr/stdout routing).
pub mod output;

/// XDG-style path utilities for configuration.
pub mod paths;

/// Bounded task pool for concurrent transfers.
pub mod pool;

/// Push, pull and remote file management.
pub mod sync;

/// Terminal UI components (spinner, progress bar, colors).
pub mod ui;
