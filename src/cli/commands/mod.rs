//! Subcommand implementations.

/// File listing, status, push, pull, rename and delete.
pub mod files;

/// Init command handler.
pub mod init;

/// Project inspection command handlers.
pub mod projects;
