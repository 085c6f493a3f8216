//! Orchestration of multi-file operations against a project.
//!
//! [`FileSync`] owns every collaborator a command needs: the platform client,
//! the per-file rules, the setting resolver, both caches and the output
//! settings. Pull and status fan out through a [`TaskPool`]; push and delete
//! run one file at a time so a fatal error stops them immediately.

mod local;
mod pull;
mod push;
mod template;

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use crate::api::{ApiError, FileStatus, PlatformClient, RemoteFile};
use crate::config::{ConfigResolver, FileRules};
use crate::error::SyncError;
use crate::glob::{MATCH_ALL, PatternCache, URI_SEPARATOR};
use crate::input::InputReader;
use crate::output::Output;
use crate::pool::TaskPool;

pub use local::{LocalFile, find_local_files};
pub use pull::{DEFAULT_PULL_FORMAT, PullParams, PullSummary, SOURCE_PULL_FORMAT};
pub use push::{PushParams, PushSummary, parse_directives};
pub use template::{PathTemplate, TemplateCache, TemplateError, TemplateVars};

/// Argument that makes a command read file URIs from stdin.
pub const STDIN_ARG: &str = "-";

/// Which remote files a command works on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSelector {
    /// Every remote file whose URI matches the glob.
    Pattern(String),
    /// Exactly these URIs, without listing or matching.
    Listed(Vec<String>),
}

impl FileSelector {
    /// `-` reads URIs from stdin; anything else is a pattern (empty means all).
    pub fn from_arg(arg: Option<&str>) -> Result<Self, SyncError> {
        match arg {
            Some(STDIN_ARG) => InputReader::read_stdin_uris()
                .map(Self::Listed)
                .map_err(SyncError::StdinRead),
            Some(pattern) => Ok(Self::Pattern(pattern.to_string())),
            None => Ok(Self::Pattern(String::new())),
        }
    }

    fn describe(&self) -> &str {
        match self {
            Self::Pattern(pattern) if pattern.is_empty() => MATCH_ALL,
            Self::Pattern(pattern) => pattern,
            Self::Listed(_) => STDIN_ARG,
        }
    }
}

/// Per-file results of [`FileSync::status`].
#[derive(Debug, Default)]
pub struct StatusReport {
    pub entries: Vec<(RemoteFile, FileStatus)>,
    /// URIs whose status could not be fetched.
    pub failed: Vec<String>,
}

/// Runs file operations for one project.
pub struct FileSync {
    client: Arc<dyn PlatformClient>,
    project_id: String,
    threads: u32,
    rules: FileRules,
    resolver: ConfigResolver,
    patterns: PatternCache,
    templates: TemplateCache,
    output: Output,
    base_dir: PathBuf,
}

impl FileSync {
    pub fn new(client: Arc<dyn PlatformClient>, project_id: impl Into<String>) -> Self {
        Self {
            client,
            project_id: project_id.into(),
            threads: 1,
            rules: FileRules::new(),
            resolver: ConfigResolver::from_env(),
            patterns: PatternCache::new(),
            templates: TemplateCache::new(),
            output: Output::default(),
            base_dir: PathBuf::from("."),
        }
    }

    #[must_use]
    pub const fn with_threads(mut self, threads: u32) -> Self {
        self.threads = threads;
        self
    }

    #[must_use]
    pub fn with_rules(mut self, rules: FileRules) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub fn with_resolver(mut self, resolver: ConfigResolver) -> Self {
        self.resolver = resolver;
        self
    }

    #[must_use]
    pub const fn with_output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }

    /// Directory local push patterns are relative to.
    #[must_use]
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Remote files whose URI matches `pattern`, sorted by URI.
    pub async fn list(&self, pattern: &str) -> Result<Vec<RemoteFile>, SyncError> {
        let pattern = if pattern.is_empty() {
            MATCH_ALL
        } else {
            pattern
        };
        let compiled = self.patterns.get(pattern, URI_SEPARATOR)?;

        let files = {
            let _spinner = self.output.spinner("Listing remote files...");
            self.client
                .list_files(&self.project_id)
                .await
                .map_err(|err| SyncError::api("failed to list remote files", err))?
        };

        let mut matched: Vec<RemoteFile> = files
            .into_iter()
            .filter(|file| compiled.is_match(&file.uri))
            .collect();
        matched.sort_by(|a, b| a.uri.cmp(&b.uri));

        tracing::debug!(pattern, count = matched.len(), "matched remote files");
        Ok(matched)
    }

    /// Turns a selector into the URIs to work on. An empty result is an error.
    pub async fn resolve_uris(&self, selector: &FileSelector) -> Result<Vec<String>, SyncError> {
        let uris = match selector {
            FileSelector::Listed(uris) => uris.clone(),
            FileSelector::Pattern(pattern) => self
                .list(pattern)
                .await?
                .into_iter()
                .map(|file| file.uri)
                .collect(),
        };

        if uris.is_empty() {
            return Err(SyncError::NoFilesMatched {
                pattern: selector.describe().to_string(),
            });
        }
        Ok(uris)
    }

    /// Fetches translation progress for every matched file, concurrently.
    pub async fn status(&self, pattern: &str) -> Result<StatusReport, SyncError> {
        let files = self.list(pattern).await?;
        if files.is_empty() {
            return Err(SyncError::NoFilesMatched {
                pattern: FileSelector::Pattern(pattern.to_string())
                    .describe()
                    .to_string(),
            });
        }

        let results = Arc::new(Mutex::new(StatusReport::default()));
        let mut pool = TaskPool::new(self.threads)?;

        for file in files {
            let task = StatusTask {
                client: Arc::clone(&self.client),
                project_id: self.project_id.clone(),
                file,
                results: Arc::clone(&results),
            };
            pool.submit(task.run()).await;
        }
        pool.wait().await;

        let mut report = std::mem::take(&mut *results.lock().unwrap_or_else(PoisonError::into_inner));
        report.entries.sort_by(|a, b| a.0.uri.cmp(&b.0.uri));
        report.failed.sort();
        Ok(report)
    }

    pub async fn rename(&self, old_uri: &str, new_uri: &str) -> Result<(), SyncError> {
        self.client
            .rename_file(&self.project_id, old_uri, new_uri)
            .await
            .map_err(|err| SyncError::api(format!("failed to rename {old_uri}"), err))?;
        tracing::info!(old_uri, new_uri, "renamed file");
        Ok(())
    }

    /// Deletes every file the selector names. Returns how many were deleted.
    pub async fn delete(&self, selector: &FileSelector) -> Result<usize, SyncError> {
        let uris = self.resolve_uris(selector).await?;
        let mut failed = Vec::new();
        let mut deleted = 0;

        for uri in uris {
            match self.client.delete_file(&self.project_id, &uri).await {
                Ok(()) => {
                    deleted += 1;
                    self.output
                        .status(format!("{} {uri}", self.output.style().success("deleted")));
                }
                Err(err) if err.is_fatal() => {
                    return Err(SyncError::api(format!("failed to delete {uri}"), err));
                }
                Err(err) => {
                    self.output.error(format!("failed to delete {uri}: {err}"));
                    failed.push(uri);
                }
            }
        }

        if failed.is_empty() {
            Ok(deleted)
        } else {
            Err(SyncError::DeleteFailed { files: failed })
        }
    }
}

/// Fetches the status of one file and records it.
struct StatusTask {
    client: Arc<dyn PlatformClient>,
    project_id: String,
    file: RemoteFile,
    results: Arc<Mutex<StatusReport>>,
}

impl StatusTask {
    async fn run(self) {
        let outcome: Result<FileStatus, ApiError> =
            self.client.file_status(&self.project_id, &self.file.uri).await;

        let mut results = self.results.lock().unwrap_or_else(PoisonError::into_inner);
        match outcome {
            Ok(status) => results.entries.push((self.file, status)),
            Err(err) => {
                tracing::debug!(uri = %self.file.uri, "failed to fetch status: {err}");
                results.failed.push(self.file.uri);
            }
        }
    }
}
