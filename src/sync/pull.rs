//! Download of source files and translations.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::template::{PathTemplate, TemplateVars};
use super::{FileSelector, FileSync};
use crate::api::{ApiError, ByteStream, PlatformClient, RetrievalType};
use crate::config::Flag;
use crate::error::SyncError;
use crate::fs::{StreamWriteError, atomic_write_stream};
use crate::output::Output;
use crate::pool::TaskPool;
use crate::ui::TransferBar;

/// Path of a downloaded translation when nothing else is configured.
pub const DEFAULT_PULL_FORMAT: &str = "{{name .FileURI}}_{{.Locale}}{{ext .FileURI}}";

/// Path of a downloaded source file when nothing else is configured.
pub const SOURCE_PULL_FORMAT: &str = "{{.FileURI}}";

#[derive(Debug, Clone)]
pub struct PullParams {
    pub selector: FileSelector,
    /// Locales to download; empty means every locale of the file.
    pub locales: Vec<String>,
    /// Directory rendered paths are relative to.
    pub directory: PathBuf,
    /// Minimum completion percentage for a locale to be downloaded.
    pub progress_threshold: u64,
    pub retrieval: RetrievalType,
    /// Download original files instead of translations.
    pub source: bool,
    pub format: Flag<String>,
}

/// Counts of downloads attempted by [`FileSync::pull`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PullSummary {
    pub downloaded: usize,
    /// Locales below the progress threshold.
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Debug, Default)]
struct PullCounters {
    downloaded: AtomicUsize,
    skipped: AtomicUsize,
    failed: AtomicUsize,
}

impl PullCounters {
    fn summary(&self) -> PullSummary {
        PullSummary {
            downloaded: self.downloaded.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

impl FileSync {
    /// Downloads every selected file.
    ///
    /// Only setup problems fail the call: no matching files, a malformed
    /// pattern or template, unreadable stdin or a failed listing. Failures of
    /// individual downloads are reported and counted in the summary.
    pub async fn pull(&self, params: PullParams) -> Result<PullSummary, SyncError> {
        let uris = self.resolve_uris(&params.selector).await?;

        let mut format = params.format.clone();
        let fallback = if params.source {
            SOURCE_PULL_FORMAT
        } else {
            DEFAULT_PULL_FORMAT
        };
        if format.default.is_empty() {
            format.default = fallback.to_string();
        }

        // Resolve and compile everything before the first download starts.
        let mut planned = Vec::with_capacity(uris.len());
        for uri in uris {
            let rule = self.rules.resolve(&uri, &self.patterns)?;
            let template_text = self
                .resolver
                .resolve_string("format", &format, rule.pull_format.as_deref())
                .non_empty()
                .unwrap_or_else(|| fallback.to_string());
            let template = self.templates.get(&template_text)?;
            planned.push((uri, template));
        }

        let counters = Arc::new(PullCounters::default());
        let locales: Arc<[String]> = params
            .locales
            .iter()
            .map(|locale| locale.to_lowercase())
            .collect();
        let directory: Arc<Path> = Arc::from(params.directory.as_path());
        let bar = self.output.transfer_bar(planned.len());
        let mut pool = TaskPool::new(self.threads)?;

        for (file_uri, template) in planned {
            let task = PullTask {
                client: Arc::clone(&self.client),
                project_id: self.project_id.clone(),
                file_uri,
                template,
                locales: Arc::clone(&locales),
                directory: Arc::clone(&directory),
                progress_threshold: params.progress_threshold,
                retrieval: params.retrieval,
                source: params.source,
                counters: Arc::clone(&counters),
                bar: bar.clone(),
                output: self.output,
            };
            pool.submit(task.run()).await;
        }

        tracing::debug!(queued = pool.pending(), "all pull tasks submitted");
        let report = pool.wait().await;
        bar.finish();
        if report.panicked > 0 {
            counters
                .failed
                .fetch_add(report.panicked, Ordering::Relaxed);
        }

        let summary = counters.summary();
        tracing::info!(
            downloaded = summary.downloaded,
            skipped = summary.skipped,
            failed = summary.failed,
            "pull finished"
        );
        Ok(summary)
    }
}

/// Downloads one remote file: its source, or each eligible translation.
struct PullTask {
    client: Arc<dyn PlatformClient>,
    project_id: String,
    file_uri: String,
    template: Arc<PathTemplate>,
    /// Lowercased allow-list; empty allows every locale.
    locales: Arc<[String]>,
    directory: Arc<Path>,
    progress_threshold: u64,
    retrieval: RetrievalType,
    source: bool,
    counters: Arc<PullCounters>,
    bar: TransferBar,
    output: Output,
}

impl PullTask {
    async fn run(self) {
        if self.source {
            let download = self.client.download_file(&self.project_id, &self.file_uri).await;
            self.save(download, "").await;
        } else {
            self.pull_translations().await;
        }
        self.bar.inc();
    }

    async fn pull_translations(&self) {
        let status = match self.client.file_status(&self.project_id, &self.file_uri).await {
            Ok(status) => status,
            Err(err) => {
                self.fail(format!("failed to fetch status of {}: {err}", self.file_uri));
                return;
            }
        };

        for locale in &status.locales {
            if !self.locales.is_empty()
                && !self.locales.contains(&locale.locale_id.to_lowercase())
            {
                continue;
            }

            let percent = status.percent_complete(locale);
            if percent < self.progress_threshold {
                tracing::debug!(
                    uri = %self.file_uri,
                    locale = %locale.locale_id,
                    percent,
                    "below progress threshold, skipping"
                );
                self.counters.skipped.fetch_add(1, Ordering::Relaxed);
                continue;
            }

            let download = self
                .client
                .download_translation(
                    &self.project_id,
                    &locale.locale_id,
                    &self.file_uri,
                    self.retrieval,
                )
                .await;
            self.save(download, &locale.locale_id).await;
        }
    }

    async fn save(&self, download: Result<ByteStream, ApiError>, locale: &str) {
        let what = if locale.is_empty() {
            self.file_uri.clone()
        } else {
            format!("{} ({locale})", self.file_uri)
        };

        let stream = match download {
            Ok(stream) => stream,
            Err(err) => {
                self.fail(format!("failed to download {what}: {err}"));
                return;
            }
        };

        let relative = self.template.render(TemplateVars {
            file_uri: &self.file_uri,
            locale,
        });
        let target = self.directory.join(relative.trim_start_matches('/'));

        match atomic_write_stream(&target, stream).await {
            Ok(bytes) => {
                tracing::debug!(target = %target.display(), bytes, "downloaded");
                self.counters.downloaded.fetch_add(1, Ordering::Relaxed);
                if !self.output.is_quiet() {
                    self.bar.println(&format!(
                        "{} {}",
                        self.output.style().success("downloaded"),
                        target.display()
                    ));
                }
            }
            Err(StreamWriteError::Source(err)) => {
                self.fail(format!("failed to download {what}: {err}"));
            }
            Err(err @ StreamWriteError::Io { .. }) => {
                let cause = std::error::Error::source(&err)
                    .map(ToString::to_string)
                    .unwrap_or_default();
                self.fail(format!("{err} for {what}: {cause}"));
            }
        }
    }

    /// Counts a failure and prints it once, above the progress bar.
    fn fail(&self, message: String) {
        tracing::debug!(uri = %self.file_uri, "{message}");
        self.counters.failed.fetch_add(1, Ordering::Relaxed);
        self.bar.eprintln(&format!(
            "{} {message}",
            self.output.style().error("Error:")
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_reads_counters() {
        let counters = PullCounters::default();
        counters.downloaded.fetch_add(2, Ordering::Relaxed);
        counters.failed.fetch_add(1, Ordering::Relaxed);
        assert_eq!(
            counters.summary(),
            PullSummary {
                downloaded: 2,
                skipped: 0,
                failed: 1
            }
        );
    }
}
