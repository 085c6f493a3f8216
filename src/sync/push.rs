//! Upload of local files.

use std::collections::BTreeMap;

use bytes::Bytes;

use super::FileSync;
use super::local::{LocalFile, find_local_files};
use crate::api::{ApiError, FileType, UploadRequest, UploadResult};
use crate::config::{FileConfigRule, Flag};
use crate::error::SyncError;

#[derive(Debug, Clone)]
pub struct PushParams {
    /// Local glob, relative to the base directory.
    pub pattern: String,
    /// Remote URI to upload to; only valid for a single file.
    pub uri: Option<String>,
    pub file_type: Flag<String>,
    /// Parser directives as `key=value`.
    pub directives: Vec<String>,
    pub authorize: Flag<bool>,
    /// Locales to authorize the uploaded content for.
    pub locales: Vec<String>,
    /// Prefix for remote URIs.
    pub branch: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushSummary {
    pub uploaded: usize,
    /// Uploads that replaced an existing remote file.
    pub overwritten: usize,
}

/// Parses `key=value` directives. The value may contain `=`.
pub fn parse_directives(raw: &[String]) -> Result<BTreeMap<String, String>, SyncError> {
    raw.iter()
        .map(|entry| match entry.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.to_string()))
            }
            _ => Err(SyncError::InvalidDirectiveFormat(entry.clone())),
        })
        .collect()
}

impl FileSync {
    /// Uploads every local file matching the pattern, one at a time.
    ///
    /// An authentication or maintenance error stops the run and is returned
    /// as is. Other failures are reported and the remaining files still go
    /// up; they are then returned together as [`SyncError::PushFailed`].
    pub async fn push(&self, params: PushParams) -> Result<PushSummary, SyncError> {
        let cli_directives = parse_directives(&params.directives)?;
        let authorize = self
            .resolver
            .resolve_bool("authorize", &params.authorize, None)?
            .into_value();

        if authorize && !params.locales.is_empty() {
            return Err(SyncError::ConflictingParameters(
                "--authorize authorizes every locale and cannot be combined with --locale"
                    .to_string(),
            ));
        }

        let files = find_local_files(&self.base_dir, &params.pattern, &self.patterns)?;
        if files.is_empty() {
            return Err(SyncError::NoFilesMatched {
                pattern: params.pattern.clone(),
            });
        }
        if params.uri.is_some() && files.len() > 1 {
            return Err(SyncError::ConflictingParameters(format!(
                "--uri names a single remote file but '{}' matches {} files",
                params.pattern,
                files.len()
            )));
        }

        // A malformed rule pattern stops the run before anything is uploaded.
        let planned = files
            .iter()
            .map(|file| {
                let rule = self.rules.resolve(&file.relative, &self.patterns)?;
                Ok::<_, SyncError>((file, rule))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut summary = PushSummary::default();
        let mut failed = Vec::new();

        for (file, rule) in planned {
            match self
                .push_file(file, rule, &params, &cli_directives, authorize)
                .await
            {
                Ok((uri, result)) => {
                    summary.uploaded += 1;
                    if result.overwritten {
                        summary.overwritten += 1;
                    }
                    self.report_upload(&file.relative, &uri, &result);
                }
                Err(err) if err.api_source().is_some_and(ApiError::is_fatal) => {
                    return Err(err);
                }
                Err(err) => {
                    let cause = std::error::Error::source(&err)
                        .map(|source| format!(": {source}"))
                        .unwrap_or_default();
                    self.output.error(format!("{err}{cause}"));
                    failed.push(file.relative.clone());
                }
            }
        }

        if failed.is_empty() {
            Ok(summary)
        } else {
            Err(SyncError::PushFailed { files: failed })
        }
    }

    async fn push_file(
        &self,
        file: &LocalFile,
        rule: FileConfigRule,
        params: &PushParams,
        cli_directives: &BTreeMap<String, String>,
        authorize: bool,
    ) -> Result<(String, UploadResult), SyncError> {
        let file_type = self
            .resolver
            .resolve_string("type", &params.file_type, rule.push_type.as_deref())
            .non_empty()
            .map(FileType::from)
            .or_else(|| FileType::from_path(&file.path))
            .ok_or_else(|| SyncError::UnknownFileType {
                path: file.relative.clone(),
            })?;

        let mut directives = rule.push_directives;
        directives.extend(
            cli_directives
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );

        let file_uri = params.uri.clone().unwrap_or_else(|| match &params.branch {
            Some(branch) if !branch.is_empty() => format!(
                "{}/{}",
                branch.trim_end_matches('/'),
                file.relative.trim_start_matches('/')
            ),
            _ => file.relative.clone(),
        });

        let contents = tokio::fs::read(&file.path)
            .await
            .map_err(|source| SyncError::Io {
                path: file.path.clone(),
                source,
            })?;

        tracing::debug!(
            path = %file.relative,
            uri = %file_uri,
            file_type = %file_type,
            directives = directives.len(),
            "uploading"
        );

        let request = UploadRequest {
            contents: Bytes::from(contents),
            file_uri: file_uri.clone(),
            file_type,
            authorize,
            locales_to_authorize: params.locales.clone(),
            directives,
        };

        let result = self
            .client
            .upload_file(&self.project_id, request)
            .await
            .map_err(|err| SyncError::api(format!("failed to upload {}", file.relative), err))?;

        Ok((file_uri, result))
    }

    fn report_upload(&self, path: &str, uri: &str, result: &UploadResult) {
        let style = self.output.style();
        let verb = if result.overwritten {
            "overwritten"
        } else {
            "uploaded"
        };
        let target = if path == uri {
            String::new()
        } else {
            format!(" -> {}", style.value(uri))
        };
        self.output.status(format!(
            "{} {path}{target} {}",
            style.success(verb),
            style.secondary(format!(
                "({} strings, {} words)",
                result.string_count, result.word_count
            ))
        ));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_directives() {
        let parsed =
            parse_directives(&owned(&["placeholder_format=C", "string_format=a=b"])).unwrap();
        assert_eq!(parsed["placeholder_format"], "C");
        assert_eq!(parsed["string_format"], "a=b");
    }

    #[test]
    fn test_parse_directives_allows_empty_value() {
        let parsed = parse_directives(&owned(&["variants_enabled="])).unwrap();
        assert_eq!(parsed["variants_enabled"], "");
    }

    #[test]
    fn test_parse_directives_rejects_missing_separator() {
        let err = parse_directives(&owned(&["ok=1", "broken"])).unwrap_err();
        assert!(matches!(err, SyncError::InvalidDirectiveFormat(ref d) if d == "broken"));

        let err = parse_directives(&owned(&["=value"])).unwrap_err();
        assert!(matches!(err, SyncError::InvalidDirectiveFormat(_)));
    }
}
