//! Expansion of a local glob into the files to push.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::glob::{GlobError, MATCH_ALL, PatternCache, URI_SEPARATOR, directory_from_pattern};

/// A local file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    /// Location on disk.
    pub path: PathBuf,
    /// `/`-separated path relative to the base directory (absolute for
    /// absolute patterns), used for rule matching and the remote URI.
    pub relative: String,
}

/// Walks the literal directory of `pattern` under `base` and returns every
/// file whose normalized path matches, sorted by path.
pub fn find_local_files(
    base: &Path,
    pattern: &str,
    cache: &PatternCache,
) -> Result<Vec<LocalFile>, GlobError> {
    let pattern = normalize(pattern);
    let pattern = if pattern.is_empty() { MATCH_ALL } else { pattern };
    let compiled = cache.get(pattern, URI_SEPARATOR)?;

    let (dir, _) = directory_from_pattern(pattern);
    let absolute = Path::new(dir).is_absolute();
    let root = if dir.is_empty() {
        base.to_path_buf()
    } else {
        base.join(dir)
    };

    tracing::debug!(root = %root.display(), pattern, "scanning local files");

    let mut files: Vec<LocalFile> = WalkDir::new(&root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::debug!("skipping unreadable entry: {err}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let candidate = if absolute {
                entry.path().to_path_buf()
            } else {
                entry.path().strip_prefix(base).ok()?.to_path_buf()
            };
            let relative = to_slash(&candidate);
            compiled.is_match(&relative).then(|| LocalFile {
                path: entry.into_path(),
                relative,
            })
        })
        .collect();

    files.sort_by(|a, b| a.relative.cmp(&b.relative));
    Ok(files)
}

fn normalize(pattern: &str) -> &str {
    let mut pattern = pattern;
    while let Some(rest) = pattern.strip_prefix("./") {
        pattern = rest;
    }
    pattern
}

fn to_slash(path: &Path) -> String {
    let text = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == URI_SEPARATOR {
        text.into_owned()
    } else {
        text.replace(std::path::MAIN_SEPARATOR, "/")
    }
}
