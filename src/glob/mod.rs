//! Glob matching for remote file URIs and local paths.
//!
//! Patterns support `*`, `**`, `?`, `[...]` and `{...}`. Callers normalize an
//! empty pattern to [`MATCH_ALL`] before compiling.

mod cache;
mod pattern;

pub use cache::PatternCache;
pub use pattern::{CompiledPattern, GlobError, compile, has_meta};

/// Pattern used when the user gives none.
pub const MATCH_ALL: &str = "**";

/// Separator used for remote URIs and normalized local paths.
pub const URI_SEPARATOR: char = '/';

/// Splits a pattern into its literal leading directory and the glob remainder.
///
/// The directory is everything up to the last `/` before the first glob
/// metacharacter. A pattern without a literal directory returns `("", pattern)`.
///
/// ```ignore
/// assert_eq!(directory_from_pattern("res/values/*.xml"), ("res/values", "*.xml"));
/// ```
pub fn directory_from_pattern(pattern: &str) -> (&str, &str) {
    let literal_end = pattern
        .find(['*', '?', '[', '{', '\\'])
        .unwrap_or(pattern.len());

    match pattern[..literal_end].rfind(URI_SEPARATOR) {
        Some(0) => ("/", &pattern[1..]),
        Some(idx) => (&pattern[..idx], &pattern[idx + 1..]),
        None => ("", pattern),
    }
}
