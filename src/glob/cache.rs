use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::pattern::{CompiledPattern, GlobError, compile};

/// Cache of compiled patterns keyed by pattern text and separator.
///
/// Entries are never evicted: a command compiles a handful of distinct
/// patterns but may test them against thousands of paths.
#[derive(Debug, Default, Clone)]
pub struct PatternCache {
    inner: Arc<RwLock<HashMap<(String, char), Arc<CompiledPattern>>>>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the compiled pattern, compiling and storing it on first use.
    pub fn get(&self, pattern: &str, separator: char) -> Result<Arc<CompiledPattern>, GlobError> {
        let key = (pattern.to_string(), separator);

        if let Some(hit) = self
            .inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Arc::clone(hit));
        }

        let compiled = Arc::new(compile(pattern, separator)?);
        let mut entries = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(entries.entry(key).or_insert(compiled)))
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_reuses_compiled_pattern() {
        let cache = PatternCache::new();
        let first = cache.get("**/*.json", '/').unwrap();
        let second = cache.get("**/*.json", '/').unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_keys_include_separator() {
        let cache = PatternCache::new();
        cache.get("*.json", '/').unwrap();
        cache.get("*.json", '\\').unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_cache_does_not_store_errors() {
        let cache = PatternCache::new();
        assert!(cache.get("[oops", '/').is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_is_shared_between_clones() {
        let cache = PatternCache::new();
        let clone = cache.clone();
        clone.get("*.po", '/').unwrap();
        assert_eq!(cache.len(), 1);
    }
}
