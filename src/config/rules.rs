//! Per-file-pattern configuration (`files:` section of the config file).

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use crate::glob::{GlobError, PatternCache, URI_SEPARATOR};

/// Reserved pattern key whose settings fill in anything a matching rule leaves unset.
pub const DEFAULT_RULE: &str = "default";

/// Settings for one pattern, as written in the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default, skip_serializing_if = "PushConfig::is_empty")]
    pub push: PushConfig,
    #[serde(default, skip_serializing_if = "PullConfig::is_empty")]
    pub pull: PullConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushConfig {
    /// Remote file type (e.g. `json`, `android`, `gettext`).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    /// Parser directives sent with every upload of a matching file.
    #[serde(
        default,
        deserialize_with = "scalar_map",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub directives: BTreeMap<String, String>,
}

impl PushConfig {
    fn is_empty(&self) -> bool {
        self.file_type.is_none() && self.directives.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullConfig {
    /// Output path template for downloaded translations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl PullConfig {
    const fn is_empty(&self) -> bool {
        self.format.is_none()
    }
}

/// The effective settings for one path after matching and default merging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfigRule {
    /// The pattern that matched, if any.
    pub pattern: Option<String>,
    pub push_type: Option<String>,
    pub push_directives: BTreeMap<String, String>,
    pub pull_format: Option<String>,
}

impl FileConfigRule {
    fn from_entry(pattern: &str, config: &FileConfig) -> Self {
        Self {
            pattern: Some(pattern.to_string()),
            push_type: config.push.file_type.clone(),
            push_directives: config.push.directives.clone(),
            pull_format: config.pull.format.clone(),
        }
    }

    /// Fills every field left unset from `fallback`. Set fields are kept.
    fn fill_from(&mut self, fallback: &FileConfig) {
        if self.push_type.is_none() {
            self.push_type.clone_from(&fallback.push.file_type);
        }
        if self.pull_format.is_none() {
            self.pull_format.clone_from(&fallback.pull.format);
        }
        for (key, value) in &fallback.push.directives {
            self.push_directives
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }
}

/// Pattern rules in the order they appear in the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileRules {
    entries: Vec<(String, FileConfig)>,
}

impl FileRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule. Re-inserting an existing pattern replaces it in place.
    pub fn insert(&mut self, pattern: impl Into<String>, config: FileConfig) {
        let pattern = pattern.into();
        if let Some(slot) = self.entries.iter_mut().find(|(p, _)| *p == pattern) {
            slot.1 = config;
        } else {
            self.entries.push((pattern, config));
        }
    }

    pub fn get(&self, pattern: &str) -> Option<&FileConfig> {
        self.entries
            .iter()
            .find(|(p, _)| p == pattern)
            .map(|(_, config)| config)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FileConfig)> {
        self.entries.iter().map(|(p, c)| (p.as_str(), c))
    }

    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the effective rule for `path`.
    ///
    /// The last listed pattern that matches wins; whatever it leaves unset is
    /// taken from the `default` rule.
    pub fn resolve(&self, path: &str, cache: &PatternCache) -> Result<FileConfigRule, GlobError> {
        let mut matched = None;

        for (pattern, config) in &self.entries {
            if pattern == DEFAULT_RULE {
                continue;
            }
            if cache.get(pattern, URI_SEPARATOR)?.is_match(path) {
                matched = Some((pattern.as_str(), config));
            }
        }

        let mut rule = matched
            .map(|(pattern, config)| FileConfigRule::from_entry(pattern, config))
            .unwrap_or_default();

        if let Some(fallback) = self.get(DEFAULT_RULE) {
            rule.fill_from(fallback);
        }

        tracing::debug!(path, pattern = ?rule.pattern, "resolved file config");
        Ok(rule)
    }
}

impl Serialize for FileRules {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (pattern, config) in &self.entries {
            map.serialize_entry(pattern, config)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FileRules {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RulesVisitor;

        impl<'de> Visitor<'de> for RulesVisitor {
            type Value = FileRules;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of file patterns to push/pull settings")
            }

            fn visit_unit<E: de::Error>(self) -> Result<FileRules, E> {
                Ok(FileRules::default())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FileRules, A::Error> {
                let mut rules = FileRules::default();
                while let Some((pattern, config)) =
                    access.next_entry::<String, Option<FileConfig>>()?
                {
                    rules.insert(pattern, config.unwrap_or_default());
                }
                Ok(rules)
            }
        }

        deserializer.deserialize_any(RulesVisitor)
    }
}

/// Accepts directive values written as strings, numbers or booleans.
fn scalar_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, serde_yml::Value>>::deserialize(deserializer)?;

    raw.unwrap_or_default()
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                serde_yml::Value::String(s) => s,
                serde_yml::Value::Bool(b) => b.to_string(),
                serde_yml::Value::Number(n) => n.to_string(),
                serde_yml::Value::Null => String::new(),
                _ => {
                    return Err(de::Error::custom(format!(
                        "directive '{key}' must be a scalar value"
                    )));
                }
            };
            Ok((key, value))
        })
        .collect()
}
