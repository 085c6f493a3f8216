//! Cascading resolution of a single setting.
//!
//! Priority order (highest to lowest):
//! 1. CLI flag, when the user set it explicitly
//! 2. `LOCSYNC_<NAME>` environment variable, when present (even if empty)
//! 3. Config file value (global or per-file rule)
//! 4. The flag's built-in default

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::ConfigError;

/// Prefix of every environment variable the CLI reads.
pub const ENV_PREFIX: &str = "LOCSYNC_";

/// Returns the environment variable name backing a flag (`"project"` -> `LOCSYNC_PROJECT`).
pub fn env_var_name(flag: &str) -> String {
    format!("{ENV_PREFIX}{}", flag.to_uppercase().replace('-', "_"))
}

/// Which layer supplied a resolved value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Flag,
    Env(String),
    File,
    Default,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag => f.write_str("command line"),
            Self::Env(name) => write!(f, "environment ({name})"),
            Self::File => f.write_str("config file"),
            Self::Default => f.write_str("default"),
        }
    }
}

/// A resolved value together with the layer it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveParam<T> {
    pub value: T,
    pub source: Source,
}

impl<T> EffectiveParam<T> {
    pub fn into_value(self) -> T {
        self.value
    }
}

impl EffectiveParam<String> {
    /// Returns the value, or `None` when it resolved to an empty string.
    pub fn non_empty(self) -> Option<String> {
        (!self.value.is_empty()).then_some(self.value)
    }
}

/// A command-line value plus whether the user typed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flag<T> {
    pub value: T,
    pub changed: bool,
    pub default: T,
}

impl<T: Clone> Flag<T> {
    /// A flag the user did not pass; its value is the default.
    pub fn unset(default: T) -> Self {
        Self {
            value: default.clone(),
            changed: false,
            default,
        }
    }

    /// A flag the user passed explicitly.
    pub const fn set(value: T, default: T) -> Self {
        Self {
            value,
            changed: true,
            default,
        }
    }
}

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Resolves settings through flag, environment, config file and default.
#[derive(Clone)]
pub struct ConfigResolver {
    env: EnvLookup,
}

impl fmt::Debug for ConfigResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigResolver").finish_non_exhaustive()
    }
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::from_env()
    }
}

impl ConfigResolver {
    /// Reads environment variables from the running process.
    pub fn from_env() -> Self {
        Self {
            env: Arc::new(|name| std::env::var(name).ok()),
        }
    }

    /// Uses a fixed set of variables instead of the process environment.
    pub fn with_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            env: Arc::new(move |name| vars.get(name).cloned()),
        }
    }

    fn lookup(&self, flag: &str) -> Option<(String, String)> {
        let name = env_var_name(flag);
        (self.env)(&name).map(|value| (name, value))
    }

    pub fn resolve_string(
        &self,
        name: &str,
        flag: &Flag<String>,
        file_value: Option<&str>,
    ) -> EffectiveParam<String> {
        let resolved = if flag.changed {
            EffectiveParam {
                value: flag.value.clone(),
                source: Source::Flag,
            }
        } else if let Some((env_name, value)) = self.lookup(name) {
            EffectiveParam {
                value,
                source: Source::Env(env_name),
            }
        } else if let Some(value) = file_value {
            EffectiveParam {
                value: value.to_string(),
                source: Source::File,
            }
        } else {
            EffectiveParam {
                value: flag.default.clone(),
                source: Source::Default,
            }
        };

        tracing::debug!(param = name, source = %resolved.source, "resolved setting");
        resolved
    }

    /// Same order as [`Self::resolve_string`]. A present environment variable
    /// wins with its parsed value; an empty one counts as `true`.
    pub fn resolve_bool(
        &self,
        name: &str,
        flag: &Flag<bool>,
        file_value: Option<bool>,
    ) -> Result<EffectiveParam<bool>, ConfigError> {
        self.resolve_parsed(name, flag, file_value, |raw| match raw
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "" | "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
        .map_err(|value| ConfigError::InvalidBoolean {
            name: env_var_name(name),
            value,
        })
    }

    pub fn resolve_u32(
        &self,
        name: &str,
        flag: &Flag<u32>,
        file_value: Option<u32>,
    ) -> Result<EffectiveParam<u32>, ConfigError> {
        self.resolve_parsed(name, flag, file_value, |raw| u32::from_str(raw.trim()).ok())
            .map_err(|value| ConfigError::InvalidNumber {
                name: env_var_name(name),
                value,
            })
    }

    fn resolve_parsed<T: Clone>(
        &self,
        name: &str,
        flag: &Flag<T>,
        file_value: Option<T>,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<EffectiveParam<T>, String> {
        let resolved = if flag.changed {
            EffectiveParam {
                value: flag.value.clone(),
                source: Source::Flag,
            }
        } else if let Some((env_name, raw)) = self.lookup(name) {
            EffectiveParam {
                value: parse(&raw).ok_or(raw)?,
                source: Source::Env(env_name),
            }
        } else if let Some(value) = file_value {
            EffectiveParam {
                value,
                source: Source::File,
            }
        } else {
            EffectiveParam {
                value: flag.default.clone(),
                source: Source::Default,
            }
        };

        tracing::debug!(param = name, source = %resolved.source, "resolved setting");
        Ok(resolved)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn no_env() -> ConfigResolver {
        ConfigResolver::with_vars(Vec::<(String, String)>::new())
    }

    #[test]
    fn test_env_var_name() {
        assert_eq!(env_var_name("account"), "LOCSYNC_ACCOUNT");
        assert_eq!(env_var_name("retrieval-type"), "LOCSYNC_RETRIEVAL_TYPE");
    }

    #[test]
    fn test_changed_flag_beats_everything() {
        let resolver = ConfigResolver::with_vars([("LOCSYNC_PROJECT", "from-env")]);
        let flag = Flag::set("from-flag".to_string(), String::new());

        let resolved = resolver.resolve_string("project", &flag, Some("from-file"));
        assert_eq!(resolved.value, "from-flag");
        assert_eq!(resolved.source, Source::Flag);
    }

    #[test]
    fn test_env_beats_file_even_when_empty() {
        let resolver = ConfigResolver::with_vars([("LOCSYNC_PROJECT", "")]);
        let flag = Flag::unset("fallback".to_string());

        let resolved = resolver.resolve_string("project", &flag, Some("from-file"));
        assert_eq!(resolved.value, "");
        assert_eq!(resolved.source, Source::Env("LOCSYNC_PROJECT".to_string()));
        assert_eq!(resolved.non_empty(), None);
    }

    #[test]
    fn test_file_beats_default() {
        let flag = Flag::unset("fallback".to_string());
        let resolved = no_env().resolve_string("project", &flag, Some("from-file"));
        assert_eq!(resolved.value, "from-file");
        assert_eq!(resolved.source, Source::File);
    }

    #[test]
    fn test_default_when_nothing_set() {
        let flag = Flag::unset("fallback".to_string());
        let resolved = no_env().resolve_string("project", &flag, None);
        assert_eq!(resolved.value, "fallback");
        assert_eq!(resolved.source, Source::Default);
    }

    #[test]
    fn test_unchanged_flag_value_is_ignored() {
        // An unchanged flag only contributes its default, after env and file.
        let flag = Flag {
            value: "typed-but-unmarked".to_string(),
            changed: false,
            default: "fallback".to_string(),
        };
        let resolved = no_env().resolve_string("project", &flag, Some("from-file"));
        assert_eq!(resolved.value, "from-file");
    }

    #[test]
    fn test_bool_explicit_false_flag_wins() {
        let resolver = ConfigResolver::with_vars([("LOCSYNC_AUTHORIZE", "true")]);
        let resolved = resolver
            .resolve_bool("authorize", &Flag::set(false, false), Some(true))
            .unwrap();
        assert!(!resolved.value);
    }

    #[test]
    fn test_bool_env_presence() {
        for (raw, expected) in [("", true), ("yes", true), ("0", false), ("OFF", false)] {
            let resolver = ConfigResolver::with_vars([("LOCSYNC_AUTHORIZE", raw)]);
            let resolved = resolver
                .resolve_bool("authorize", &Flag::unset(false), Some(!expected))
                .unwrap();
            assert_eq!(resolved.value, expected, "raw value {raw:?}");
        }
    }

    #[test]
    fn test_bool_invalid_env_value() {
        let resolver = ConfigResolver::with_vars([("LOCSYNC_AUTHORIZE", "maybe")]);
        let err = resolver
            .resolve_bool("authorize", &Flag::unset(false), None)
            .unwrap_err();
        assert!(err.to_string().contains("LOCSYNC_AUTHORIZE"));
    }

    #[test]
    fn test_u32_layers() {
        let resolver = ConfigResolver::with_vars([("LOCSYNC_THREADS", " 8 ")]);
        let resolved = resolver
            .resolve_u32("threads", &Flag::unset(4), Some(2))
            .unwrap();
        assert_eq!(resolved.value, 8);

        let resolved = no_env()
            .resolve_u32("threads", &Flag::unset(4), Some(2))
            .unwrap();
        assert_eq!(resolved.value, 2);
        assert_eq!(resolved.source, Source::File);

        let resolver = ConfigResolver::with_vars([("LOCSYNC_THREADS", "many")]);
        assert!(resolver.resolve_u32("threads", &Flag::unset(4), None).is_err());
    }
}
