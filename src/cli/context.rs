//! Settings shared by every command: config file, credentials, clients.

use std::collections::HashSet;
use std::sync::Arc;

use clap::ArgMatches;
use clap::parser::ValueSource;

use super::args::{DEFAULT_THREADS, GlobalArgs};
use crate::api::{DEFAULT_ENDPOINT, HttpClient, PlatformClient};
use crate::config::{ConfigError, ConfigFile, ConfigManager, ConfigResolver, Flag};
use crate::output::Output;
use crate::sync::FileSync;

/// Argument ids the user typed on the command line.
#[derive(Debug, Clone, Default)]
pub struct FlagSources {
    explicit: HashSet<String>,
}

impl FlagSources {
    /// Collects explicit arguments of the innermost subcommand; global
    /// arguments are visible there too.
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let mut leaf = matches;
        while let Some((_, sub)) = leaf.subcommand() {
            leaf = sub;
        }

        let explicit = leaf
            .ids()
            .map(|id| id.as_str())
            .filter(|id| leaf.value_source(id) == Some(ValueSource::CommandLine))
            .map(ToString::to_string)
            .collect();

        Self { explicit }
    }

    pub fn is_set(&self, id: &str) -> bool {
        self.explicit.contains(id)
    }

    pub fn string(&self, id: &str, value: &str, default: &str) -> Flag<String> {
        if self.is_set(id) {
            Flag::set(value.to_string(), default.to_string())
        } else {
            Flag::unset(default.to_string())
        }
    }

    pub fn bool(&self, id: &str, value: bool) -> Flag<bool> {
        if self.is_set(id) {
            Flag::set(value, false)
        } else {
            Flag::unset(false)
        }
    }
}

/// Loaded configuration plus everything needed to resolve settings.
pub struct Context {
    pub config: ConfigFile,
    pub manager: ConfigManager,
    pub resolver: ConfigResolver,
    pub sources: FlagSources,
    pub globals: GlobalArgs,
    pub output: Output,
}

impl Context {
    pub fn load(
        globals: GlobalArgs,
        sources: FlagSources,
        resolver: ConfigResolver,
        output: Output,
    ) -> Result<Self, ConfigError> {
        let manager = ConfigManager::new(globals.config.as_deref());
        let config = manager.load_or_default()?;
        tracing::debug!(path = %manager.config_path().display(), "loaded config");

        Ok(Self {
            config,
            manager,
            resolver,
            sources,
            globals,
            output,
        })
    }

    /// Resolves a setting that must end up non-empty.
    fn required(
        &self,
        flag: &'static str,
        key: &'static str,
        value: &str,
        file: Option<&str>,
    ) -> Result<String, ConfigError> {
        let cli = self.sources.string(flag, value, "");
        self.resolver
            .resolve_string(flag, &cli, file)
            .non_empty()
            .ok_or(ConfigError::MissingValue { key, flag })
    }

    pub fn account_id(&self) -> Result<String, ConfigError> {
        self.required(
            "account",
            "account_id",
            &self.globals.account,
            self.config.account_id.as_deref(),
        )
    }

    pub fn project_id(&self) -> Result<String, ConfigError> {
        self.required(
            "project",
            "project_id",
            &self.globals.project,
            self.config.project_id.as_deref(),
        )
    }

    pub fn threads(&self) -> Result<u32, ConfigError> {
        let cli = if self.sources.is_set("threads") {
            Flag::set(self.globals.threads, DEFAULT_THREADS)
        } else {
            Flag::unset(DEFAULT_THREADS)
        };
        let threads = self
            .resolver
            .resolve_u32("threads", &cli, self.config.threads)?
            .into_value();

        if threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }
        Ok(threads)
    }

    pub fn client(&self) -> Result<Arc<dyn PlatformClient>, ConfigError> {
        let user_id = self.required(
            "user",
            "user_id",
            &self.globals.user,
            self.config.user_id.as_deref(),
        )?;
        let secret = self.required(
            "secret",
            "secret",
            &self.globals.secret,
            self.config.secret.as_deref(),
        )?;

        let cli = self
            .sources
            .string("endpoint", &self.globals.endpoint, DEFAULT_ENDPOINT);
        let endpoint = self
            .resolver
            .resolve_string("endpoint", &cli, self.config.endpoint.as_deref())
            .non_empty()
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        Ok(Arc::new(HttpClient::new(endpoint, user_id, secret)))
    }

    /// Builds the file orchestrator for the configured project.
    pub fn file_sync(&self) -> Result<FileSync, ConfigError> {
        let project_id = self.project_id()?;
        let threads = self.threads()?;
        let client = self.client()?;

        Ok(FileSync::new(client, project_id)
            .with_threads(threads)
            .with_rules(self.config.files.clone())
            .with_resolver(self.resolver.clone())
            .with_output(self.output))
    }
}
