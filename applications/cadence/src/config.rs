/// Application configuration
use crate::error::{AppError, Result};
use cadence_cache::CacheSettings;
use cadence_catalog::CatalogSettings;
use cadence_output::OutputSettings;
use cadence_playback::PlaybackSettings;
use cadence_resolver::ResolverSettings;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File read when no `--config` path is given, if it exists
pub const DEFAULT_CONFIG_FILE: &str = "cadence.toml";

/// Prefix for environment overrides, e.g. `CADENCE_PLAYBACK__CHANNEL`
pub const ENV_PREFIX: &str = "CADENCE";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub playback: PlaybackSettings,
    pub cache: CacheSettings,
    pub resolver: ResolverSettings,
    pub catalog: CatalogSettings,
    pub output: OutputSettings,

    /// Append logs to this file in addition to stderr
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `cadence.toml` in the working
    /// directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let environment = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("playback.default_sources")
            .try_parsing(true);

        Self::from_sources(path, environment)
    }

    fn from_sources(path: Option<&Path>, environment: Environment) -> Result<Self> {
        let mut builder = Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "config file {} not found",
                        path.display()
                    )));
                }
                builder = builder.add_source(File::from(path));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    builder = builder.add_source(File::from(default_path));
                }
            }
        }

        let config = builder.add_source(environment).build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.playback.channel.trim().is_empty() {
            return Err(AppError::Config(
                "an output channel is required (set playback.channel or CADENCE_PLAYBACK__CHANNEL)"
                    .to_string(),
            ));
        }

        if self.playback.max_retries == 0 {
            return Err(AppError::Config(
                "playback.max_retries must be at least 1".to_string(),
            ));
        }

        if self.cache.enabled && self.cache.directory.as_os_str().is_empty() {
            return Err(AppError::Config(
                "cache.directory is required when the cache is enabled".to_string(),
            ));
        }

        if self.catalog.batch_size == 0 {
            return Err(AppError::Config(
                "catalog.batch_size must be at least 1".to_string(),
            ));
        }

        let has_id = self.catalog.client_id.as_deref().is_some_and(|s| !s.is_empty());
        let has_secret = self
            .catalog
            .client_secret
            .as_deref()
            .is_some_and(|s| !s.is_empty());
        if has_id != has_secret {
            return Err(AppError::Config(
                "catalog.client_id and catalog.client_secret must be set together".to_string(),
            ));
        }

        for (name, executable) in [
            ("resolver.executable", &self.resolver.executable),
            ("output.executable", &self.output.executable),
        ] {
            if executable.as_os_str().is_empty() {
                return Err(AppError::Config(format!("{} must not be empty", name)));
            }
        }

        Ok(())
    }
}
