//! Importer configuration.
//!
//! Loaded from a YAML, TOML or JSON file (format chosen by extension) and
//! overlaid with `NETATMO_`-prefixed environment variables, using `__` to
//! reach nested keys, e.g. `NETATMO_INFLUX__TOKEN`.

use crate::error::Result;
use crate::utils::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_PROGRESS_INTERVAL, DEFAULT_STATION_NAME, DEFAULT_TIMEOUT_SECS,
};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ImporterConfig {
    #[validate(nested)]
    pub influx: InfluxConfig,

    #[serde(default)]
    #[validate(nested)]
    pub import: ImportSettings,
}

/// Connection parameters for the InfluxDB v2 server
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InfluxConfig {
    #[validate(url)]
    pub url: String,

    #[validate(length(min = 1))]
    pub token: String,

    #[validate(length(min = 1))]
    pub org: String,

    #[validate(length(min = 1))]
    pub bucket: String,

    #[serde(default = "default_timeout_secs")]
    #[validate(range(min = 1))]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ImportSettings {
    #[serde(default = "default_station")]
    #[validate(length(min = 1))]
    pub station: String,

    #[serde(default = "default_batch_size")]
    #[validate(range(min = 1))]
    pub batch_size: usize,

    #[serde(default = "default_progress_interval")]
    #[validate(range(min = 1))]
    pub progress_interval: usize,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            station: default_station(),
            batch_size: default_batch_size(),
            progress_interval: default_progress_interval(),
        }
    }
}

fn default_station() -> String {
    DEFAULT_STATION_NAME.to_string()
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_progress_interval() -> usize {
    DEFAULT_PROGRESS_INTERVAL
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ImporterConfig {
    /// Load the file at `path`, apply environment overrides and validate.
    pub fn load(path: &Path) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from(path))
            .add_source(
                Environment::with_prefix("NETATMO")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: ImporterConfig = settings.try_deserialize()?;
        config.validate()?;

        debug!(
            "Loaded configuration from {} (org: {}, bucket: {})",
            path.display(),
            config.influx.org,
            config.influx.bucket
        );
        Ok(config)
    }

    /// Settings for runs that never contact the server.
    pub fn load_optional(path: &Path) -> Result<ImportSettings> {
        if !path.exists() {
            return Ok(ImportSettings::default());
        }
        Ok(Self::load(path)?.import)
    }
}
