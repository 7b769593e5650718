//! User settings loaded from a config file and the environment.
//!
//! Lookup order, later sources overriding earlier ones:
//! 1. `<config dir>/rangefetch/config.toml` (or the file given explicitly)
//! 2. `RANGEFETCH_*` environment variables, e.g. `RANGEFETCH_PARTS=8`
//!
//! Every field is optional; command-line flags override whatever is set here.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = concat!("rangefetch/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Default, Clone, Deserialize)]
pub struct Settings {
    pub parts: Option<usize>,
    pub min_segment_size: Option<u64>,
    pub output_dir: Option<String>,
    /// Whole-request timeout, body included. Unset means no timeout.
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
    pub legacy_range_end: Option<bool>,
}

impl Settings {
    /// Default location of the config file, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("rangefetch").join("config.toml"))
    }

    /// Loads settings from the default location and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::default_path().as_deref(), false)
    }

    /// Loads settings from `path`. When `required` is set, a missing file is
    /// an error instead of being skipped.
    pub fn load_from(path: Option<&Path>, required: bool) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(required));
        }
        builder
            .add_source(Environment::with_prefix("RANGEFETCH").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Builds the HTTP client shared by every segment fetch.
    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().user_agent(
            self.user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        );
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder.build()
    }
}
