//! Configuration management.
//!
//! Settings come from a TOML file (see [`find_config_file`]) layered with
//! `ARXIV_FEED_*` environment variables, e.g. `ARXIV_FEED_API__TIMEOUT_SECS=60`.

mod file_config;

pub use file_config::ConfigFileError;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::{QueryBuilder, ARXIV_API_URL};
use crate::taxonomy::CATEGORY_TAXONOMY_URL;
use crate::utils::DEFAULT_USER_AGENT;

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "ARXIV_FEED";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Remote endpoints and HTTP settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Defaults applied to searches
    #[serde(default)]
    pub search: SearchDefaults,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote endpoints and HTTP settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_query_url")]
    pub query_url: String,

    #[serde(default = "default_taxonomy_url")]
    pub taxonomy_url: String,

    /// Total request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            query_url: default_query_url(),
            taxonomy_url: default_taxonomy_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_query_url() -> String {
    ARXIV_API_URL.to_string()
}

fn default_taxonomy_url() -> String {
    CATEGORY_TAXONOMY_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// Defaults applied to searches when the caller does not set them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchDefaults {
    #[serde(default = "default_max_results")]
    pub max_results: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,

    #[serde(default)]
    pub ascending: bool,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            sort_by: None,
            ascending: false,
        }
    }
}

impl SearchDefaults {
    /// A query builder pre-filled with these defaults
    pub fn builder(&self) -> QueryBuilder {
        let builder = QueryBuilder::new()
            .max_results(self.max_results)
            .ascending(self.ascending);
        match &self.sort_by {
            Some(sort_by) => builder.sort_by(sort_by.clone()),
            None => builder,
        }
    }
}

fn default_max_results() -> u32 {
    10
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// `ARXIV_FEED_<SECTION>__<KEY>` environment variables
fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

/// Load configuration from a file, with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(env_source())
        .build()?;

    settings.try_deserialize()
}

/// Load configuration from environment variables only
pub fn load_env_config() -> Result<Config, config::ConfigError> {
    config::Config::builder()
        .add_source(env_source())
        .build()?
        .try_deserialize()
}

/// Find a configuration file in the default locations.
///
/// Looks for `./arxiv-feed.toml`, then `<config dir>/arxiv-feed/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("arxiv-feed.toml");
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("arxiv-feed").join("config.toml"))
        .filter(|path| path.is_file())
}
