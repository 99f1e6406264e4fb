//! Configuration for connecting to the cluster
//!
//! Loaded from a TOML file; every key has a default so an empty file (or no
//! file at all) targets a local unauthenticated cluster.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use url::Url;

use crate::client::AuthMethod;
use crate::error::ConfigError;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub elasticsearch: ElasticsearchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ElasticsearchConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default)]
    pub auth: AuthMethod,
    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Refresh the index after each write
    #[serde(default)]
    pub refresh: bool,
}

fn default_url() -> String {
    "http://localhost:9200".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ElasticsearchConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            auth: AuthMethod::default(),
            timeout_secs: default_timeout_secs(),
            refresh: false,
        }
    }
}

impl ElasticsearchConfig {
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        Ok(Url::parse(&self.url)?)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        content.parse()
    }

    /// Load `path` if given, otherwise fall back to defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Config = toml::from_str(s)?;
        config.elasticsearch.base_url()?;
        Ok(config)
    }
}
