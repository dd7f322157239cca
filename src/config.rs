//! Runtime configuration loaded from an optional YAML file.
//!
//! Every field has a default, so running without a config file behaves like
//! the stock Hacker News setup. Command-line flags override file values.
//!
//! # Example
//!
//! ```yaml
//! database_url: "sqlite://hn_archive.db?mode=rwc"
//! scraper:
//!   base_url: "https://news.ycombinator.com"
//!   timeout_ms: 10000
//!   max_pages: 100
//! ```

use serde::Deserialize;
use std::time::Duration;
use tracing::{info, instrument};
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://hn_archive.db?mode=rwc";

/// Top-level configuration file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// sqlx-compatible SQLite URL.
    pub database_url: String,
    pub scraper: ScraperConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            scraper: ScraperConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load the config file at `path`, or the defaults when no path is given.
    #[instrument(level = "info")]
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        let config = Self::from_yaml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
        info!(path, "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(raw)
    }
}

/// Everything the page fetcher and extractor need to know about the source.
///
/// Built once at startup and shared read-only.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScraperConfig {
    /// Origin of the aggregator; also the base for relative article links.
    pub base_url: String,
    /// Name used in error messages and as the fallback `source` label.
    pub site_name: String,
    pub timeout_ms: u64,
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    /// Upper bound on pages fetched per run.
    pub max_pages: u32,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://news.ycombinator.com".to_string(),
            site_name: "Hacker News".to_string(),
            timeout_ms: 10_000,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/avx-webp,*/*;q=0.8".to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            max_pages: 100,
        }
    }
}

impl ScraperConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// The aggregator origin as a URL with a trailing slash, ready for `join`.
    pub fn origin(&self) -> Result<Url, ConfigError> {
        let mut raw = self.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Url::parse(&raw).map_err(|source| ConfigError::BaseUrl {
            url: self.base_url.clone(),
            source,
        })
    }
}
