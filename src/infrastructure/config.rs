//! Configuration infrastructure
//!
//! `AppConfig` is assembled once per process: compiled-in defaults, then an
//! optional config file, then `FILMCRAWL_*` environment variables
//! (`FILMCRAWL_CRAWL__POOL_SIZE=8`, `FILMCRAWL_LOGGING__LEVEL=debug`, ...).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Default values
pub mod defaults {
    pub const CATALOG_BASE_URL: &str = "https://api.mubi.com/v3";
    /// Number of collections requested from group discovery
    pub const GROUP_COUNT: u32 = 40;
    /// Items per listing page
    pub const PAGE_SIZE: u32 = 40;
    pub const CLIENT_COUNTRY: &str = "US";

    pub const SCORE_SEARCH_URL: &str = "https://www.metacritic.com/autosearch";
    pub const YEAR_TOLERANCE: i32 = 1;

    /// Concurrent enrichments per listing page
    pub const POOL_SIZE: usize = 4;
    pub const DATA_DIR: &str = "data";
    pub const SUITE: &str = "mubi";

    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;
    pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/107.0.0.0 Safari/537.36";

    pub const RESCORE_PACE_MS: u64 = 500;
    /// Progress line every N rescore attempts
    pub const RESCORE_LOG_EVERY: usize = 10;

    pub const LOG_LEVEL: &str = "info";
    pub const LOG_DIR: &str = "logs";
    pub const LOG_FILE_NAME: &str = "film-crawler.log";
}

const ENV_PREFIX: &str = "FILMCRAWL";

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub score_provider: ScoreProviderConfig,
    pub crawl: CrawlConfig,
    pub http: HttpConfig,
    pub rescore: RescoreSettings,
    pub logging: LoggingConfig,
}

/// Streaming catalog endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    pub group_count: u32,
    pub page_size: u32,
    pub client_country: String,
    pub include_upcoming: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::CATALOG_BASE_URL.to_string(),
            group_count: defaults::GROUP_COUNT,
            page_size: defaults::PAGE_SIZE,
            client_country: defaults::CLIENT_COUNTRY.to_string(),
            include_upcoming: true,
        }
    }
}

/// Critic score search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreProviderConfig {
    pub search_url: String,
    /// Accepted distance in years between the film and a candidate
    pub year_tolerance: i32,
}

impl Default for ScoreProviderConfig {
    fn default() -> Self {
        Self {
            search_url: defaults::SCORE_SEARCH_URL.to_string(),
            year_tolerance: defaults::YEAR_TOLERANCE,
        }
    }
}

/// Crawl and output layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    pub pool_size: usize,
    pub data_dir: PathBuf,
    /// Suffix of the consolidated file: `<YYYYMMDD>_<suite>.csv`
    pub suite: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            pool_size: defaults::POOL_SIZE,
            data_dir: PathBuf::from(defaults::DATA_DIR),
            suite: defaults::SUITE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            user_agent: defaults::USER_AGENT.to_string(),
        }
    }
}

/// Pacing and progress reporting of the rescore job
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RescoreSettings {
    pub pace_ms: u64,
    pub log_every: usize,
}

impl RescoreSettings {
    #[must_use]
    pub const fn pace(&self) -> Duration {
        Duration::from_millis(self.pace_ms)
    }

    /// Whether a progress line is due after `attempted` lookups.
    /// A `log_every` of 0 reports after every lookup.
    #[must_use]
    pub fn progress_due(&self, attempted: usize) -> bool {
        attempted > 0 && attempted % self.log_every.max(1) == 0
    }
}

impl Default for RescoreSettings {
    fn default() -> Self {
        Self {
            pace_ms: defaults::RESCORE_PACE_MS,
            log_every: defaults::RESCORE_LOG_EVERY,
        }
    }
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,
    pub json_format: bool,
    pub console_output: bool,
    pub file_output: bool,
    pub log_dir: PathBuf,
    pub file_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: false,
            console_output: true,
            file_output: true,
            log_dir: PathBuf::from(defaults::LOG_DIR),
            file_name: defaults::LOG_FILE_NAME.to_string(),
        }
    }
}

impl AppConfig {
    /// Defaults overlaid with `path` (if given) and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.crawl.pool_size == 0 {
            return Err(ConfigError::Validation {
                message: "crawl.pool_size must be greater than 0".to_string(),
            });
        }
        if self.catalog.page_size == 0 {
            return Err(ConfigError::Validation {
                message: "catalog.page_size must be greater than 0".to_string(),
            });
        }
        if self.catalog.base_url.trim().is_empty() || self.score_provider.search_url.trim().is_empty() {
            return Err(ConfigError::Validation {
                message: "endpoint URLs must not be empty".to_string(),
            });
        }
        if self.score_provider.year_tolerance < 0 {
            return Err(ConfigError::Validation {
                message: "score_provider.year_tolerance must not be negative".to_string(),
            });
        }
        if self.rescore.log_every == 0 {
            return Err(ConfigError::Validation {
                message: "rescore.log_every must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_the_crawl_contract() {
        let config = AppConfig::default();
        assert_eq!(config.crawl.pool_size, 4);
        assert_eq!(config.catalog.page_size, 40);
        assert_eq!(config.score_provider.year_tolerance, 1);
        assert_eq!(config.rescore.log_every, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rescore_progress_cadence() {
        let every_third = RescoreSettings { pace_ms: 0, log_every: 3 };
        let due: Vec<usize> = (0..=9).filter(|&n| every_third.progress_due(n)).collect();
        assert_eq!(due, [3, 6, 9]);

        let every_lookup = RescoreSettings { pace_ms: 0, log_every: 0 };
        assert!((1..=4).all(|n| every_lookup.progress_due(n)));
        assert!(!every_lookup.progress_due(0));
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[crawl]\npool_size = 8\nsuite = \"weekly\"\n\n[rescore]\npace_ms = 50").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.crawl.pool_size, 8);
        assert_eq!(config.crawl.suite, "weekly");
        assert_eq!(config.rescore.pace(), Duration::from_millis(50));
        // untouched sections keep their defaults
        assert_eq!(config.catalog.page_size, defaults::PAGE_SIZE);
    }

    #[test]
    fn zero_pool_size_is_rejected() {
        let mut config = AppConfig::default();
        config.crawl.pool_size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation { .. })));
    }
}
