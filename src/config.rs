//! Collector configuration.
//!
//! Values come from an optional YAML file and are then overridden by CLI
//! flags. Every field has a default, so an empty file (or no file at all)
//! reproduces the stock daily collection.
//!
//! ```yaml
//! listing_url: https://world.kbs.co.kr/service/news_list.htm?lang=k
//! article_url_template: https://news.kbs.co.kr/news/view.do?ncd={id}
//! article_count: 5
//! request_delay_ms: 500
//! request_timeout_secs: 30
//! schedule:
//!   at: "02:59"
//!   catch_up: false
//! ```

use crate::cli::Cli;
use crate::error::{PipelineError, Result};
use crate::models::ArticleId;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

pub const DEFAULT_LISTING_URL: &str = "https://world.kbs.co.kr/service/news_list.htm?lang=k";
pub const DEFAULT_ARTICLE_URL_TEMPLATE: &str = "https://news.kbs.co.kr/news/view.do?ncd={id}";

/// Placeholder substituted with the article id in `article_url_template`.
const ID_PLACEHOLDER: &str = "{id}";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollectorConfig {
    /// Listing page holding the newest article link.
    pub listing_url: String,
    /// Article detail URL with an `{id}` placeholder.
    pub article_url_template: String,
    /// Number of articles scraped per run, counting down from the newest.
    pub article_count: usize,
    /// Pause after each article request.
    pub request_delay_ms: u64,
    /// Per-request timeout. `None` waits indefinitely.
    pub request_timeout_secs: Option<u64>,
    pub user_agent: String,
    pub schedule: ScheduleConfig,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            article_url_template: DEFAULT_ARTICLE_URL_TEMPLATE.to_string(),
            article_count: 5,
            request_delay_ms: 500,
            request_timeout_secs: Some(30),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            schedule: ScheduleConfig::default(),
        }
    }
}

/// Daily trigger, evaluated in UTC.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleConfig {
    /// Time of day as `HH:MM`.
    pub at: String,
    /// Replay a missed slot immediately on startup.
    pub catch_up: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            at: "02:59".to_string(),
            catch_up: false,
        }
    }
}

impl ScheduleConfig {
    pub fn time_of_day(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(&self.at, "%H:%M").map_err(|e| {
            PipelineError::Config(format!("schedule.at `{}` is not HH:MM: {}", self.at, e))
        })
    }
}

impl CollectorConfig {
    /// Load from a YAML file, or return defaults when `path` is `None`.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&str>) -> Result<Self> {
        let config = match path {
            Some(p) => {
                let raw = tokio::fs::read_to_string(Path::new(p)).await?;
                let config = Self::from_yaml(&raw)?;
                info!(path = p, "Loaded configuration file");
                config
            }
            None => {
                debug!("No configuration file given; using defaults");
                Self::default()
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Apply CLI overrides on top of file values.
    pub fn merge_cli(mut self, cli: &Cli) -> Result<Self> {
        if let Some(count) = cli.count {
            self.article_count = count;
        }
        if let Some(delay) = cli.delay_ms {
            self.request_delay_ms = delay;
        }
        if let Some(timeout) = cli.timeout_secs {
            self.request_timeout_secs = if timeout == 0 { None } else { Some(timeout) };
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        parse_url(&self.listing_url)?;
        if !self.article_url_template.contains(ID_PLACEHOLDER) {
            return Err(PipelineError::Config(format!(
                "article_url_template `{}` has no {} placeholder",
                self.article_url_template, ID_PLACEHOLDER
            )));
        }
        parse_url(&self.article_url_for(1))?;
        self.schedule.time_of_day()?;
        Ok(())
    }

    pub fn article_url_for(&self, id: ArticleId) -> String {
        self.article_url_template
            .replace(ID_PLACEHOLDER, &id.to_string())
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

pub fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|source| PipelineError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults_match_daily_collection() {
        let config = CollectorConfig::default();
        assert_eq!(config.article_count, 5);
        assert_eq!(config.request_delay(), Duration::from_millis(500));
        assert_eq!(config.schedule.at, "02:59");
        assert!(!config.schedule.catch_up);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_article_url_for() {
        let config = CollectorConfig::default();
        assert_eq!(
            config.article_url_for(7701599),
            "https://news.kbs.co.kr/news/view.do?ncd=7701599"
        );
    }

    #[test]
    fn test_from_yaml_partial_keeps_defaults() {
        let config = CollectorConfig::from_yaml("article_count: 3\nschedule:\n  at: \"06:30\"\n").unwrap();
        assert_eq!(config.article_count, 3);
        assert_eq!(config.schedule.at, "06:30");
        assert_eq!(config.request_delay_ms, 500);
        assert_eq!(config.listing_url, DEFAULT_LISTING_URL);
    }

    #[test]
    fn test_from_yaml_empty_is_default() {
        assert_eq!(CollectorConfig::from_yaml("  \n").unwrap(), CollectorConfig::default());
    }

    #[test]
    fn test_from_yaml_rejects_unknown_field() {
        assert!(matches!(
            CollectorConfig::from_yaml("artcle_count: 3\n"),
            Err(PipelineError::Yaml(_))
        ));
    }

    #[test]
    fn test_validate_rejects_template_without_placeholder() {
        let config = CollectorConfig {
            article_url_template: "https://news.kbs.co.kr/news/view.do".to_string(),
            ..CollectorConfig::default()
        };
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_listing_url() {
        let config = CollectorConfig {
            listing_url: "not a url".to_string(),
            ..CollectorConfig::default()
        };
        assert!(matches!(config.validate(), Err(PipelineError::InvalidUrl { .. })));
    }

    #[test]
    fn test_validate_rejects_bad_schedule() {
        let mut config = CollectorConfig::default();
        config.schedule.at = "25:99".to_string();
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_merge_cli_overrides() {
        let cli = Cli::parse_from(["kbs_article_collector", "--count", "2", "--delay-ms", "0", "--timeout-secs", "0"]);
        let config = CollectorConfig::default().merge_cli(&cli).unwrap();
        assert_eq!(config.article_count, 2);
        assert_eq!(config.request_delay(), Duration::ZERO);
        assert_eq!(config.request_timeout(), None);
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collector.yaml");
        tokio::fs::write(&path, "article_count: 8\nrequest_delay_ms: 250\n")
            .await
            .unwrap();

        let config = CollectorConfig::load(path.to_str()).await.unwrap();
        assert_eq!(config.article_count, 8);
        assert_eq!(config.request_delay_ms, 250);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_io_error() {
        let result = CollectorConfig::load(Some("/definitely/not/here.yaml")).await;
        assert!(matches!(result, Err(PipelineError::Io(_))));
    }
}
