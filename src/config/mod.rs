//! Configuration management for ipolens
//!
//! This module handles loading and validating configuration from environment
//! variables and TOML files. Credentials and endpoints only ever come from
//! here; collaborators receive them explicitly.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::{CompetitorRecord, KeywordVocabulary};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Keyword analysis configuration
    pub analysis: AnalysisConfig,

    /// News sentiment source configuration
    pub news: NewsConfig,

    /// Ticker resolution and market data configuration
    pub market: MarketConfig,

    /// Shared HTTP client configuration
    pub http: HttpConfig,

    /// Report output configuration
    pub report: ReportConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Keyword analysis configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Ordered vocabulary of financial terms
    pub vocabulary: KeywordVocabulary,
}

/// News API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    /// Fetch news sentiment at all
    pub enabled: bool,

    /// News API base URL
    pub base_url: String,

    /// News API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: String::from("https://newsapi.org"),
            api_key: None,
        }
    }
}

/// Ticker resolution and market data configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Resolve a ticker for the company name; failure aborts the analysis
    pub resolve_ticker: bool,

    /// Ticker search base URL
    pub search_url: String,

    /// Fetch quote and peer data from the screener
    pub use_screener: bool,

    /// Screener base URL
    pub screener_url: String,

    /// Static competitor records; used instead of the screener when present
    pub competitors: Vec<CompetitorRecord>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            resolve_ticker: true,
            search_url: String::from("https://query1.finance.yahoo.com"),
            use_screener: true,
            screener_url: String::from("https://www.screener.in"),
            competitors: Vec::new(),
        }
    }
}

/// Shared HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Rate limit (requests per second) per collaborator
    pub requests_per_second: u32,

    /// Fixed delay before the single retry of a rate-limited request
    pub rate_limit_retry_delay_secs: u64,

    /// User agent string
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            requests_per_second: 2,
            rate_limit_retry_delay_secs: 120,
            user_agent: format!("ipolens/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Report output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory reports are written to
    pub output_dir: PathBuf,

    /// Report format (markdown, json)
    pub format: String,

    /// Append a timestamp to report filenames
    pub timestamped: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("reports"),
            format: String::from("markdown"),
            timestamped: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables on top of defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        config.apply_env()?;
        Ok(config)
    }

    /// Override values from `IPOLENS_*` environment variables
    fn apply_env(&mut self) -> Result<()> {
        if let Ok(key) = std::env::var("IPOLENS_NEWS_API_KEY") {
            self.news.api_key = Some(key);
        }

        if let Ok(url) = std::env::var("IPOLENS_NEWS_URL") {
            self.news.base_url = url;
        }

        if let Ok(url) = std::env::var("IPOLENS_SEARCH_URL") {
            self.market.search_url = url;
        }

        if let Ok(url) = std::env::var("IPOLENS_SCREENER_URL") {
            self.market.screener_url = url;
        }

        if let Ok(terms) = std::env::var("IPOLENS_VOCABULARY") {
            self.analysis.vocabulary = KeywordVocabulary::new(terms.split(','))
                .context("Invalid IPOLENS_VOCABULARY")?;
        }

        if let Some(secs) = std::env::var("IPOLENS_RATE_LIMIT_RETRY_DELAY")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            self.http.rate_limit_retry_delay_secs = secs;
        }

        if let Ok(dir) = std::env::var("IPOLENS_OUTPUT_DIR") {
            self.report.output_dir = PathBuf::from(dir);
        }

        if let Ok(level) = std::env::var("IPOLENS_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Ok(format) = std::env::var("IPOLENS_LOG_FORMAT") {
            self.logging.format = format;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.analysis.vocabulary.is_empty() {
            anyhow::bail!("analysis.vocabulary must contain at least one term");
        }

        if self.http.requests_per_second == 0 {
            anyhow::bail!("requests_per_second must be greater than 0");
        }

        if self.http.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        if !matches!(self.report.format.as_str(), "markdown" | "json") {
            anyhow::bail!("unknown report format: {}", self.report.format);
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            anyhow::bail!("unknown log format: {}", self.logging.format);
        }

        for competitor in &self.market.competitors {
            if !(0.0..=100.0).contains(&competitor.market_share_percent) {
                anyhow::bail!(
                    "market share of {} must be within 0-100, got {}",
                    competitor.name,
                    competitor.market_share_percent
                );
            }
        }

        Ok(())
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.http.request_timeout_secs)
    }

    /// Get the rate-limit retry delay as Duration
    #[must_use]
    pub fn rate_limit_retry_delay(&self) -> Duration {
        Duration::from_secs(self.http.rate_limit_retry_delay_secs)
    }

    /// Render the configuration as TOML, without secrets
    pub fn to_toml(&self) -> Result<String> {
        let mut redacted = self.clone();
        redacted.news.api_key = None;
        toml::to_string_pretty(&redacted).context("Failed to serialize config")
    }
}
