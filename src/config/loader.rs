//! Configuration Loader
//!
//! Loads and validates configuration from TOML files matching config/scout.toml.
//! Every section is optional; missing fields fall back to the defaults below.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::adapters::dashboard::DashboardConfig;
use crate::adapters::dexscreener::{DexScreenerConfig, DEFAULT_BASE_URL, DEFAULT_CHAIN_ID};
use crate::application::ScanLoopConfig;
use crate::domain::ScoringConfig;

/// Environment variable overriding `client.base_url`
pub const BASE_URL_ENV: &str = "DEXSCREENER_API_URL";

/// Main configuration structure matching config/scout.toml
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Seconds between scan cycles (10-300)
    pub scan_interval_seconds: u64,
    pub hard_filters: HardFiltersSection,
    pub scoring: ScoringSection,
    pub client: ClientSection,
    pub dashboard: DashboardSection,
    pub logging: LoggingSection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scan_interval_seconds: 30,
            hard_filters: HardFiltersSection::default(),
            scoring: ScoringSection::default(),
            client: ClientSection::default(),
            dashboard: DashboardSection::default(),
            logging: LoggingSection::default(),
        }
    }
}

/// Safety gates; a token failing any of these is never scored
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HardFiltersSection {
    /// Minimum pool liquidity in USD
    pub min_liquidity_usd: f64,
    /// Minimum buys + sells over 24h
    pub min_trader_count: u64,
}

impl Default for HardFiltersSection {
    fn default() -> Self {
        Self {
            min_liquidity_usd: 5_000.0,
            min_trader_count: 20,
        }
    }
}

/// Scoring weights and pass threshold
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoringSection {
    /// Minimum weighted total to report a match (0-20)
    pub min_score: i64,
    /// Weight for the age component (0-5)
    pub age_weight: f64,
    /// Weight for the volume/liquidity component (0-5)
    pub volume_weight: f64,
    /// Weight for the momentum component (0-5)
    pub momentum_weight: f64,
}

impl Default for ScoringSection {
    fn default() -> Self {
        Self {
            min_score: 5,
            age_weight: 1.0,
            volume_weight: 1.0,
            momentum_weight: 0.5,
        }
    }
}

/// DexScreener client settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientSection {
    /// API base URL
    pub base_url: String,
    /// Chain identifier to scan
    pub chain_id: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Total attempts on transport failure
    pub max_retries: u32,
    /// Delay between attempts in seconds
    pub retry_delay_secs: u64,
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            chain_id: DEFAULT_CHAIN_ID.to_string(),
            timeout_secs: 10,
            max_retries: 3,
            retry_delay_secs: 5,
        }
    }
}

impl ClientSection {
    /// Get base URL with environment variable override
    /// Checks DEXSCREENER_API_URL env var first, falls back to config value
    pub fn get_base_url(&self) -> String {
        std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| self.base_url.clone())
    }
}

/// Dashboard display settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardSection {
    /// Number of most recent matches kept on screen
    pub max_matches: usize,
}

impl Default for DashboardSection {
    fn default() -> Self {
        Self { max_matches: 10 }
    }
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Log file path; logs go to stderr when unset
    pub log_file: Option<PathBuf>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_file: None,
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

fn check_range<T: PartialOrd + std::fmt::Display>(
    name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::ValidationError(format!(
            "{} must be {}-{}, got {}",
            name, min, max, value
        )));
    }
    Ok(())
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Scan cadence
        check_range("scan_interval_seconds", self.scan_interval_seconds, 10, 300)?;

        // Hard filters
        if !self.hard_filters.min_liquidity_usd.is_finite()
            || self.hard_filters.min_liquidity_usd < 0.0
        {
            return Err(ConfigError::ValidationError(format!(
                "hard_filters.min_liquidity_usd must be >= 0, got {}",
                self.hard_filters.min_liquidity_usd
            )));
        }

        // Scoring
        check_range("scoring.min_score", self.scoring.min_score, 0, 20)?;
        for (name, weight) in [
            ("scoring.age_weight", self.scoring.age_weight),
            ("scoring.volume_weight", self.scoring.volume_weight),
            ("scoring.momentum_weight", self.scoring.momentum_weight),
        ] {
            if weight.is_nan() {
                return Err(ConfigError::ValidationError(format!("{} must be a number", name)));
            }
            check_range(name, weight, 0.0, 5.0)?;
        }

        // Client
        if self.client.base_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "client.base_url cannot be empty".to_string(),
            ));
        }
        if self.client.chain_id.is_empty() {
            return Err(ConfigError::ValidationError(
                "client.chain_id cannot be empty".to_string(),
            ));
        }
        check_range("client.timeout_secs", self.client.timeout_secs, 1, 120)?;
        check_range("client.max_retries", self.client.max_retries, 1, 10)?;
        check_range("client.retry_delay_secs", self.client.retry_delay_secs, 0, 60)?;

        // Dashboard
        check_range("dashboard.max_matches", self.dashboard.max_matches, 1, 100)?;

        // Logging
        if !matches!(
            self.logging.level.to_lowercase().as_str(),
            "trace" | "debug" | "info" | "warn" | "error"
        ) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of trace/debug/info/warn/error, got {}",
                self.logging.level
            )));
        }

        Ok(())
    }
}

impl From<&Config> for ScoringConfig {
    fn from(config: &Config) -> Self {
        ScoringConfig {
            min_liquidity_usd: config.hard_filters.min_liquidity_usd,
            min_trader_count: config.hard_filters.min_trader_count,
            min_score: config.scoring.min_score,
            age_weight: config.scoring.age_weight,
            volume_weight: config.scoring.volume_weight,
            momentum_weight: config.scoring.momentum_weight,
        }
    }
}

impl From<&Config> for DexScreenerConfig {
    fn from(config: &Config) -> Self {
        DexScreenerConfig {
            base_url: config.client.get_base_url(),
            chain_id: config.client.chain_id.clone(),
            timeout: Duration::from_secs(config.client.timeout_secs),
            max_retries: config.client.max_retries,
            retry_delay: Duration::from_secs(config.client.retry_delay_secs),
        }
    }
}

impl From<&Config> for ScanLoopConfig {
    fn from(config: &Config) -> Self {
        ScanLoopConfig {
            scan_interval: Duration::from_secs(config.scan_interval_seconds),
        }
    }
}

impl From<&Config> for DashboardConfig {
    fn from(config: &Config) -> Self {
        DashboardConfig {
            max_matches: config.dashboard.max_matches,
        }
    }
}
