//! Configuration Module
//!
//! Loads and validates configuration from TOML files.

pub mod loader;

pub use loader::{
    Config, ConfigError, load_config, parse_config,
    HardFiltersSection, ScoringSection, ClientSection, DashboardSection, LoggingSection,
    BASE_URL_ENV,
};
