//! Configuration module
//!
//! Loaded from TOML (`~/.config/kg-api-contract/config.toml` by default).
//! Every section is optional; missing values fall back to the defaults below.
//!
//! ```toml
//! [pagination]
//! default_page_size = 10
//! max_page_size = 100
//! default_sort_order = "DESC"
//!
//! [logging]
//! level = "info"
//! format = "text"   # or "json"
//!
//! [contract]
//! mode = "warn"     # off | warn | strict
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::shared::types::{ConfigError, SortOrder, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Env var overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "KG_CONTRACT_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    #[validate(nested)]
    pub pagination: PaginationConfig,
    pub logging: LoggingConfig,
    pub contract: ContractConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Missing file means defaults; an unreadable or invalid one is still an error.
    ///
    /// Does not log, so it can run before the subscriber is installed.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }
}

/// `$KG_CONTRACT_CONFIG`, else `<config dir>/kg-api-contract/config.toml`.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    match dirs_next::config_dir() {
        Some(dir) => dir.join("kg-api-contract").join("config.toml"),
        None => PathBuf::from("config.toml"),
    }
}

/// Pagination bounds applied when parsing query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_page_size_bounds"))]
pub struct PaginationConfig {
    #[validate(range(min = 1, max = 10000))]
    pub default_page_size: u64,
    #[validate(range(min = 1, max = 10000))]
    pub max_page_size: u64,
    pub default_sort_order: SortOrder,
}

fn validate_page_size_bounds(config: &PaginationConfig) -> Result<(), ValidationError> {
    if config.default_page_size > config.max_page_size {
        return Err(ValidationError::new("default_page_size_exceeds_max")
            .with_message("default_page_size must not exceed max_page_size".into()));
    }
    Ok(())
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            default_sort_order: SortOrder::Desc,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `trace`, `debug`, `info`, `warn`, `error` or a full filter directive
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// What the response middleware does with non-conforming bodies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractMode {
    Off,
    #[default]
    Warn,
    Strict,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    pub mode: ContractMode,
    /// Larger JSON bodies are not buffered for inspection
    pub max_body_bytes: usize,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            mode: ContractMode::Warn,
            max_body_bytes: 4 * 1024 * 1024,
        }
    }
}
