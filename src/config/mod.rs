//! Configuration management.
//!
//! Settings come from defaults, an optional TOML file and `BOOK_FINDER_*`
//! environment variables (nested keys use `__`, e.g.
//! `BOOK_FINDER_SEARCH__EMPTY_PAGE_LIMIT=3`).
//!
//! ```toml
//! [api]
//! base_url = "https://www.googleapis.com/books/v1"
//! api_key = "your-api-key"
//! page_size = 40
//! timeout_secs = 30
//! max_attempts = 4
//!
//! [search]
//! excluded_categories = ["young adult", "juvenile"]
//! empty_page_limit = 5
//!
//! [search.length_thresholds]
//! short_below = 200
//! medium_max = 400
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::LengthThresholds;
use crate::sources::{GOOGLE_BOOKS_API_BASE, MAX_PAGE_SIZE};
use crate::utils::DEFAULT_TIMEOUT_SECS;

/// Category terms that exclude a book by default
pub const DEFAULT_EXCLUDED_CATEGORIES: [&str; 2] = ["young adult", "juvenile"];

/// Consecutive empty pages after which a search gives up
pub const DEFAULT_EMPTY_PAGE_LIMIT: u32 = 5;

/// File name looked up in the working and config directories
pub const CONFIG_FILE_NAME: &str = "book-finder.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Catalog API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Result collection settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Catalog API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the volumes API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Google Books API key (optional, raises quota)
    #[serde(default = "default_api_key")]
    pub api_key: Option<String>,

    /// Items requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Attempts per page fetch on transient failures
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: default_api_key(),
            page_size: default_page_size(),
            timeout_secs: default_timeout(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_base_url() -> String {
    GOOGLE_BOOKS_API_BASE.to_string()
}

fn default_api_key() -> Option<String> {
    std::env::var("GOOGLE_BOOKS_API_KEY").ok()
}

fn default_page_size() -> u32 {
    MAX_PAGE_SIZE
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_attempts() -> u32 {
    4
}

/// Settings owned by the result collector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Lowercase terms; a category containing any of them is rejected
    #[serde(default = "default_excluded_categories")]
    pub excluded_categories: Vec<String>,

    /// Consecutive empty pages that end a search
    #[serde(default = "default_empty_page_limit")]
    pub empty_page_limit: u32,

    /// Page-count thresholds for the length buckets
    #[serde(default)]
    pub length_thresholds: LengthThresholds,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            excluded_categories: default_excluded_categories(),
            empty_page_limit: default_empty_page_limit(),
            length_thresholds: LengthThresholds::default(),
        }
    }
}

fn default_excluded_categories() -> Vec<String> {
    DEFAULT_EXCLUDED_CATEGORIES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_empty_page_limit() -> u32 {
    DEFAULT_EMPTY_PAGE_LIMIT
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `json` for structured output, anything else for plain text
    #[serde(default)]
    pub format: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
        }
    }
}

impl LoggingConfig {
    /// Whether JSON log output was requested
    pub fn is_json(&self) -> bool {
        self.format
            .as_deref()
            .map(|f| f.eq_ignore_ascii_case("json"))
            .unwrap_or(false)
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(env_source())
        .build()?
        .try_deserialize()
}

/// Get the configuration from defaults and environment variables only
pub fn get_config() -> Result<Config, config::ConfigError> {
    config::Config::builder()
        .add_source(env_source())
        .build()?
        .try_deserialize()
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix("BOOK_FINDER")
        .prefix_separator("_")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("search.excluded_categories")
        .try_parsing(true)
}

/// Find a config file in the working directory or the user config directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("book-finder").join("config.toml"))
        .filter(|path| path.is_file())
}
