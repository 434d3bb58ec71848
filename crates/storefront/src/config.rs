//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_BASE_URL` - Origin serving the static site (default: `http://127.0.0.1:5173`)
//! - `STOREFRONT_ENTRY_PATH` - Entry document holding `<main>` (default: `/index.html`)
//! - `STOREFRONT_START_PATH` - Location loaded at boot (default: `/`)
//! - `STOREFRONT_HTML_ROOT` - Directory of page and component fragments (default: `/html`)
//! - `STOREFRONT_CATALOG_PATH` - JSON book catalog (default: `/json/books.json`)
//! - `STOREFRONT_MAX_MOUNT_DEPTH` - Component nesting limit (default: 16)
//! - `STOREFRONT_CURRENCY_LABEL` - Label printed after prices (default: `SEK`)
//! - `STOREFRONT_LOG_FORMAT` - `text` or `json` (default: `text`)

use thiserror::Error;
use url::Url;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5173";
const DEFAULT_MAX_MOUNT_DEPTH: usize = 16;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Storefront session configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Origin serving pages, components and the catalog
    pub base_url: Url,
    /// Path of the entry document fetched at boot
    pub entry_path: String,
    /// Location the session starts at
    pub start_path: String,
    /// Path prefix under which page and component fragments live
    pub html_root: String,
    /// Path of the JSON catalog
    pub catalog_path: String,
    /// Maximum component nesting before mounting gives up
    pub max_mount_depth: usize,
    /// Label printed after every price
    pub currency_label: String,
    /// Tracing output format
    pub log_format: LogFormat,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let base_url = Url::parse(&get("STOREFRONT_BASE_URL", DEFAULT_BASE_URL)).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_BASE_URL".to_string(), e.to_string())
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_BASE_URL".to_string(),
                "must be an absolute http(s) URL".to_string(),
            ));
        }

        let path = |key: &str, default: &str| absolute_path(key, get(key, default));

        let entry_path = path("STOREFRONT_ENTRY_PATH", "/index.html")?;
        let start_path = path("STOREFRONT_START_PATH", "/")?;
        let html_root = path("STOREFRONT_HTML_ROOT", "/html")?
            .trim_end_matches('/')
            .to_string();
        let catalog_path = path("STOREFRONT_CATALOG_PATH", "/json/books.json")?;

        let max_mount_depth = match lookup("STOREFRONT_MAX_MOUNT_DEPTH") {
            Some(raw) => parse_mount_depth(&raw)?,
            None => DEFAULT_MAX_MOUNT_DEPTH,
        };

        let currency_label = get("STOREFRONT_CURRENCY_LABEL", "SEK");

        let log_format = match get("STOREFRONT_LOG_FORMAT", "text").to_lowercase().as_str() {
            "text" => LogFormat::Text,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "STOREFRONT_LOG_FORMAT".to_string(),
                    format!("expected 'text' or 'json', got '{other}'"),
                ));
            }
        };

        Ok(Self {
            base_url,
            entry_path,
            start_path,
            html_root,
            catalog_path,
            max_mount_depth,
            currency_label,
            log_format,
        })
    }

    /// Configuration for a site served from `base_url`, all other values default.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not an absolute URL.
    pub fn for_base_url(base_url: &str) -> Result<Self, ConfigError> {
        let base_url = base_url.to_string();
        Self::from_lookup(move |key| (key == "STOREFRONT_BASE_URL").then(|| base_url.clone()))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Require a value to be a site-absolute path (leading `/`).
fn absolute_path(key: &str, value: String) -> Result<String, ConfigError> {
    if value.starts_with('/') {
        Ok(value)
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("'{value}' must start with '/'"),
        ))
    }
}

fn parse_mount_depth(raw: &str) -> Result<usize, ConfigError> {
    let key = "STOREFRONT_MAX_MOUNT_DEPTH";
    let depth = raw
        .trim()
        .parse::<usize>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if depth == 0 {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be at least 1".to_string(),
        ));
    }
    Ok(depth)
}
