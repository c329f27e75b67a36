//! Catalog configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SUPRA_CATALOG_URL` - Upstream catalog endpoint returning the combined
//!   products + beverages payload
//!
//! ## Optional
//! - `SUPRA_DATA_DIR` - Directory for durable catalog/cart snapshots
//!   (default: `.supra`)
//! - `SUPRA_MAX_AGE_SECS` - Cached catalog age before it counts as stale
//!   (default: 600)

use std::path::PathBuf;

use chrono::Duration;
use thiserror::Error;

const DEFAULT_DATA_DIR: &str = ".supra";
const DEFAULT_MAX_AGE_SECS: i64 = 600;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Catalog application configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Upstream catalog endpoint URL
    pub catalog_url: String,
    /// Directory holding the durable catalog and cart snapshots
    pub data_dir: PathBuf,
    /// Maximum cached catalog age before `refresh_if_stale` refetches
    pub max_age: Duration,
}

impl CatalogConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let catalog_url = get_required_env("SUPRA_CATALOG_URL")?;
        let data_dir = PathBuf::from(get_env_or_default("SUPRA_DATA_DIR", DEFAULT_DATA_DIR));
        let max_age_secs = get_env_or_default(
            "SUPRA_MAX_AGE_SECS",
            &DEFAULT_MAX_AGE_SECS.to_string(),
        )
        .parse::<i64>()
        .map_err(|e| ConfigError::InvalidEnvVar("SUPRA_MAX_AGE_SECS".to_string(), e.to_string()))?;
        if max_age_secs < 0 {
            return Err(ConfigError::InvalidEnvVar(
                "SUPRA_MAX_AGE_SECS".to_string(),
                "must be non-negative".to_string(),
            ));
        }

        Ok(Self {
            catalog_url,
            data_dir,
            max_age: Duration::seconds(max_age_secs),
        })
    }

    /// Build a configuration directly, bypassing the environment.
    ///
    /// Used by tests and by embedders that own their composition root.
    #[must_use]
    pub fn new(catalog_url: impl Into<String>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            catalog_url: catalog_url.into(),
            data_dir: data_dir.into(),
            max_age: Duration::seconds(DEFAULT_MAX_AGE_SECS),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
