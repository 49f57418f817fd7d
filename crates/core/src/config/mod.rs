//! Client configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (WAYBACK_*)
//! 2. TOML config file (if WAYBACK_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Client configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (WAYBACK_*)
/// 2. TOML config file (if WAYBACK_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaybackConfig {
    /// Path to the SQLite cache database.
    ///
    /// Set via WAYBACK_CACHE_PATH environment variable.
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via WAYBACK_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds, applied to every archive call.
    ///
    /// Set via WAYBACK_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_cache_path() -> PathBuf {
    std::env::temp_dir().join("wayback").join("cache.sqlite")
}

fn default_user_agent() -> String {
    "wayback-client/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

impl Default for WaybackConfig {
    fn default() -> Self {
        Self {
            cache_path: default_cache_path(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl WaybackConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `WAYBACK_`
    /// 2. TOML file from `WAYBACK_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("WAYBACK_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("WAYBACK_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WaybackConfig::default();
        assert!(config.cache_path.ends_with("wayback/cache.sqlite"));
        assert_eq!(config.user_agent, "wayback-client/0.1");
        assert_eq!(config.timeout_ms, 20_000);
    }

    #[test]
    fn test_timeout_duration() {
        let config = WaybackConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(20_000));
    }
}
