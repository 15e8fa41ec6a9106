//! Runtime configuration
//!
//! Settings are layered: built-in defaults, then a TOML file, then the
//! `EXCHANGE_RATE_URL` environment variable. The CLI applies its flags last.
//!
//! ```toml
//! rate_url = "https://www.77bank.co.jp/kawase/usd2023.html"
//! timeout_secs = 10
//! ```

use crate::error::{Result, VestError};
use crate::fx::{FileRateSource, HttpRateSource, RateSource, DEFAULT_RATE_URL};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the rate table URL
pub const RATE_URL_ENV: &str = "EXCHANGE_RATE_URL";

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default = "default_rate_url")]
    pub rate_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Saved copy of the rate page; used instead of `rate_url` when set
    #[serde(default)]
    pub rate_file: Option<PathBuf>,
}

fn default_rate_url() -> String {
    DEFAULT_RATE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rate_url: default_rate_url(),
            timeout_secs: default_timeout_secs(),
            rate_file: None,
        }
    }
}

impl Config {
    /// `~/.vest-valuator/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".vest-valuator").join("config.toml"))
    }

    /// Load from `path`, or from the default location when `path` is `None`.
    ///
    /// A missing or invalid file falls back to defaults.
    pub fn load(path: Option<&Path>) -> Self {
        if let Some(config_path) = path {
            match Self::from_file(config_path) {
                Ok(config) => return config,
                Err(e) => log::warn!("Ignoring config {}: {}", config_path.display(), e),
            }
        } else if let Some(default_config) = Self::default_path() {
            if default_config.exists() {
                if let Ok(config) = Self::from_file(&default_config) {
                    return config;
                }
            }
        }

        Config::default()
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| VestError::ConfigError(e.to_string()))
    }

    /// Apply `EXCHANGE_RATE_URL` from the process environment
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Apply environment overrides read through `lookup`
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(RATE_URL_ENV).filter(|url| !url.trim().is_empty()) {
            self.rate_url = url;
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build the rate source this configuration points at
    pub fn rate_source(&self) -> Result<Box<dyn RateSource>> {
        match &self.rate_file {
            Some(path) => Ok(Box::new(FileRateSource::new(path))),
            None => Ok(Box::new(HttpRateSource::new(
                self.rate_url.clone(),
                self.timeout(),
            )?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.rate_url, DEFAULT_RATE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.rate_file.is_none());
    }

    #[test]
    fn test_partial_toml() {
        let config = Config::from_toml("timeout_secs = 5").unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.rate_url, DEFAULT_RATE_URL);
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml("timeout_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, VestError::ConfigError(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "rate_url = \"https://www.77bank.co.jp/kawase/usd2023.html\"\nrate_file = \"/tmp/usd2023.html\""
        )
        .unwrap();

        let config = Config::load(Some(file.path()));
        assert_eq!(config.rate_url, "https://www.77bank.co.jp/kawase/usd2023.html");
        assert_eq!(config.rate_file, Some(PathBuf::from("/tmp/usd2023.html")));
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let config = Config::load(Some(Path::new("/nonexistent/vest-valuator.toml")));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_env_override() {
        let config = Config::default().with_env_from(|key| {
            (key == RATE_URL_ENV).then(|| "https://example.com/usd2022.html".to_string())
        });
        assert_eq!(config.rate_url, "https://example.com/usd2022.html");

        let config = Config::default().with_env_from(|_| Some("  ".to_string()));
        assert_eq!(config.rate_url, DEFAULT_RATE_URL);
    }

    #[test]
    fn test_rate_source_selection() {
        let config = Config::default();
        assert_eq!(config.rate_source().unwrap().location(), DEFAULT_RATE_URL);

        let config = Config {
            rate_file: Some(PathBuf::from("/tmp/usd2023.html")),
            ..Config::default()
        };
        assert_eq!(config.rate_source().unwrap().location(), "/tmp/usd2023.html");
    }
}
